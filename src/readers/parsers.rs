//! Parsers for the binary record payloads
//!
//! The framed records themselves are handled by the reader; these
//! combinators decode the little-endian payloads that have a variable
//! layout. Fixed-layout payloads go straight through `bincode` instead.

// internal modules
use crate::source::SurfaceDescriptor;

// external crates
use nom::multi::many0;
use nom::number::complete::le_i32;
use nom::IResult;

/// Decode one surface description record payload
///
/// The byte layout is fixed offsets up to the parameter list:
///
/// ```text
/// <id i32> <info i32> <type i32> <num_params i32> <param i32> ...
/// ```
///
/// The macrobody info slot is always present in the record but only carries
/// meaning when the header sets `kjaq`; otherwise it is replaced with a -1
/// sentinel. The parameter list runs to the end of the record.
pub fn surface_record(input: &[u8], kjaq: i32) -> IResult<&[u8], SurfaceDescriptor> {
    let (i, id) = le_i32(input)?;
    let (i, info) = le_i32(i)?;
    let (i, kind) = le_i32(i)?;
    let (i, num_params) = le_i32(i)?;
    let (i, params) = many0(le_i32)(i)?;

    Ok((
        i,
        SurfaceDescriptor {
            id,
            info: if kjaq == 1 { info } else { -1 },
            kind,
            num_params,
            params,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// id 101, info 3, type 2, two parameters
    fn surface_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        for value in [101_i32, 3, 2, 2, 50, 100] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn surface_record_with_macrobody_flag() {
        let bytes = surface_bytes();
        let (rest, surface) = surface_record(&bytes, 1).unwrap();

        assert!(rest.is_empty());
        assert_eq!(surface.id, 101);
        assert_eq!(surface.info, 3);
        assert_eq!(surface.kind, 2);
        assert_eq!(surface.num_params, 2);
        assert_eq!(surface.params, vec![50, 100]);
    }

    #[test]
    fn surface_record_without_macrobody_flag() {
        let bytes = surface_bytes();
        let (_, surface) = surface_record(&bytes, 0).unwrap();

        // the slot is still consumed, the value is just meaningless
        assert_eq!(surface.info, -1);
        assert_eq!(surface.kind, 2);
    }
}
