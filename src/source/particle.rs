//! Particle types relevant to surface source files
//!
//! RSSA tracks only ever record neutrons and photons, so the selector is a
//! simple two-variant enum rather than the full MCNP particle list.

// internal modules
use crate::error::RssaError;
use crate::utils::f;

// external crates
use serde::Serialize;

/// The two particle types recorded in an RSSA file
///
/// Tracks are classified from the magnitude of the packed flag field on each
/// record (see [Track](crate::source::Track)), not from this enum. The enum
/// exists so that callers select one of the two classes and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Particle {
    /// MCNP particle type 1
    Neutron,
    /// MCNP particle type 2
    Photon,
}

impl Particle {
    /// The MCNP particle id number
    pub const fn id(&self) -> u8 {
        match self {
            Self::Neutron => 1,
            Self::Photon => 2,
        }
    }
}

impl TryFrom<&str> for Particle {
    type Error = RssaError;

    /// Accepts the short and full names used on the command line
    ///
    /// ```rust
    /// # use rssa::source::Particle;
    /// assert_eq!(Particle::try_from("n").unwrap(), Particle::Neutron);
    /// assert_eq!(Particle::try_from("photon").unwrap(), Particle::Photon);
    /// assert!(Particle::try_from("e").is_err());
    /// ```
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "n" | "neutron" => Ok(Self::Neutron),
            "p" | "photon" => Ok(Self::Photon),
            _ => Err(RssaError::InvalidArgument(f!(
                "particle was \"{s}\", not one of n/neutron/p/photon"
            ))),
        }
    }
}

impl std::fmt::Display for Particle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Neutron => write!(f, "neutron"),
            Self::Photon => write!(f, "photon"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("n", Particle::Neutron)]
    #[case("neutron", Particle::Neutron)]
    #[case("N", Particle::Neutron)]
    #[case("p", Particle::Photon)]
    #[case("photon", Particle::Photon)]
    fn known_selectors(#[case] input: &str, #[case] expected: Particle) {
        assert_eq!(Particle::try_from(input).unwrap(), expected);
    }

    #[rstest]
    #[case("e")]
    #[case("proton")]
    #[case("")]
    fn unknown_selectors_rejected(#[case] input: &str) {
        let result = Particle::try_from(input);
        assert!(matches!(
            result,
            Err(RssaError::InvalidArgument(_))
        ));
    }
}
