//! Common small functions used throughout the crate
//!
//! These are left public for the convenience of the user. For example using
//! prettier formatting for scientific numbers or generating evenly spaced
//! bin edges.

use std::fmt::LowerExp;

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Extends primitives with more specific formatting options
pub trait NumberFmt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// Works for anything that can be represented as scientific using the
    /// LowerExp trait.
    ///
    /// ```rust
    /// # use rssa::utils::NumberFmt;
    /// let number = -1.0;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1.0).sci(5, 2), "1.00000e+00".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: LowerExp> NumberFmt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // Safe to `unwrap` as `num` is guaranteed to contain `'e'`
        let exp = num.split_off(num.find('e').unwrap());
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        // Pad the exponent with zeros if needed and put it back on the number
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }
}

/// Find the maximum value of a `Vec<f64>`
///
/// Rust only has a built-in max method for types that implement Ord. However,
/// floating-point types do not implement Ord because of NaN, so this is the
/// workaround.
///
/// ```rust
/// # use rssa::utils::vec_f64_max;
/// let vector = vec![1.0, 2.0, 3.0];
/// assert_eq!(*vec_f64_max(&vector), 3.0)
/// ```
pub fn vec_f64_max(vector: &[f64]) -> &f64 {
    vector.iter().max_by(|a, b| a.total_cmp(b)).unwrap()
}

/// Find the minimum value of a `Vec<f64>`
///
/// Rust only has a built-in max method for types that implement Ord. However,
/// floating-point types do not implement Ord because of NaN, so this is the
/// workaround.
///
/// ```rust
/// # use rssa::utils::vec_f64_min;
/// let vector = vec![1.0, 2.0, 3.0];
/// assert_eq!(*vec_f64_min(&vector), 1.0)
/// ```
pub fn vec_f64_min(vector: &[f64]) -> &f64 {
    vector.iter().min_by(|a, b| a.total_cmp(b)).unwrap()
}

/// Generate `n` evenly spaced values over `[start, stop]`
///
/// Both ends are included, so a set of `n_bins` bins needs `n_bins + 1`
/// values.
///
/// ```rust
/// # use rssa::utils::linspace;
/// let edges = linspace(0.0, 10.0, 3);
/// assert_eq!(edges, vec![0.0, 5.0, 10.0]);
/// ```
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / ((n - 1) as f64);
            (0..n).map(|i| start + step * (i as f64)).collect()
        }
    }
}
