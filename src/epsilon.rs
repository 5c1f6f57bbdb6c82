//! Differential privacy bound of the two-stage randomized response.
//!
//! A true bit first goes through the permanent stage (kept with probability
//! `1 - f`, otherwise replaced by a fair coin) and then the instantaneous
//! stage (reported as 1 with probability `p` or `q` depending on the
//! permanent bit). With `h` hash functions a value sets `h` bits, each
//! treated as an independent worst-case single-bit mechanism.
use std::fmt;
use std::str::FromStr;
use crate::{Error, Degeneracy, PrivacyParams, format_real};

/// Probability a bit is reported as 1 when the true bit is 0.
pub fn p_star(f: f64, p: f64, q: f64) -> f64 {
    (f / 2.0) * (p + q) + (1.0 - f) * p
}

/// Probability a bit is reported as 1 when the true bit is 1.
pub fn q_star(f: f64, p: f64, q: f64) -> f64 {
    (f / 2.0) * (p + q) + (1.0 - f) * q
}

/// Likelihood ratio of a single bit flip between neighboring inputs.
pub fn inner_factor(p_star: f64, q_star: f64) -> f64 {
    (q_star * (1.0 - p_star)) / (p_star * (1.0 - q_star))
}

/// Cumulative bound over `h` reported bits.
pub fn epsilon(h: u32, inner: f64) -> f64 {
    h as f64 * inner.ln()
}

/// A derived bound together with its intermediate values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrivacyBound {
    pub h: u32,
    pub p_star: f64,
    pub q_star: f64,
    pub inner: f64,
    pub epsilon: f64,
}

impl PrivacyBound {
    /// Derives the bound for `h` hash functions.
    ///
    /// ## Errors
    /// Returns `Error::InvalidProbability` if f, p or q is outside [0, 1],
    /// and `Error::DegenerateBound` if p* or q* is not strictly inside
    /// (0, 1) or if p* equals q*.
    pub fn derive(params: &PrivacyParams, h: u32) -> Result<Self, Error> {
        params.check()?;
        let bound = Self::unchecked(params, h);
        let open = |x: f64| x > 0.0 && x < 1.0;
        if !open(bound.p_star) || !open(bound.q_star) {
            return Err(bound.degenerate(Degeneracy::Saturated));
        }
        if bound.p_star == bound.q_star {
            return Err(bound.degenerate(Degeneracy::Indistinguishable));
        }
        Ok(bound)
    }

    /// Applies the formulas as-is. The result may be 0, infinite or NaN.
    pub fn unchecked(params: &PrivacyParams, h: u32) -> Self {
        let PrivacyParams { f, p, q } = *params;
        let p_star = p_star(f, p, q);
        let q_star = q_star(f, p, q);
        let inner = inner_factor(p_star, q_star);
        Self {
            h,
            p_star,
            q_star,
            inner,
            epsilon: epsilon(h, inner),
        }
    }

    fn degenerate(&self, degeneracy: Degeneracy) -> Error {
        Error::DegenerateBound {
            degeneracy,
            p_star: self.p_star,
            q_star: self.q_star,
        }
    }
}

/// Parses one positional argument, naming it in the error.
pub fn parse_arg<T: FromStr>(name: &str, value: Option<&str>) -> Result<T, Error>
where
    T::Err: fmt::Display,
{
    let value = value
        .ok_or_else(|| Error::ArgumentError(format!("missing <{}>", name)))?;
    value.parse::<T>().map_err(|e| Error::ArgumentError(
        format!("<{}> = {:?}: {}", name, value, e)))
}

/// Derives the bound from the command-line strings `f p q h`.
///
/// With `allow_degenerate` the formulas are applied unchecked, otherwise
/// the bound goes through `PrivacyBound::derive`.
pub fn bound_from_args(
    f: Option<&str>,
    p: Option<&str>,
    q: Option<&str>,
    h: Option<&str>,
    allow_degenerate: bool,
) -> Result<PrivacyBound, Error> {
    let params = PrivacyParams::new(
        parse_arg("f", f)?,
        parse_arg("p", p)?,
        parse_arg("q", q)?,
    );
    let h: u32 = parse_arg("h", h)?;
    debug!("{:?} h={}", params, h);
    if allow_degenerate {
        Ok(PrivacyBound::unchecked(&params, h))
    } else {
        PrivacyBound::derive(&params, h)
    }
}

impl fmt::Display for PrivacyBound {
    /// `<h> ln(<inner>) = <epsilon>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ln({}) = {}",
            self.h, format_real(self.inner), format_real(self.epsilon))
    }
}
