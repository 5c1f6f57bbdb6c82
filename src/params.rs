use std::fmt;
use regex::Regex;
use serde::{Serialize, Deserialize};
use crate::Error;

/// Token written in place of a missing-data pattern when nothing is filtered.
pub const NO_FILTER_TOKEN: &str = "NONE";

/// Randomized response probabilities.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PrivacyParams {
    /// Probability of the permanent randomization stage.
    pub f: f64,
    /// Probability of reporting 1 when the permanent bit is 0.
    pub p: f64,
    /// Probability of reporting 1 when the permanent bit is 1.
    pub q: f64,
}

/// Shape of the Bloom filter a value is hashed into.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct BloomGeometry {
    /// Bits per cohort.
    pub k: u32,
    /// Hash functions, i.e. bits set per value.
    pub h: u32,
    /// Number of cohorts.
    pub m: u32,
}

/// A synthetic client population.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DistributionPreset {
    pub name: String,
    pub num_unique_values: u64,
    pub num_clients: u64,
    pub values_per_client: u64,
}

/// Which true values the external runner drops from the candidate list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum MissingFilter {
    /// Every true value stays a candidate.
    None,
    /// True values matching the pattern are removed.
    Pattern(String),
}

/// A named combination of geometry, privacy and candidate settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TestConfig {
    pub name: String,
    /// Name of a Bloom filter geometry in the catalog.
    pub bloom: String,
    /// Name of a privacy preset in the catalog.
    pub privacy: String,
    /// Decoy candidates relative to the number of unique values.
    pub extra_fraction: f64,
    /// Name of a missing-data mode in the catalog.
    pub missing: String,
}

/// Formats a real the way the row consumers expect: shortest round-trip
/// form, always with a fractional part.
pub fn format_real(x: f64) -> String {
    format!("{:?}", x)
}

impl PrivacyParams {
    pub fn new(f: f64, p: f64, q: f64) -> Self {
        Self { f, p, q }
    }

    /// Returns an error if any of f, p, q is not in [0, 1].
    pub fn check(&self) -> Result<(), Error> {
        for &(name, value) in &[("f", self.f), ("p", self.p), ("q", self.q)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidProbability { name, value });
            }
        }
        Ok(())
    }
}

impl fmt::Display for PrivacyParams {
    /// Written as `p q f`, the order the test runner reads.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}",
            format_real(self.p), format_real(self.q), format_real(self.f))
    }
}

impl BloomGeometry {
    pub fn new(k: u32, h: u32, m: u32) -> Self {
        Self { k, h, m }
    }

    pub fn check(&self) -> Result<(), Error> {
        if self.k == 0 || self.h == 0 || self.m == 0 {
            return Err(Error::InvalidCatalog(format!(
                "geometry {} has a zero dimension", self)));
        }
        Ok(())
    }
}

impl fmt::Display for BloomGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.k, self.h, self.m)
    }
}

impl DistributionPreset {
    pub fn new(
        name: &str,
        num_unique_values: u64,
        num_clients: u64,
        values_per_client: u64,
    ) -> Self {
        Self {
            name: name.to_string(),
            num_unique_values,
            num_clients,
            values_per_client,
        }
    }

    pub fn check(&self) -> Result<(), Error> {
        if self.num_unique_values == 0 || self.num_clients == 0 {
            return Err(Error::InvalidCatalog(format!(
                "distribution preset {:?} needs positive values and clients",
                self.name)));
        }
        Ok(())
    }
}

impl MissingFilter {
    pub fn pattern(pattern: &str) -> Self {
        MissingFilter::Pattern(pattern.to_string())
    }

    /// The pattern must compile and must survive whitespace splitting.
    pub fn check(&self) -> Result<(), Error> {
        if let MissingFilter::Pattern(pattern) = self {
            if pattern.is_empty() || pattern.chars().any(char::is_whitespace) {
                return Err(Error::InvalidCatalog(format!(
                    "missing-data pattern {:?} is empty or contains whitespace",
                    pattern)));
            }
            if pattern == NO_FILTER_TOKEN {
                return Err(Error::InvalidCatalog(format!(
                    "missing-data pattern {:?} is reserved", pattern)));
            }
            Regex::new(pattern).map_err(|e| Error::InvalidCatalog(format!(
                "missing-data pattern {:?}: {}", pattern, e)))?;
        }
        Ok(())
    }
}

impl From<Option<String>> for MissingFilter {
    fn from(pattern: Option<String>) -> Self {
        match pattern {
            Some(pattern) => MissingFilter::Pattern(pattern),
            None => MissingFilter::None,
        }
    }
}

impl From<MissingFilter> for Option<String> {
    fn from(filter: MissingFilter) -> Self {
        match filter {
            MissingFilter::Pattern(pattern) => Some(pattern),
            MissingFilter::None => None,
        }
    }
}

impl fmt::Display for MissingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingFilter::None => write!(f, "{}", NO_FILTER_TOKEN),
            MissingFilter::Pattern(pattern) => write!(f, "{}", pattern),
        }
    }
}

impl TestConfig {
    pub fn new(
        name: &str,
        bloom: &str,
        privacy: &str,
        extra_fraction: f64,
        missing: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            bloom: bloom.to_string(),
            privacy: privacy.to_string(),
            extra_fraction,
            missing: missing.to_string(),
        }
    }

    /// Number of decoy candidates for a population, truncated toward zero.
    pub fn num_extra(&self, num_unique_values: u64) -> u64 {
        (num_unique_values as f64 * self.extra_fraction) as u64
    }
}
