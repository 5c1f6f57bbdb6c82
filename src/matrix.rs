//! Regression test matrix.
//!
//! Every distribution preset is crossed with every shape and every test
//! configuration, in catalog order, and written one row per line for the
//! test runner. The runner splits each line on whitespace and reads the
//! fields by position:
//!
//! `name shape unique clients per_client k h m p q f extra missing`
use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use itertools::iproduct;
use crate::*;

/// A fully resolved test case.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// `r-<shape>-<distribution>-<config>`, unique within a matrix.
    pub name: String,
    pub shape: String,
    pub num_unique_values: u64,
    pub num_clients: u64,
    pub values_per_client: u64,
    pub geometry: BloomGeometry,
    pub privacy: PrivacyParams,
    /// Decoy candidates added to the candidate list.
    pub num_extra: u64,
    pub missing: MissingFilter,
}

/// Generated rows followed by the demo rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TestMatrix {
    pub cases: Vec<TestCase>,
    pub demos: Vec<String>,
}

pub fn test_name(shape: &str, distribution: &str, config: &str) -> String {
    format!("r-{}-{}-{}", shape, distribution, config)
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {} {} {} {} {} {}",
            self.name,
            self.shape,
            self.num_unique_values,
            self.num_clients,
            self.values_per_client,
            self.geometry,
            self.privacy,
            self.num_extra,
            self.missing,
        )
    }
}

/// Logs the bound each configuration runs at. Purely diagnostic.
fn log_bounds(catalog: &Catalog) -> Result<(), Error> {
    for config in &catalog.configs {
        let geometry = catalog.geometry(&config.bloom)?;
        let params = catalog.privacy_params(&config.privacy)?;
        match PrivacyBound::derive(params, geometry.h) {
            Ok(bound) if bound.epsilon <= 0.0 => {
                warn!("config {} has a non-positive bound: {}", config.name, bound);
            },
            Ok(bound) => debug!("config {}: {}", config.name, bound),
            Err(e) => warn!("config {}: {}", config.name, e),
        }
    }
    Ok(())
}

/// Builds the test matrix for a catalog.
///
/// The catalog is validated before any row is built, so an unknown preset
/// name fails the whole generation.
///
/// ## Errors
/// Returns the catalog's validation error, or `Error::DuplicateTestName`
/// if two rows (demo rows included) share a name.
pub fn generate(catalog: &Catalog) -> Result<TestMatrix, Error> {
    catalog.validate()?;
    log_bounds(catalog)?;

    let mut names = HashSet::new();
    let mut cases = Vec::with_capacity(catalog.num_cases());
    for (distribution, shape, config) in iproduct!(
        &catalog.distributions,
        &catalog.shapes,
        &catalog.configs
    ) {
        let name = test_name(shape, &distribution.name, &config.name);
        if !names.insert(name.clone()) {
            return Err(Error::DuplicateTestName(name));
        }
        cases.push(TestCase {
            name,
            shape: shape.clone(),
            num_unique_values: distribution.num_unique_values,
            num_clients: distribution.num_clients,
            values_per_client: distribution.values_per_client,
            geometry: *catalog.geometry(&config.bloom)?,
            privacy: *catalog.privacy_params(&config.privacy)?,
            num_extra: config.num_extra(distribution.num_unique_values),
            missing: catalog.missing_filter(&config.missing)?.clone(),
        });
    }
    for demo in &catalog.demos {
        if let Some(name) = demo.split_whitespace().next() {
            if !names.insert(name.to_string()) {
                return Err(Error::DuplicateTestName(name.to_string()));
            }
        }
    }
    info!("generated {} test cases and {} demo rows", cases.len(), catalog.demos.len());
    Ok(TestMatrix {
        cases,
        demos: catalog.demos.clone(),
    })
}

impl TestMatrix {
    /// Every output line, generated rows first.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cases.iter()
            .map(|case| case.to_string())
            .chain(self.demos.iter().cloned())
    }

    /// Writes one line per row, flushing after each.
    pub fn write_to<W: Write>(&self, out: &mut W, demos: bool) -> Result<usize, Error> {
        let mut count = 0;
        for case in &self.cases {
            writeln!(out, "{}", case)?;
            out.flush()?;
            count += 1;
        }
        if demos {
            for demo in &self.demos {
                writeln!(out, "{}", demo)?;
                out.flush()?;
                count += 1;
            }
        }
        Ok(count)
    }
}
