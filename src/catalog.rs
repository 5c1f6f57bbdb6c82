//! Named parameter presets the test matrix is built from.
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::*;

/// A catalog entry referenced by name from a test configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Preset<T> {
    pub name: String,
    pub value: T,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Catalog {
    /// Distribution shapes understood by the client simulator.
    pub shapes: Vec<String>,
    /// Population scales.
    pub distributions: Vec<DistributionPreset>,
    /// `k h m` as in the params file.
    pub geometries: Vec<Preset<BloomGeometry>>,
    pub privacy: Vec<Preset<PrivacyParams>>,
    /// For deriving candidates from true inputs.
    pub missing: Vec<Preset<MissingFilter>>,
    pub configs: Vec<TestConfig>,
    /// Complete lines appended after the generated rows.
    pub demos: Vec<String>,
}

impl<T> Preset<T> {
    pub fn new(name: &str, value: T) -> Self {
        Self { name: name.to_string(), value }
    }
}

/// Finds a preset by name.
pub fn lookup<'a, T>(
    table: &'a [Preset<T>],
    kind: &'static str,
    name: &str,
) -> Result<&'a T, Error> {
    table.iter()
        .find(|preset| preset.name == name)
        .map(|preset| &preset.value)
        .ok_or_else(|| Error::UnknownPreset { table: kind, name: name.to_string() })
}

fn check_unique<'a, I: Iterator<Item = &'a String>>(
    kind: &str,
    names: I,
) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::InvalidCatalog(format!(
                "{} name {:?} is empty or contains whitespace", kind, name)));
        }
        if !seen.insert(name) {
            return Err(Error::InvalidCatalog(format!(
                "{} name {:?} is declared twice", kind, name)));
        }
    }
    Ok(())
}

impl Catalog {
    /// The regression test catalog.
    pub fn production() -> Self {
        let shapes = vec!["unif", "exp", "gauss", "zipf1", "zipf1.5"];
        let distributions = vec![
            // name, num unique values, num clients, values per client
            DistributionPreset::new("tiny", 100, 1000, 1), // insufficient data
            DistributionPreset::new("small", 100, 1000000, 1),
            DistributionPreset::new("medium", 1000, 10000000, 1),
            DistributionPreset::new("large", 10000, 100000000, 1),
            // varying the number of clients
            DistributionPreset::new("clients1", 100, 10000000, 1),
            DistributionPreset::new("clients2", 100, 1000000, 1),
            DistributionPreset::new("clients3", 100, 500000, 1),
            DistributionPreset::new("clients4", 100, 100000, 1),
            DistributionPreset::new("clients5", 100, 50000, 1),
            DistributionPreset::new("clients6", 100, 25000, 1),
            // varying the number of unique values
            DistributionPreset::new("unique1", 10, 1000000, 1),
            DistributionPreset::new("unique2", 100, 1000000, 1),
            DistributionPreset::new("unique3", 1000, 1000000, 1),
        ];
        let geometries = vec![
            Preset::new("8x16x2", BloomGeometry::new(8, 2, 16)),
            Preset::new("8x32x2", BloomGeometry::new(8, 2, 32)),
            Preset::new("8x128x2", BloomGeometry::new(8, 2, 128)),
            Preset::new("128x8x2", BloomGeometry::new(128, 2, 8)),
            // bloom filter size
            Preset::new("8x128x1", BloomGeometry::new(8, 1, 128)),
            Preset::new("8x128x4", BloomGeometry::new(8, 4, 128)),
            Preset::new("8x128x8", BloomGeometry::new(8, 8, 128)),
            // number of cohorts
            Preset::new("128x16x2", BloomGeometry::new(128, 2, 8)),
            Preset::new("128x32x2", BloomGeometry::new(128, 2, 8)),
            Preset::new("128x64x2", BloomGeometry::new(128, 2, 8)),
            Preset::new("128x128x2", BloomGeometry::new(128, 2, 8)),
        ];
        let privacy = vec![
            // eps_1 = 1, eps_inf = 5
            Preset::new("params1", PrivacyParams::new(0.45, 0.39, 0.61)),
            // eps_1 = 5, no eps_inf
            Preset::new("params2", PrivacyParams::new(0.0, 0.225, 0.775)),
            Preset::new("params3", PrivacyParams::new(0.75, 0.75, 0.5)),
        ];
        let missing = vec![
            Preset::new("sharp", MissingFilter::None), // categorical data
            Preset::new("10%", MissingFilter::pattern("v[0-9]*9$")), // every 10th string
        ];
        let configs = vec![
            TestConfig::new("typical", "8x128x2", "params1", 0.2, "10%"),
            TestConfig::new("sharp", "8x128x2", "params1", 0.0, "sharp"),
            TestConfig::new("loose", "8x128x2", "params2", 0.2, "10%"),
            TestConfig::new("over_x2", "8x128x2", "params1", 2.0, "10%"),
            TestConfig::new("over_x10", "8x128x2", "params1", 10.0, "10%"),
            TestConfig::new("sharp2", "8x128x2", "params3", 0.0, "sharp"),
            // bloom filter size
            TestConfig::new("sim_bloom_filter1", "8x128x2", "params3", 0.0, "sharp"),
            TestConfig::new("sim_bloom_filter2", "8x128x2", "params3", 0.0, "sharp"),
            // number of hash functions
            TestConfig::new("sim_hash1", "8x128x1", "params3", 0.0, "sharp"),
            TestConfig::new("sim_hash2", "8x128x2", "params3", 0.0, "sharp"),
            TestConfig::new("sim_hash3", "8x128x4", "params3", 0.0, "sharp"),
            TestConfig::new("sim_hash4", "8x128x8", "params3", 0.0, "sharp"),
            // number of cohorts
            TestConfig::new("sim_cohort1", "128x8x2", "params3", 0.0, "sharp"),
            TestConfig::new("sim_cohort2", "128x16x2", "params3", 0.0, "sharp"),
            TestConfig::new("sim_cohort3", "128x32x2", "params3", 0.0, "sharp"),
            TestConfig::new("sim_cohort4", "128x64x2", "params3", 0.0, "sharp"),
            TestConfig::new("sim_cohort5", "128x128x2", "params3", 0.0, "sharp"),
            // probabilities p, q, f
            TestConfig::new("sim_probs1", "8x128x2", "params1", 0.0, "sharp"),
            TestConfig::new("sim_probs2", "8x128x2", "params2", 0.0, "sharp"),
            TestConfig::new("sim_probs3", "8x128x2", "params3", 0.0, "sharp"),
        ];
        // name distr unique clients per_client / k h m / p q f / extra missing
        let demos = vec![
            "demo1 gauss   100 100000 1 32 1 64 0.25 0.75 0.5 0 NONE",
            "demo2 gauss   100 1000 1 32 1 64 0.25 0.75 0.5 0 NONE",
            "demo3 gauss   100 10000 1 32 1 64 0.25 0.75 0.5 0 NONE",
            "demo4 zipf1   100 100000 10 32 1 64 0.25 0.75 0.5 100 v[0-9]*9$",
            "demo5 zipf1.5 100 100000 10 32 1 64 0.25 0.75 0.5 100 v[0-9]*9$",
        ];
        Catalog {
            shapes: shapes.into_iter().map(|s| s.to_string()).collect(),
            distributions,
            geometries,
            privacy,
            missing,
            configs,
            demos: demos.into_iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let json = fs::read_to_string(path.as_ref())?;
        debug!("read catalog from {:?}: {} bytes", path.as_ref(), json.len());
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn geometry(&self, name: &str) -> Result<&BloomGeometry, Error> {
        lookup(&self.geometries, "bloom filter", name)
    }

    pub fn privacy_params(&self, name: &str) -> Result<&PrivacyParams, Error> {
        lookup(&self.privacy, "privacy", name)
    }

    pub fn missing_filter(&self, name: &str) -> Result<&MissingFilter, Error> {
        lookup(&self.missing, "missing data", name)
    }

    /// Number of rows generated before the demo rows.
    pub fn num_cases(&self) -> usize {
        self.distributions.len() * self.shapes.len() * self.configs.len()
    }

    /// Checks every invariant the generator relies on, so that generation
    /// either fails before producing anything or not at all.
    pub fn validate(&self) -> Result<(), Error> {
        check_unique("shape", self.shapes.iter())?;
        check_unique("distribution", self.distributions.iter().map(|d| &d.name))?;
        check_unique("bloom filter", self.geometries.iter().map(|g| &g.name))?;
        check_unique("privacy", self.privacy.iter().map(|p| &p.name))?;
        check_unique("missing data", self.missing.iter().map(|m| &m.name))?;
        check_unique("config", self.configs.iter().map(|c| &c.name))?;

        for distribution in &self.distributions {
            distribution.check()?;
        }
        for geometry in &self.geometries {
            geometry.value.check()?;
        }
        for params in &self.privacy {
            params.value.check()?;
        }
        for filter in &self.missing {
            filter.value.check()?;
        }
        for config in &self.configs {
            if !config.extra_fraction.is_finite() || config.extra_fraction < 0.0 {
                return Err(Error::InvalidCatalog(format!(
                    "config {:?} has extra fraction {}",
                    config.name, config.extra_fraction)));
            }
            self.geometry(&config.bloom)?;
            self.privacy_params(&config.privacy)?;
            self.missing_filter(&config.missing)?;
        }
        for demo in &self.demos {
            if demo.split_whitespace().next().is_none() {
                return Err(Error::InvalidCatalog("empty demo row".to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempdir::TempDir;

    #[test]
    fn test_production_catalog_is_valid() {
        let catalog = Catalog::production();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.shapes.len(), 5);
        assert_eq!(catalog.distributions.len(), 13);
        assert_eq!(catalog.configs.len(), 20);
        assert_eq!(catalog.num_cases(), 13 * 5 * 20);
        assert_eq!(catalog.demos.len(), 5);
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::production();
        assert_eq!(catalog.geometry("8x128x2").unwrap(), &BloomGeometry::new(8, 2, 128));
        assert_eq!(catalog.geometry("128x64x2").unwrap(), &BloomGeometry::new(128, 2, 8));
        assert_eq!(catalog.privacy_params("params2").unwrap().q, 0.775);
        assert_eq!(catalog.missing_filter("sharp").unwrap(), &MissingFilter::None);
        match catalog.geometry("4x4x4") {
            Err(Error::UnknownPreset { table, name }) => {
                assert_eq!(table, "bloom filter");
                assert_eq!(&name, "4x4x4");
            },
            res => panic!("unexpected {:?}", res),
        }
    }

    #[test]
    fn test_unknown_reference_is_invalid() {
        let mut catalog = Catalog::production();
        catalog.configs.push(TestConfig::new("bad", "8x128x2", "params9", 0.0, "sharp"));
        assert!(matches!(catalog.validate(), Err(Error::UnknownPreset { .. })));

        let mut catalog = Catalog::production();
        catalog.configs[0].missing = "20%".to_string();
        assert!(matches!(catalog.validate(), Err(Error::UnknownPreset { .. })));
    }

    #[test]
    fn test_duplicate_preset_names_are_invalid() {
        let mut catalog = Catalog::production();
        catalog.geometries.push(Preset::new("8x128x2", BloomGeometry::new(8, 2, 128)));
        assert!(matches!(catalog.validate(), Err(Error::InvalidCatalog(_))));

        let mut catalog = Catalog::production();
        catalog.shapes.push("gauss".to_string());
        assert!(matches!(catalog.validate(), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn test_whitespace_in_names_is_invalid() {
        let mut catalog = Catalog::production();
        catalog.configs[0].name = "two words".to_string();
        assert!(matches!(catalog.validate(), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn test_bad_values_are_invalid() {
        let mut catalog = Catalog::production();
        catalog.configs[0].extra_fraction = -0.5;
        assert!(catalog.validate().is_err(), "negative fraction");

        let mut catalog = Catalog::production();
        catalog.privacy[0].value.f = 1.5;
        assert!(catalog.validate().is_err(), "f is not a probability");

        let mut catalog = Catalog::production();
        catalog.missing[1].value = MissingFilter::pattern("v[0-9");
        assert!(catalog.validate().is_err(), "pattern does not compile");

        let mut catalog = Catalog::production();
        catalog.demos.push("   ".to_string());
        assert!(catalog.validate().is_err(), "empty demo");
    }

    #[test]
    fn test_json_round_trip() {
        let catalog = Catalog::production();
        let json = catalog.to_json().unwrap();
        assert!(json.contains("\"v[0-9]*9$\""));
        assert!(json.contains("null"), "no-filter mode is null");
        assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
    }

    #[test]
    fn test_from_json_file() {
        let dir = TempDir::new("catalog").unwrap();
        let path = dir.path().join("catalog.json");
        let mut f = File::create(&path).unwrap();
        f.write_all(Catalog::production().to_json().unwrap().as_bytes()).unwrap();
        f.flush().unwrap();
        assert_eq!(Catalog::from_json_file(&path).unwrap(), Catalog::production());

        assert!(matches!(
            Catalog::from_json_file(dir.path().join("nonexistent.json")),
            Err(Error::IoError(_))));
        assert!(matches!(
            Catalog::from_json("{\"shapes\": [\"unif\"]}"),
            Err(Error::SerializationError(_))));
    }
}
