//! Errors raised while deriving bounds or generating the test matrix.
use std::fmt;
use std::io;

/// Why a privacy bound could not be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// p* or q* is not strictly between 0 and 1, so the likelihood ratio
    /// is undefined or infinite.
    Saturated,
    /// p* equals q*. The ratio is 1 and the bound is 0.
    Indistinguishable,
}

#[derive(Debug)]
pub enum Error {
    /// I/O error.
    IoError(io::Error),
    /// Error deserializing or serializing a catalog.
    SerializationError(String),
    /// Missing or malformed command-line argument.
    ArgumentError(String),
    /// A probability outside of [0, 1].
    InvalidProbability {
        name: &'static str,
        value: f64,
    },
    /// The derived bound is degenerate.
    DegenerateBound {
        degeneracy: Degeneracy,
        p_star: f64,
        q_star: f64,
    },
    /// A test configuration references a preset that is not in the catalog.
    UnknownPreset {
        table: &'static str,
        name: String,
    },
    /// The catalog violates one of its invariants.
    InvalidCatalog(String),
    /// Two generated rows share a test name.
    DuplicateTestName(String),
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::IoError(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerializationError(error.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "i/o error: {}", e),
            Error::SerializationError(s) => write!(f, "malformed catalog: {}", s),
            Error::ArgumentError(s) => write!(f, "bad argument: {}", s),
            Error::InvalidProbability { name, value } => {
                write!(f, "{} = {} is not a probability in [0, 1]", name, value)
            },
            Error::DegenerateBound { degeneracy, p_star, q_star } => match degeneracy {
                Degeneracy::Saturated => write!(
                    f, "degenerate bound: p* = {} and q* = {} must lie in (0, 1)",
                    p_star, q_star),
                Degeneracy::Indistinguishable => write!(
                    f, "degenerate bound: p* = q* = {}, reports carry no signal",
                    p_star),
            },
            Error::UnknownPreset { table, name } => {
                write!(f, "unknown {} preset {:?}", table, name)
            },
            Error::InvalidCatalog(s) => write!(f, "invalid catalog: {}", s),
            Error::DuplicateTestName(name) => write!(f, "duplicate test name {:?}", name),
        }
    }
}

impl std::error::Error for Error {}
