//! Privacy bound calculator and regression test matrix for RAPPOR-style
//! randomized response reporting.
#[macro_use]
extern crate log;

mod error;
mod params;
pub mod epsilon;
pub mod catalog;
pub mod matrix;

pub use error::{Error, Degeneracy};
pub use params::*;
pub use epsilon::{PrivacyBound, bound_from_args};
pub use catalog::{Catalog, Preset};
pub use matrix::{TestCase, TestMatrix, generate};
