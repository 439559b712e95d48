//! Higgs coupling models.
//!
//! - physics-option parsing (`options`)
//! - the parameterized coupling model shared by all variants (`model`)

pub mod model;
pub mod options;

pub use model::*;
pub use options::*;
