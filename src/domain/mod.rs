//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the model variant descriptor (`ModelKind`, `ParamSpec`)
//! - parameter and channel names shared by every variant
//! - production/decay tag classification (`ProductionClass`, `DecayClass`)

pub mod types;

pub use types::*;
