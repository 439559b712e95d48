//! `higgs-losm` library crate.
//!
//! The binary (`losm`) is a thin wrapper around this library so that:
//!
//! - model building is testable without spawning processes
//! - the workspace graph can be reused by other front-ends
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod workspace;
