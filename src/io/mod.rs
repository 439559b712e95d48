//! Input/output helpers.
//!
//! - workspace JSON read/write (`workspace_file`)

pub mod workspace_file;

pub use workspace_file::*;
