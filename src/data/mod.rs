//! External reference data: SM tables and the builder that loads them.

pub mod smh;
pub mod table;

pub use smh::*;
pub use table::*;
