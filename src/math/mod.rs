//! Numerical building blocks: interpolation and loop amplitudes.

pub mod loop_amp;
pub mod spline;

pub use loop_amp::*;
pub use spline::*;
