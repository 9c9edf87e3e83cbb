//! Small matrix type used throughout the crate.
//!
//! `Array2` is a row-major container for sample-by-feature data. Dense
//! linear algebra converts to `ndarray` on demand.
pub mod matrix;

pub use matrix::{Array2, ShapeError};
