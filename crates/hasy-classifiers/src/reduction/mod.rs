//! Dimensionality reduction fitted on training data only.
pub mod pca;

pub use pca::Pca;
