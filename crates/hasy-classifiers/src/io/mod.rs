//! IO utilities for loading dataset splits.

pub mod delimited;

pub use delimited::{load_dataset, locate_split, read_split, LoaderConfig, SplitData};
