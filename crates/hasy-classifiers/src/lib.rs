//! hasy-classifiers: an experiment harness for tabular and image classifiers.
//!
//! The crate loads a train/test dataset, runs a configurable preprocessing
//! pipeline (flatten, normalize, bias column, PCA) fitted on training data
//! only, and evaluates a learning method either by k-fold cross-validation or
//! by a single train/test run, reporting accuracy and macro-F1.
//!
//! Methods (constant baseline, k-means, logistic regression, kernel SVM) sit
//! behind the `models::Method` trait and are built from configuration by
//! `models::factory::build_method`.
pub mod config;
pub mod cross_validation;
pub mod data_handling;
pub mod error;
pub mod experiment;
pub mod io;
pub mod math;
pub mod metrics;
pub mod models;
pub mod preprocessing;
pub mod reduction;

pub use error::{HarnessError, Result};
