use std::error::Error;
use std::fmt;

use crate::math::ShapeError;

/// Errors raised by the evaluation harness.
///
/// Configuration errors are raised before any computation starts; contract
/// violations identify the precondition that failed. None of them are retried.
#[derive(Debug)]
pub enum HarnessError {
    /// A hyperparameter or pipeline setting is outside its valid range.
    InvalidConfig(String),
    /// The method name does not match any known family.
    UnknownMethod(String),
    /// The method family is recognised but not implemented.
    Unsupported(String),
    /// Fold count must satisfy `1 < k <= n`.
    InvalidFoldCount { k: usize, n: usize },
    /// `predict` (or `reduce`) called before `fit`.
    NotFitted(&'static str),
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    LengthMismatch { predictions: usize, truth: usize },
    EmptyInput(&'static str),
    Numeric(String),
    Shape(ShapeError),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HarnessError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            HarnessError::UnknownMethod(name) => write!(
                f,
                "Unknown method: {}. Valid options are: dummy_classifier, kmeans, logistic_regression, svm",
                name
            ),
            HarnessError::Unsupported(name) => write!(f, "Method '{}' is not implemented", name),
            HarnessError::InvalidFoldCount { k, n } => write!(
                f,
                "Invalid fold count k={} for {} samples (requires 1 < k <= {})",
                k, n, n
            ),
            HarnessError::NotFitted(what) => {
                write!(f, "{} must be fitted before it can be used", what)
            }
            HarnessError::ShapeMismatch {
                context,
                expected,
                found,
            } => write!(f, "{}: expected {}, found {}", context, expected, found),
            HarnessError::LengthMismatch { predictions, truth } => write!(
                f,
                "Predictions and ground truth must have equal lengths ({} vs {})",
                predictions, truth
            ),
            HarnessError::EmptyInput(what) => write!(f, "{} must not be empty", what),
            HarnessError::Numeric(msg) => write!(f, "Numeric error: {}", msg),
            HarnessError::Shape(err) => write!(f, "Shape error: {}", err),
        }
    }
}

impl Error for HarnessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HarnessError::Shape(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShapeError> for HarnessError {
    fn from(err: ShapeError) -> Self {
        HarnessError::Shape(err)
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
