use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::io::LoaderConfig;

/// Central configuration for one experiment run.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Directory holding the `train` and `test` splits.
    pub data: PathBuf,
    pub loader: LoaderConfig,
    /// Seed for every stochastic stage (k-means init, fold shuffling).
    pub seed: u64,
    pub method: MethodConfig,
    pub preprocessing: PreprocessConfig,
    pub evaluation: EvaluationConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("dataset_HASYv2"),
            loader: LoaderConfig::default(),
            seed: 80,
            method: MethodConfig::default(),
            preprocessing: PreprocessConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Check every setting that can be checked before touching data.
    pub fn validate(&self) -> Result<()> {
        self.method.validate()?;
        self.preprocessing.validate()?;
        self.evaluation.validate()
    }
}

/// Supported method families and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MethodConfig {
    #[serde(rename = "dummy_classifier")]
    Dummy { label: i32 },
    #[serde(rename = "kmeans")]
    KMeans { k: usize, max_iters: usize },
    LogisticRegression { lr: f64, max_iters: usize },
    Svm {
        c: f64,
        kernel: Kernel,
        gamma: f64,
        degree: u32,
        coef0: f64,
    },
}

impl Default for MethodConfig {
    fn default() -> Self {
        MethodConfig::Dummy { label: 0 }
    }
}

impl MethodConfig {
    pub fn name(&self) -> &'static str {
        match self {
            MethodConfig::Dummy { .. } => "dummy_classifier",
            MethodConfig::KMeans { .. } => "kmeans",
            MethodConfig::LogisticRegression { .. } => "logistic_regression",
            MethodConfig::Svm { .. } => "svm",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            MethodConfig::Dummy { .. } => Ok(()),
            MethodConfig::KMeans { k, max_iters } => {
                if *k == 0 {
                    return Err(invalid("kmeans: number of clusters K must be at least 1"));
                }
                if *max_iters == 0 {
                    return Err(invalid("kmeans: max_iters must be at least 1"));
                }
                Ok(())
            }
            MethodConfig::LogisticRegression { lr, max_iters } => {
                if !(lr.is_finite() && *lr > 0.0) {
                    return Err(invalid(format!(
                        "logistic_regression: learning rate must be positive, got {}",
                        lr
                    )));
                }
                if *max_iters == 0 {
                    return Err(invalid("logistic_regression: max_iters must be at least 1"));
                }
                Ok(())
            }
            MethodConfig::Svm {
                c,
                gamma,
                degree,
                coef0,
                ..
            } => {
                if !(c.is_finite() && *c > 0.0) {
                    return Err(invalid(format!("svm: C must be positive, got {}", c)));
                }
                if !(gamma.is_finite() && *gamma > 0.0) {
                    return Err(invalid(format!("svm: gamma must be positive, got {}", gamma)));
                }
                if *degree == 0 {
                    return Err(invalid("svm: polynomial degree must be at least 1"));
                }
                if !coef0.is_finite() {
                    return Err(invalid("svm: coef0 must be finite"));
                }
                Ok(())
            }
        }
    }
}

impl FromStr for MethodConfig {
    type Err = HarnessError;

    /// Parse a method family name into its default hyper-parameters.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dummy_classifier" | "dummy" => Ok(MethodConfig::Dummy { label: 0 }),
            "kmeans" => Ok(MethodConfig::KMeans {
                k: 10,
                max_iters: 100,
            }),
            "logistic_regression" => Ok(MethodConfig::LogisticRegression {
                lr: 1e-5,
                max_iters: 100,
            }),
            "svm" => Ok(MethodConfig::Svm {
                c: 1.0,
                kernel: Kernel::Linear,
                gamma: 1.0,
                degree: 1,
                coef0: 0.0,
            }),
            "nn" => Err(HarnessError::Unsupported("nn".to_string())),
            _ => Err(HarnessError::UnknownMethod(s.to_string())),
        }
    }
}

/// Kernel family for the margin-based classifier.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Kernel {
    Linear,
    Poly,
    Rbf,
}

impl FromStr for Kernel {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Kernel::Linear),
            "poly" | "polynomial" => Ok(Kernel::Poly),
            "rbf" | "gauss" | "gaussian" => Ok(Kernel::Rbf),
            _ => Err(invalid(format!(
                "Unsupported kernel type: {}. Valid options are: linear, poly, rbf",
                s
            ))),
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kernel::Linear => "linear",
            Kernel::Poly => "poly",
            Kernel::Rbf => "rbf",
        };
        f.write_str(name)
    }
}

/// Preprocessing toggles, applied in the order normalize, bias, PCA.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PreprocessConfig {
    pub normalize: bool,
    pub append_bias: bool,
    pub use_pca: bool,
    /// Output dimensionality when `use_pca` is set.
    pub pca_d: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            normalize: false,
            append_bias: false,
            use_pca: false,
            pca_d: 200,
        }
    }
}

impl PreprocessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.use_pca && self.pca_d == 0 {
            return Err(invalid("pca_d must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Train on the full training split and evaluate on the test split.
    /// Otherwise run k-fold cross-validation on the training split.
    pub test: bool,
    pub k_fold: usize,
    /// Permute sample order (seeded) before cutting folds.
    pub shuffle: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            test: false,
            k_fold: 5,
            shuffle: false,
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.test && self.k_fold < 2 {
            return Err(invalid(format!(
                "k_fold must be at least 2 for cross-validation, got {}",
                self.k_fold
            )));
        }
        Ok(())
    }
}

fn invalid<S: Into<String>>(msg: S) -> HarnessError {
    HarnessError::InvalidConfig(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svm_rejects_non_positive_gamma() {
        let cfg = MethodConfig::Svm {
            c: 1.0,
            kernel: Kernel::Rbf,
            gamma: 0.0,
            degree: 1,
            coef0: 0.0,
        };
        assert!(matches!(cfg.validate(), Err(HarnessError::InvalidConfig(_))));
    }

    #[test]
    fn kernel_aliases_parse() {
        assert_eq!("gauss".parse::<Kernel>().unwrap(), Kernel::Rbf);
        assert_eq!("polynomial".parse::<Kernel>().unwrap(), Kernel::Poly);
        assert!("sigmoid".parse::<Kernel>().is_err());
    }

    #[test]
    fn method_json_uses_cli_names() {
        let json = serde_json::to_string(&MethodConfig::KMeans { k: 3, max_iters: 7 }).unwrap();
        assert_eq!(json, r#"{"kmeans":{"k":3,"max_iters":7}}"#);
    }
}
