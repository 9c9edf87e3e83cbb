use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;

use hasy_classifiers::config::{ExperimentConfig, Kernel, MethodConfig};

/// Hyper-parameter flags, each tied to the method families it applies to.
const METHOD_FLAGS: [(&str, &[&str]); 8] = [
    ("K", &["kmeans"]),
    ("lr", &["logistic_regression"]),
    ("max_iters", &["kmeans", "logistic_regression"]),
    ("svm_c", &["svm"]),
    ("svm_kernel", &["svm"]),
    ("svm_gamma", &["svm"]),
    ("svm_degree", &["svm"]),
    ("svm_coef0", &["svm"]),
];

/// Load an experiment configuration from a JSON file. Missing fields take
/// their default values.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ExperimentConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: ExperimentConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(config)
}

/// Build the run configuration from an optional config file plus command
/// line overrides, and validate it before any data is read.
pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<ExperimentConfig> {
    let mut config = match config_path {
        Some(path) => {
            log::info!("[hasy] Using config: {:?}", path);
            load_config(path)?
        }
        None => {
            log::info!("[hasy] No config file provided; using defaults.");
            ExperimentConfig::default()
        }
    };

    if let Some(data) = matches.get_one::<PathBuf>("data") {
        config.data = data.clone();
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.seed = *seed;
    }

    if let Some(name) = matches.get_one::<String>("method") {
        let requested = MethodConfig::from_str(name)?;
        // Keep file hyper-parameters when the family is unchanged.
        if requested.name() != config.method.name() {
            config.method = requested;
        }
    }
    apply_method_overrides(&mut config.method, matches)?;

    if matches.get_flag("test") {
        config.evaluation.test = true;
    }
    if let Some(k) = matches.get_one::<usize>("k_fold") {
        config.evaluation.k_fold = *k;
    }
    if matches.get_flag("shuffle") {
        config.evaluation.shuffle = true;
    }

    if matches.get_flag("normalize") {
        config.preprocessing.normalize = true;
    }
    if matches.get_flag("append_bias") {
        config.preprocessing.append_bias = true;
    }
    if matches.get_flag("use_pca") {
        config.preprocessing.use_pca = true;
    }
    if let Some(d) = matches.get_one::<usize>("pca_d") {
        config.preprocessing.pca_d = *d;
    }

    config.validate()?;
    Ok(config)
}

fn apply_method_overrides(method: &mut MethodConfig, matches: &ArgMatches) -> Result<()> {
    let family = method.name();
    for (flag, families) in METHOD_FLAGS {
        if matches.contains_id(flag) && !families.contains(&family) {
            log::warn!("[hasy] --{} has no effect on method {}", flag.replace('_', "-"), family);
        }
    }

    match method {
        MethodConfig::Dummy { .. } => {}
        MethodConfig::KMeans { k, max_iters } => {
            if let Some(v) = matches.get_one::<usize>("K") {
                *k = *v;
            }
            if let Some(v) = matches.get_one::<usize>("max_iters") {
                *max_iters = *v;
            }
        }
        MethodConfig::LogisticRegression { lr, max_iters } => {
            if let Some(v) = matches.get_one::<f64>("lr") {
                *lr = *v;
            }
            if let Some(v) = matches.get_one::<usize>("max_iters") {
                *max_iters = *v;
            }
        }
        MethodConfig::Svm {
            c,
            kernel,
            gamma,
            degree,
            coef0,
        } => {
            if let Some(v) = matches.get_one::<f64>("svm_c") {
                *c = *v;
            }
            if let Some(v) = matches.get_one::<String>("svm_kernel") {
                *kernel = Kernel::from_str(v)?;
            }
            if let Some(v) = matches.get_one::<f64>("svm_gamma") {
                *gamma = *v;
            }
            if let Some(v) = matches.get_one::<u32>("svm_degree") {
                *degree = *v;
            }
            if let Some(v) = matches.get_one::<f64>("svm_coef0") {
                *coef0 = *v;
            }
        }
    }
    Ok(())
}
