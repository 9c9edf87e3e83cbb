//! Integration tests for config loading and command line overrides.

use hasy_classifiers::config::{ExperimentConfig, Kernel, MethodConfig};
use hasy_cli::cli::build_cli;
use hasy_cli::experiment::input::{from_arguments, load_config};

fn run_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["hasy", "run"];
    argv.extend_from_slice(args);
    let matches = build_cli().try_get_matches_from(argv).unwrap();
    matches.subcommand_matches("run").unwrap().clone()
}

#[test]
fn defaults_without_config_or_flags() {
    let config = from_arguments(None, &run_matches(&[])).unwrap();
    assert_eq!(config.seed, 80);
    assert_eq!(config.evaluation.k_fold, 5);
    assert_eq!(config.method, MethodConfig::Dummy { label: 0 });
}

#[test]
fn flags_override_method_and_pipeline() {
    let matches = run_matches(&[
        "--method", "svm", "--svm-kernel", "rbf", "--svm-gamma", "0.25", "--svm-coef0", "-1.5",
        "--normalize", "--use-pca", "--pca-d", "20", "--test", "--seed", "3",
    ]);
    let config = from_arguments(None, &matches).unwrap();
    assert_eq!(
        config.method,
        MethodConfig::Svm {
            c: 1.0,
            kernel: Kernel::Rbf,
            gamma: 0.25,
            degree: 1,
            coef0: -1.5,
        }
    );
    assert!(config.preprocessing.normalize);
    assert!(config.preprocessing.use_pca);
    assert_eq!(config.preprocessing.pca_d, 20);
    assert!(config.evaluation.test);
    assert_eq!(config.seed, 3);
}

#[test]
fn file_hyper_parameters_survive_same_family_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("experiment.json");
    std::fs::write(&path, r#"{ "method": { "kmeans": { "k": 4, "max_iters": 9 } } }"#).unwrap();

    let matches = run_matches(&["--method", "kmeans", "--max-iters", "30"]);
    let config = from_arguments(Some(&path), &matches).unwrap();
    assert_eq!(config.method, MethodConfig::KMeans { k: 4, max_iters: 30 });
}

#[test]
fn invalid_override_is_rejected() {
    let matches = run_matches(&["--method", "logistic_regression", "--lr", "0"]);
    assert!(from_arguments(None, &matches).is_err());
}

#[test]
fn default_config_round_trips_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("default.json");
    let json = serde_json::to_string_pretty(&ExperimentConfig::default()).unwrap();
    std::fs::write(&path, json).unwrap();

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.method, ExperimentConfig::default().method);
    assert_eq!(loaded.preprocessing, ExperimentConfig::default().preprocessing);
}

#[test]
fn malformed_config_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.json"));
}
