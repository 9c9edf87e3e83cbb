//! Experiment orchestration: preprocess once, then either cross-validate on
//! the training split or fit once and score the held-out test split.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ExperimentConfig;
use crate::cross_validation::{check_fold_count, cross_validate, CrossValidationReport};
use crate::data_handling::Dataset;
use crate::error::Result;
use crate::metrics::Scores;
use crate::models::factory::build_method;
use crate::preprocessing::prepare;

/// Scores from a single fit on the full training split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    pub train: Scores,
    pub test: Scores,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum Evaluation {
    Validation(CrossValidationReport),
    Test(TestReport),
}

/// Everything a run produces, serialisable as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentOutcome {
    pub method: String,
    pub variance_retained: Option<f64>,
    pub evaluation: Evaluation,
}

/// Run the experiment described by `config` on an already loaded dataset.
pub fn run_experiment(config: &ExperimentConfig, dataset: &Dataset) -> Result<ExperimentOutcome> {
    config.validate()?;
    if !config.evaluation.test {
        check_fold_count(dataset.train.n_samples(), config.evaluation.k_fold)?;
    }
    dataset.log_input_data_summary();

    let prepared = prepare(dataset, &config.preprocessing)?;
    let seed = config.seed;
    let method_config = &config.method;

    let evaluation = if config.evaluation.test {
        log::info!("Fitting {} on the full training split", method_config.name());
        let mut method = build_method(method_config, seed)?;
        let train_preds = method.fit(&prepared.x_train, &dataset.y_train)?;
        let test_preds = method.predict(&prepared.x_test)?;
        Evaluation::Test(TestReport {
            train: Scores::compute(&train_preds, &dataset.y_train)?,
            test: Scores::compute(&test_preds, &dataset.y_test)?,
        })
    } else {
        let shuffle_seed = config.evaluation.shuffle.then_some(seed);
        let report = cross_validate(
            &prepared.x_train,
            &dataset.y_train,
            config.evaluation.k_fold,
            shuffle_seed,
            || build_method(method_config, seed),
        )?;
        Evaluation::Validation(report)
    };

    Ok(ExperimentOutcome {
        method: method_config.name().to_string(),
        variance_retained: prepared.variance_retained,
        evaluation,
    })
}

fn write_scores(f: &mut fmt::Formatter<'_>, split: &str, scores: &Scores) -> fmt::Result {
    writeln!(
        f,
        "{} set: accuracy = {:.3}% - F1-score = {:.6}",
        split, scores.accuracy, scores.macro_f1
    )
}

impl fmt::Display for ExperimentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Method: {}", self.method)?;
        if let Some(variance) = self.variance_retained {
            writeln!(
                f,
                "The total variance explained by the principal components is {:.3} %",
                variance
            )?;
        }
        match &self.evaluation {
            Evaluation::Test(report) => {
                write_scores(f, "Train", &report.train)?;
                write_scores(f, "Test", &report.test)
            }
            Evaluation::Validation(report) => {
                for fold in &report.folds {
                    writeln!(f, "Fold {}/{}", fold.fold + 1, report.folds.len())?;
                    write_scores(f, "Train", &fold.train)?;
                    write_scores(f, "Validation", &fold.validation)?;
                }
                writeln!(
                    f,
                    "Mean validation: accuracy = {:.3}% (std {:.3}) - F1-score = {:.6} (std {:.6})",
                    report.mean_accuracy,
                    report.std_accuracy,
                    report.mean_macro_f1,
                    report.std_macro_f1
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MethodConfig;
    use crate::data_handling::SampleArray;
    use crate::error::HarnessError;

    fn toy_dataset() -> Dataset {
        let train = SampleArray::new(6, vec![2], vec![0., 0., 0., 1., 1., 0., 5., 5., 5., 6., 6., 5.]).unwrap();
        let test = SampleArray::new(2, vec![2], vec![0.5, 0.5, 5.5, 5.5]).unwrap();
        Dataset::new(train, test, vec![0, 0, 0, 1, 1, 1], vec![0, 1]).unwrap()
    }

    #[test]
    fn test_mode_reports_train_and_test() {
        let mut config = ExperimentConfig::default();
        config.evaluation.test = true;
        config.method = MethodConfig::KMeans { k: 2, max_iters: 20 };

        let outcome = run_experiment(&config, &toy_dataset()).unwrap();
        match outcome.evaluation {
            Evaluation::Test(report) => {
                assert_eq!(report.train.accuracy, 100.0);
                assert_eq!(report.test.accuracy, 100.0);
            }
            other => panic!("expected test report, got {:?}", other),
        }
        assert!(outcome.variance_retained.is_none());
    }

    #[test]
    fn validation_mode_runs_every_fold() {
        let mut config = ExperimentConfig::default();
        config.evaluation.k_fold = 3;
        config.evaluation.shuffle = true;

        let outcome = run_experiment(&config, &toy_dataset()).unwrap();
        let text = outcome.to_string();
        assert!(text.contains("Fold 3/3"));
        match outcome.evaluation {
            Evaluation::Validation(report) => assert_eq!(report.folds.len(), 3),
            other => panic!("expected validation report, got {:?}", other),
        }
    }

    #[test]
    fn fold_count_is_checked_before_preprocessing() {
        let mut config = ExperimentConfig::default();
        config.evaluation.k_fold = 10;
        // A PCA stage that would fail on its own must not be reached.
        config.preprocessing.use_pca = true;
        config.preprocessing.pca_d = 5;

        let err = run_experiment(&config, &toy_dataset()).unwrap_err();
        assert!(
            matches!(err, HarnessError::InvalidFoldCount { k: 10, n: 6 }),
            "got {}",
            err
        );
    }

    #[test]
    fn display_uses_report_format() {
        let outcome = ExperimentOutcome {
            method: "dummy_classifier".into(),
            variance_retained: None,
            evaluation: Evaluation::Test(TestReport {
                train: Scores { accuracy: 97.5, macro_f1: 0.974 },
                test: Scores { accuracy: 50.0, macro_f1: 0.5 },
            }),
        };
        let text = outcome.to_string();
        assert!(text.contains("Train set: accuracy = 97.500% - F1-score = 0.974000"));
        assert!(text.contains("Test set: accuracy = 50.000% - F1-score = 0.500000"));
    }
}
