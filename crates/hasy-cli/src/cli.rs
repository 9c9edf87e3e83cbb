use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, ValueHint};

/// The `hasy` command line definition.
pub fn build_cli() -> Command {
    Command::new("hasy")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("hasy - train and evaluate classifiers with k-fold cross-validation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Run one experiment: cross-validation, or a single train/test evaluation with --test")
                .arg(
                    Arg::new("config")
                        .help("Path to experiment JSON configuration file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("data")
                        .short('d')
                        .long("data")
                        .help(
                            "Directory holding train.csv and test.csv (or .tsv). \
                             Overrides the data directory in the configuration file.",
                        )
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("method")
                        .short('m')
                        .long("method")
                        .help("Method to evaluate: dummy_classifier, kmeans, logistic_regression, svm")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("K")
                        .long("K")
                        .help("Number of clusters for kmeans")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("lr")
                        .long("lr")
                        .help("Learning rate for logistic_regression")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("max_iters")
                        .long("max-iters")
                        .help("Iteration cap for kmeans and logistic_regression")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("test")
                        .long("test")
                        .help("Fit on the full training split and evaluate on the test split")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("svm_c")
                        .long("svm-c")
                        .help("Penalty parameter C of the SVM")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("svm_kernel")
                        .long("svm-kernel")
                        .help("SVM kernel")
                        .value_parser(["linear", "poly", "rbf"]),
                )
                .arg(
                    Arg::new("svm_gamma")
                        .long("svm-gamma")
                        .help("Kernel coefficient for the poly and rbf kernels")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("svm_degree")
                        .long("svm-degree")
                        .help("Degree of the poly kernel")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    Arg::new("svm_coef0")
                        .long("svm-coef0")
                        .help("Independent term of the poly kernel")
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for k-means initialisation and fold shuffling")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("k_fold")
                        .short('k')
                        .long("k-fold")
                        .help("Number of cross-validation folds")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("shuffle")
                        .long("shuffle")
                        .help("Shuffle sample order (seeded) before cutting folds")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("append_bias")
                        .long("append-bias")
                        .help("Append a constant column of 1s to the features")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("normalize")
                        .long("normalize")
                        .help("Standardise features with training mean and std")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("use_pca")
                        .long("use-pca")
                        .help("Reduce features with PCA fitted on the training split")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("pca_d")
                        .long("pca-d")
                        .help("Number of principal components to keep")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Write the results as JSON to this file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(Command::new("config").about("Print the default experiment configuration as JSON"))
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
}
