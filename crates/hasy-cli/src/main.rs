use anyhow::Result;
use clap::ArgMatches;
use log::LevelFilter;
use std::path::PathBuf;

use hasy_classifiers::config::ExperimentConfig;
use hasy_classifiers::experiment::run_experiment;
use hasy_classifiers::io::load_dataset;
use hasy_cli::cli::build_cli;
use hasy_cli::experiment::input::from_arguments;
use hasy_cli::experiment::output::write_outcome;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("HASY_LOG", "error,hasy=info"))
        .init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => handle_run(run_matches),
        Some(("config", _)) => {
            println!("{}", serde_json::to_string_pretty(&ExperimentConfig::default())?);
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_run(matches: &ArgMatches) -> Result<()> {
    let config = from_arguments(matches.get_one::<PathBuf>("config"), matches)?;
    log::info!(
        "[hasy] Running {} on {:?} ({})",
        config.method.name(),
        config.data,
        if config.evaluation.test {
            "test mode".to_string()
        } else {
            format!("{}-fold cross-validation", config.evaluation.k_fold)
        }
    );

    let dataset = load_dataset(&config.data, &config.loader)?;
    match run_experiment(&config, &dataset) {
        Ok(outcome) => {
            print!("{}", outcome);
            if let Some(output_path) = matches.get_one::<PathBuf>("output") {
                write_outcome(&outcome, output_path)?;
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Experiment failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
