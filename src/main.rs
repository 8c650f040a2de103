//! Run Summary - test run summary tool
//!
//! A CLI tool that replays recorded test-run event logs through the
//! summary aggregator and prints the execution overview and failures.
//!
//! ## Features
//!
//! - Lifecycle validation of skip/start/finish events per node
//! - Container and test counters with abort/failure distinction
//! - Parallel replay of independent nodes
//! - Text and JSON output
//!
//! ## Usage
//!
//! ```bash
//! # Print the summary of a recorded run
//! run-summary summarize run.yaml
//!
//! # Replay in parallel and write JSON to a file
//! run-summary summarize run.yaml --parallel --format json --output summary.json
//!
//! # Check an event log without printing a summary
//! run-summary validate run.json
//!
//! # Create a configuration file
//! run-summary config init
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

mod cli;

use cli::Args;
use run_summary::config::{env::print_env_help, AppConfig, EnvConfig};
use run_summary::output::{render_plan, write_summary_to_file, OutputFormat, ResultFormatter};
use run_summary::replay::{self, EventLog, ParallelReplayer};
use run_summary::summary::RunSummary;
use run_summary::utils::init_logger;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env = EnvConfig::load();
    let config = load_config(args.config.as_deref(), &env)?;

    let level = if args.verbose {
        config.log_level().verbose()
    } else {
        config.log_level()
    };
    init_logger(level);
    if env.has_any() {
        debug!("Environment overrides: {:?}", env);
    }
    debug!("Effective configuration: {:?}", config);

    match args.command {
        cli::Command::Summarize(summarize_args) => {
            let summary = run_summarize(summarize_args, &config).await?;
            if !summary.is_successful() {
                std::process::exit(summary.exit_code());
            }
        }
        cli::Command::Validate { log, tree } => {
            validate_log(&log, tree)?;
        }
        cli::Command::Config { action } => {
            manage_config(action, &config)?;
        }
        cli::Command::Env => {
            print_env_help();
        }
    }

    Ok(())
}

/// Resolve configuration: explicit path, then RUN_SUMMARY_CONFIG, then
/// standard locations, with environment overrides applied last
fn load_config(path: Option<&str>, env: &EnvConfig) -> Result<AppConfig> {
    let mut config = match path.or(env.config_file.as_deref()) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };
    config.merge_env(env);
    config.validate()?;
    Ok(config)
}

async fn run_summarize(args: cli::SummarizeArgs, config: &AppConfig) -> Result<RunSummary> {
    let log = EventLog::load(&args.log)?;

    let parallel = args.parallel || config.parallel;
    let summary = if parallel {
        let concurrent = args.concurrent.unwrap_or(config.max_concurrent);
        info!("Replaying {} in parallel ({} concurrent)", args.log, concurrent);
        ParallelReplayer::new(concurrent).summarize(&log).await?
    } else {
        info!("Replaying {}", args.log);
        replay::summarize(&log)?
    };

    let format = match &args.format {
        Some(name) => OutputFormat::from_str(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", name))?,
        None => config.output_format(),
    };
    debug!("Rendering {} summary", format.name());

    let mut formatter = ResultFormatter::new(format);
    if args.no_failures || !config.show_failures {
        formatter = formatter.without_failures();
    }

    match &args.output {
        Some(path) => {
            write_summary_to_file(path, &summary, &formatter)
                .with_context(|| format!("Failed to write summary to {}", path))?;
            info!("Summary written to {}", path);
        }
        None => {
            formatter.write_summary(&summary, &mut std::io::stdout().lock())?;
        }
    }

    Ok(summary)
}

fn validate_log(path: &str, tree: bool) -> Result<()> {
    let log = EventLog::load(path)?;
    let summary = replay::summarize(&log)?;

    if tree {
        print!("{}", render_plan(&log.build_plan()?));
    }

    println!(
        "{}: {} events, {} identifiers, {} failures",
        path,
        log.events.len(),
        summary.total_found(),
        summary.total_failure_count()
    );
    Ok(())
}

fn manage_config(action: cli::ConfigAction, config: &AppConfig) -> Result<()> {
    match action {
        cli::ConfigAction::Init { path } => {
            if std::path::Path::new(&path).exists() {
                anyhow::bail!("Config file already exists: {}", path);
            }
            AppConfig::default().save(&path)?;
            println!("Created config file: {}", path);
        }
        cli::ConfigAction::Show => {
            print!("{}", serde_yaml::to_string(config)?);
        }
    }
    Ok(())
}
