mod pipeline;
mod report;
mod shutdown;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use revscan_core::{AppConfig, LocatorMode, SourceMode};
use tracing_subscriber::EnvFilter;

use crate::pipeline::RunOptions;

#[derive(Debug, Parser)]
#[command(name = "revscan")]
#[command(about = "Business review acquisition and sentiment classification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Locate, fetch and classify reviews for every input record
    Run(RunArgs),
    /// Write a markdown report from a results file
    Report {
        /// Results file to read (defaults to `REVSCAN_OUTPUT_PATH`)
        #[arg(long)]
        results: Option<PathBuf>,
        /// Report file to write (defaults to `REVSCAN_REPORT_PATH`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Process at most this many records
    #[arg(long)]
    limit: Option<usize>,
    /// Skip the first N input records
    #[arg(long, default_value = "0")]
    start_from: usize,
    /// Discard the progress file before running
    #[arg(long)]
    reset: bool,
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    progress: Option<PathBuf>,
    /// CSV file mapping business names to review-page URLs
    #[arg(long)]
    urls: Option<PathBuf>,
    /// lookup, search or prompt
    #[arg(long)]
    locator: Option<LocatorMode>,
    /// scrape or api
    #[arg(long)]
    source: Option<SourceMode>,
}

impl RunArgs {
    /// Flags win over the environment.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.input {
            config.input_path.clone_from(path);
        }
        if let Some(path) = &self.output {
            config.output_path.clone_from(path);
        }
        if let Some(path) = &self.progress {
            config.progress_path.clone_from(path);
        }
        if let Some(path) = &self.urls {
            config.urls_path.clone_from(path);
        }
        if let Some(locator) = self.locator {
            config.locator = locator;
        }
        if let Some(source) = self.source {
            config.source = source;
        }
    }

    fn options(&self, config: &AppConfig) -> RunOptions {
        RunOptions {
            limit: self.limit,
            start_from: self.start_from,
            reset: self.reset,
            inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = revscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run(args) => {
            args.apply(&mut config);
            config.validate()?;
            let options = args.options(&config);
            let summary = pipeline::run(&config, &options, shutdown::shutdown_signal()).await?;
            println!("{summary}");
            println!("Results saved to: {}", config.output_path.display());
        }
        Commands::Report { results, output } => {
            let results = results.unwrap_or(config.output_path);
            let output = output.unwrap_or(config.report_path);
            report::write_report(&results, &output)?;
            println!("Report saved to: {}", output.display());
        }
    }

    Ok(())
}
