use activity_extractor::{
    aggregate, extract_all_measures, read_log_file, source_basename, write_feature_report_csv,
    write_feature_report_json, write_log_file, write_weekly_report, CommitRecord, GitRepository,
};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    version,
    about = "Extracts weekly activity time series and feature vectors from Git repositories",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract feature vectors from a repository or an exported commit log
    Features(FeaturesArgs),

    /// Clone a repository to a local directory
    Clone {
        /// Repository URL
        url: String,

        /// Destination directory
        directory: PathBuf,
    },
}

#[derive(Args)]
struct FeaturesArgs {
    #[command(flatten)]
    source: Source,

    /// Output file for the feature report
    #[arg(short, long)]
    output: PathBuf,

    /// Output file for the weekly time series report
    #[arg(short = 't', long = "time-series")]
    time_series: Option<PathBuf>,

    /// Write the exported commit log to this file (only with --repo)
    #[arg(long = "save-log")]
    save_log: Option<PathBuf>,

    /// Output format for the feature report (csv or json)
    #[arg(short, long, default_value = "csv")]
    format: String,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Source {
    /// Path to Git repository
    #[arg(short, long)]
    repo: Option<PathBuf>,

    /// Path to a previously exported commit log (8-column CSV)
    #[arg(short, long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Features(args) => run_features(args),
        Command::Clone { url, directory } => {
            GitRepository::clone(&url, &directory).context("Failed to clone repository")?;
            Ok(())
        }
    }
}

fn run_features(args: FeaturesArgs) -> anyhow::Result<()> {
    let (records, source_name) = load_records(&args)?;

    let series = aggregate(&records).context("Failed to aggregate weekly series")?;

    if let Some(path) = &args.time_series {
        let rows = series
            .report_rows(&source_name)
            .context("Failed to build weekly report")?;
        write_weekly_report(path, &rows).context("Failed to write weekly report")?;
    }

    let measures = extract_all_measures(&series).context("Failed to extract features")?;

    match args.format.as_str() {
        "csv" => write_feature_report_csv(&args.output, &measures)
            .context("Failed to write feature report")?,
        "json" => write_feature_report_json(&args.output, &measures)
            .context("Failed to write feature report")?,
        _ => anyhow::bail!("Unsupported output format: {}", args.format),
    }

    Ok(())
}

fn load_records(args: &FeaturesArgs) -> anyhow::Result<(Vec<CommitRecord>, String)> {
    if let Some(repo) = &args.source.repo {
        let repository = GitRepository::open(repo).context("Failed to open repository")?;
        let records = repository
            .export_records()
            .context("Failed to export commit history")?;

        if let Some(path) = &args.save_log {
            write_log_file(path, &records).context("Failed to write commit log")?;
        }

        return Ok((records, source_basename(repo)));
    }

    if let Some(log_file) = &args.source.log_file {
        let records = read_log_file(log_file).context("Failed to read commit log")?;
        return Ok((records, source_basename(log_file)));
    }

    anyhow::bail!("either --repo or --log-file is required")
}
