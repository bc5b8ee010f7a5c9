//! rowcast CLI
//!
//! Loads semi-structured delimited text files into typed, deduplicated
//! datasets and reports on them.

mod cache;
mod config;
mod progress;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use rowcast_core::loader::{DatasetLoader, LoadStats, LoaderConfig};
use rowcast_core::summary;
use rowcast_formats::Dataset;

use config::LoadProfile;

#[derive(Parser)]
#[command(name = "rowcast")]
#[command(version, about = "Typed loading and summarizing of delimited datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,
}

/// Arguments shared by every dataset-reading subcommand
#[derive(Args)]
struct LoadArgs {
    /// Path to the delimited input file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Treat the first line as data rather than headers
    #[arg(long)]
    no_headers: bool,

    /// Column index holding a byte size, reported in megabytes
    #[arg(long)]
    size_column: Option<usize>,

    /// Loader profile file (YAML or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Always re-parse, ignoring and not writing the cache blob
    #[arg(long)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a dataset and print a summary report
    Load {
        #[command(flatten)]
        args: LoadArgs,
    },

    /// List the fields accessible in a dataset
    Fields {
        #[command(flatten)]
        args: LoadArgs,
    },

    /// Print a value frequency table for one field
    Freq {
        #[command(flatten)]
        args: LoadArgs,

        /// Field to tabulate
        #[arg(short, long)]
        field: String,

        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,
    },

    /// Average a numeric field per group of another field
    Avg {
        #[command(flatten)]
        args: LoadArgs,

        /// Field to group by
        #[arg(long)]
        by: String,

        /// Numeric field to average
        #[arg(long)]
        value: String,
    },

    /// Count records in a dataset
    Count {
        #[command(flatten)]
        args: LoadArgs,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(!cli.json) // Disable colors if JSON output
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Load { args } => load_command(args, cli.json),
        Commands::Fields { args } => fields_command(args, cli.json),
        Commands::Freq {
            args,
            field,
            ascending,
        } => freq_command(args, &field, ascending, cli.json),
        Commands::Avg { args, by, value } => avg_command(args, &by, &value, cli.json),
        Commands::Count { args } => count_command(args, cli.json),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}

fn build_loader(args: &LoadArgs) -> Result<DatasetLoader> {
    let mut config: LoaderConfig = match &args.config {
        Some(path) => LoadProfile::load(path)?.into(),
        None => LoaderConfig::default(),
    };
    if args.no_headers {
        config.has_headers = false;
    }
    if args.size_column.is_some() {
        config.size_column = args.size_column;
    }
    Ok(DatasetLoader::with_config(config))
}

/// Resolve a dataset through the read-through cache.
///
/// Load statistics only exist when the dataset was actually parsed.
fn load_dataset(args: &LoadArgs) -> Result<(Dataset, Option<LoadStats>)> {
    let loader = build_loader(args)?;
    let bar = progress::loading_message(&format!("Loading {}", args.input.display()));
    let result = cache::load_or_parse(&args.input, &loader, !args.no_cache);
    bar.finish_and_clear();
    result
}

fn load_command(args: LoadArgs, json_output: bool) -> Result<()> {
    let (dataset, stats) = load_dataset(&args)?;

    if json_output {
        let report = serde_json::json!({
            "input": args.input.to_string_lossy().to_string(),
            "records": dataset.len(),
            "fields": dataset.schema().fields(),
            "from_cache": stats.is_none(),
            "source_rows": stats.map(|s| s.data_rows),
            "duplicates_removed": stats.map(|s| s.duplicates_dropped),
            "noise_rows_dropped": stats.map(|s| s.filtered),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        progress::print_summary_report(
            &args.input,
            stats.as_ref(),
            dataset.len(),
            dataset.schema().len(),
        );
    }

    Ok(())
}

fn fields_command(args: LoadArgs, json_output: bool) -> Result<()> {
    let (dataset, _) = load_dataset(&args)?;
    let fields = summary::fields(&dataset);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&fields)?);
    } else {
        println!("fields accessible through {}:", args.input.display());
        for field in fields {
            println!("{}", field);
        }
    }

    Ok(())
}

fn freq_command(args: LoadArgs, field: &str, ascending: bool, json_output: bool) -> Result<()> {
    let (dataset, _) = load_dataset(&args)?;
    let mut table = summary::freq_table(&dataset, field)?;
    if ascending {
        table.reverse();
    }

    if json_output {
        let entries: Vec<_> = table
            .iter()
            .map(|(value, pct)| {
                serde_json::json!({ "value": value.to_string(), "percent": pct })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (value, pct) in &table {
            println!("{}: {}", value, pct);
        }
    }

    Ok(())
}

fn avg_command(args: LoadArgs, by: &str, value: &str, json_output: bool) -> Result<()> {
    let (dataset, _) = load_dataset(&args)?;
    let averages = summary::average_by(&dataset, by, value)?;

    if json_output {
        let entries: Vec<_> = averages
            .iter()
            .map(|(group, avg)| serde_json::json!({ "group": group, "average": avg }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (group, avg) in &averages {
            println!("{} : {}", group, avg);
        }
    }

    Ok(())
}

fn count_command(args: LoadArgs, json_output: bool) -> Result<()> {
    let (dataset, _) = load_dataset(&args)?;

    if json_output {
        println!(
            "{}",
            serde_json::json!({ "records": dataset.len() })
        );
    } else {
        println!(
            "{}: {} records",
            args.input.display(),
            progress::format_with_commas(dataset.len())
        );
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
