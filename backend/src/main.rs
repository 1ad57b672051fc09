//! Ridership CLI - clean the rail ridership export for the dashboard
//!
//! # Main Commands
//!
//! ```bash
//! ridership run                     # Processed dataset + holiday calendar
//! ridership process                 # Processed dataset only
//! ridership holidays --year 2023    # Holiday calendar only
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! ridership analyze                 # Null counts per line, nothing written
//! ridership tables                  # Show the default normalizer tables
//! ```

use clap::{Args, Parser, Subcommand};
use ridership::{
    analyze_nulls, load_dataset, run, run_dataset, run_holidays, text_processing, NormalizerTables,
    ReadOptions, RunOptions, RunSummary,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ridership")]
#[command(about = "Clean and enrich station-level rail ridership data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the dataset commands
#[derive(Args, Clone)]
struct DataArgs {
    /// Directory holding the input and receiving the outputs
    #[arg(long, env = "RIDERSHIP_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Raw dataset file name inside the data directory
    #[arg(short, long, default_value = "2022_rail_systems_dataset.csv")]
    input: String,

    /// Input encoding ("auto" to detect)
    #[arg(long, default_value = "iso-8859-1")]
    encoding: String,

    /// CSV delimiter ("auto" to detect)
    #[arg(short, long, default_value = ",")]
    delimiter: String,

    /// JSON file with custom translation and noise-word tables
    #[arg(long)]
    tables: Option<PathBuf>,
}

/// Options of the holiday calendar
#[derive(Args, Clone)]
struct HolidayArgs {
    /// Year of the holiday calendar
    #[arg(long, default_value = "2022")]
    year: i32,

    /// Country code
    #[arg(long, default_value = "TR")]
    country: String,

    /// `{date: name}` JSON file used instead of the built-in calendar
    #[arg(long)]
    source: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full batch: processed dataset and holiday calendar
    Run {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        holidays: HolidayArgs,

        /// Processed dataset file name
        #[arg(long, default_value = "processed_data_2022_rail_stations.csv")]
        processed: String,

        /// Holiday calendar file name
        #[arg(long, default_value = "tr_holidays.csv")]
        holidays_file: String,

        /// Skip output validation
        #[arg(long)]
        no_validate: bool,
    },

    /// Processed dataset only
    Process {
        #[command(flatten)]
        data: DataArgs,

        /// Processed dataset file name
        #[arg(long, default_value = "processed_data_2022_rail_stations.csv")]
        processed: String,

        /// Skip output validation
        #[arg(long)]
        no_validate: bool,
    },

    /// Holiday calendar only
    Holidays {
        #[command(flatten)]
        holidays: HolidayArgs,

        /// Directory receiving the calendar
        #[arg(long, env = "RIDERSHIP_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,

        /// Holiday calendar file name
        #[arg(long, default_value = "tr_holidays.csv")]
        holidays_file: String,

        /// Skip output validation
        #[arg(long)]
        no_validate: bool,
    },

    /// Report missing values per line after text normalization
    Analyze {
        #[command(flatten)]
        data: DataArgs,

        /// Output file for the JSON report (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the default normalizer tables
    Tables,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            data,
            holidays,
            processed,
            holidays_file,
            no_validate,
        } => {
            let mut options = run_options(&data, no_validate);
            apply_holiday_args(&mut options, &holidays);
            options.processed_file = processed;
            options.holidays_file = holidays_file;
            cmd_run(&options, run)
        }

        Commands::Process {
            data,
            processed,
            no_validate,
        } => {
            let mut options = run_options(&data, no_validate);
            options.processed_file = processed;
            cmd_run(&options, run_dataset)
        }

        Commands::Holidays {
            holidays,
            data_dir,
            holidays_file,
            no_validate,
        } => {
            let mut options = RunOptions {
                data_dir,
                holidays_file,
                skip_validation: no_validate,
                ..RunOptions::default()
            };
            apply_holiday_args(&mut options, &holidays);
            cmd_run(&options, run_holidays)
        }

        Commands::Analyze { data, output } => cmd_analyze(&run_options(&data, true), output.as_deref()),

        Commands::Tables => cmd_tables(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_options(data: &DataArgs, no_validate: bool) -> RunOptions {
    let encoding = match data.encoding.to_lowercase().as_str() {
        "auto" => None,
        _ => Some(data.encoding.clone()),
    };

    let delimiter = match data.delimiter.as_str() {
        "auto" => None,
        "\\t" | "tab" => Some('\t'),
        d => d.chars().next(),
    };

    RunOptions {
        data_dir: data.data_dir.clone(),
        input_file: data.input.clone(),
        read: ReadOptions { encoding, delimiter },
        tables_path: data.tables.clone(),
        skip_validation: no_validate,
        ..RunOptions::default()
    }
}

fn apply_holiday_args(options: &mut RunOptions, holidays: &HolidayArgs) {
    options.holiday_year = holidays.year;
    options.country = holidays.country.clone();
    options.holiday_source = holidays.source.clone();
}

fn cmd_run<F>(options: &RunOptions, pipeline: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&RunOptions) -> Result<RunSummary, ridership::PipelineError>,
{
    let summary = pipeline(options)?;

    if let Some(info) = &summary.csv_info {
        eprintln!("\n📄 Input: {} rows ({}, '{}')", info.row_count, info.encoding, info.delimiter);
    }
    if let Some(path) = &summary.processed_path {
        eprintln!("   {} processed rows → {}", summary.output_rows, path.display());
    }
    if let Some(path) = &summary.holidays_path {
        eprintln!("   {} holidays → {}", summary.holiday_count, path.display());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_analyze(options: &RunOptions, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let normalizer = options.normalizer()?;
    let (raw, _) = load_dataset(&options.input_path(), &options.read)?;
    let normalized = text_processing(raw, &normalizer)?;

    let reports = analyze_nulls(&normalized)?;
    eprintln!("\n📊 {} line(s) with missing values", reports.len());

    let json = serde_json::to_string_pretty(&reports)?;
    write_output(&json, output)?;
    Ok(())
}

fn cmd_tables() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", NormalizerTables::default().to_json()?);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
