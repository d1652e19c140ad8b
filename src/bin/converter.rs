//! Bank Converter - CLI tool for unifying per-bank CSV transaction exports.

use bank_unifier::{convert_batch, source_files, Dialect, Result};
use clap::Parser;
use std::io::{self, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "bank_converter")]
#[command(about = "Convert bank transactions from multi-format csv", long_about = None)]
struct Cli {
    /// Source files or directories containing files of the same format
    #[arg(long, num_args = 1.., required = true)]
    source: Vec<String>,

    /// Source file format (bank1, bank2, bank3)
    #[arg(long = "source-format")]
    source_format: String,

    /// Target csv file where unified records are stored
    #[arg(long = "target-file", default_value = "output.csv")]
    target_file: String,

    /// Append new records to the existing target file
    #[arg(long)]
    append: bool,

    /// CSV dialect of the target file (excel, excel_tab, unix)
    #[arg(long = "csv-dialect", default_value = "unix")]
    csv_dialect: String,
}

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    fmt().with_env_filter(env).with_writer(io::stderr).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let dialect = cli.csv_dialect.parse::<Dialect>()?;
    let files = source_files(&cli.source);

    let stdout = io::stdout();
    let stderr = io::stderr();

    for outcome in convert_batch(&files, &cli.source_format, &cli.target_file, cli.append, dialect) {
        match outcome.result {
            Ok(summary) => writeln!(
                stdout.lock(),
                "Processing completed for file {}. Records processed: {}",
                outcome.source.display(),
                summary.rows_exported
            )?,
            Err(e) => writeln!(
                stderr.lock(),
                "Error converting file {} (format: {}): {}",
                outcome.source.display(),
                cli.source_format,
                e
            )?,
        }
    }

    Ok(())
}
