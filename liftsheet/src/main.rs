use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use liftsheet_core::inspect::inspect_file;
use liftsheet_core::{Dialect, Extractor, Layout, SheetSelector};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod formatter;

#[derive(Parser)]
#[command(name = "liftsheet")]
#[command(about = "Extract structured workout programs from spreadsheets into JSON", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Excel/ODS file to read
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Path of the JSON document to write
    #[arg(short, long, value_name = "FILE", required_unless_present = "inspect")]
    output: Option<PathBuf>,

    /// Sheet name, or 0-based sheet index
    #[arg(short, long, value_name = "SHEET", default_value = "0")]
    sheet: SheetSelector,

    /// Built-in layout dialect
    #[arg(short, long, value_enum, default_value = "flat", conflicts_with = "layout_file")]
    layout: LayoutDialect,

    /// Custom layout definition (TOML)
    #[arg(long, value_name = "TOML")]
    layout_file: Option<PathBuf>,

    /// Program name to use instead of the sheet title
    #[arg(long, value_name = "NAME")]
    program: Option<String>,

    /// List sheets and detected markers instead of extracting
    #[arg(long)]
    inspect: bool,

    /// Log every row decision
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutDialect {
    /// DAY/WEEK headers, one week per column range
    Flat,
    /// Week 1 and week 2 side by side in the same rows
    SideBySide,
    /// Week/Day/Block headers
    Blocks,
}

impl From<LayoutDialect> for Dialect {
    fn from(value: LayoutDialect) -> Self {
        match value {
            LayoutDialect::Flat => Dialect::Flat,
            LayoutDialect::SideBySide => Dialect::SideBySide,
            LayoutDialect::Blocks => Dialect::Blocks,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        error!(error = %err, "extraction failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut layout = match &cli.layout_file {
        Some(path) => Layout::from_file(path)
            .with_context(|| format!("Failed to load layout from {}", path.display()))?,
        None => Dialect::from(cli.layout).layout(),
    };
    if let Some(program) = cli.program {
        layout.program = Some(program);
    }

    // clap requires --output unless --inspect is given
    let output = match cli.output {
        Some(output) if !cli.inspect => output,
        _ => {
            let overview = inspect_file(&cli.input, &layout)
                .with_context(|| format!("Failed to inspect {}", cli.input.display()))?;
            formatter::print_inspection(&cli.input, &layout, &overview);
            return Ok(());
        }
    };

    let extractor = Extractor::new(layout).context("Invalid layout")?;
    formatter::print_header(&cli.input, &output, &cli.sheet, extractor.layout());

    let program = extractor
        .extract_file(&cli.input, &cli.sheet)
        .with_context(|| format!("Failed to extract {}", cli.input.display()))?;

    program
        .write_json(&output)
        .with_context(|| format!("Failed to save {}", output.display()))?;

    formatter::print_summary(&program, &output);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
