use std::path::PathBuf;

use clap::Parser;
use sales_summary::pipeline::{self, ReportPaths};
use sales_summary::{ReportError, Result, SheetSchema};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error} ({})", error.kind());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(&cli.log_level)?;

    let mut schema = match &cli.schema {
        Some(path) => {
            warn!(schema = %path.display(), "overriding default worksheet layout");
            SheetSchema::from_json_file(path)?
        }
        None => SheetSchema::default(),
    };
    if let Some(top) = cli.top {
        schema.top_n = top;
    }

    let paths = ReportPaths::new(cli.csv, cli.workbook);
    let written = pipeline::run(&cli.input, &cli.sheet, &schema, &paths)?;
    for path in &written {
        info!(path = %path.display(), "report ready for delivery");
    }
    Ok(())
}

fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|error| ReportError::Logging(error.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ReportError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Summarise the best-selling products of a retail sales worksheet."
)]
struct Cli {
    /// Workbook downloaded from the publisher.
    #[arg(long)]
    input: PathBuf,

    /// Worksheet holding the sales table.
    #[arg(long, default_value = "Cantidades 1203-1603")]
    sheet: String,

    /// Destination of the top-seller CSV export.
    #[arg(long, default_value = "productos_mas_vendidos.csv")]
    csv: PathBuf,

    /// Destination of the summary workbook.
    #[arg(long, default_value = "resumen_productos.xlsx")]
    workbook: PathBuf,

    /// Optional JSON descriptor overriding the worksheet layout.
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Number of top sellers to report.
    #[arg(long)]
    top: Option<usize>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}
