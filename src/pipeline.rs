use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::io::{csv_write, excel_read, excel_write};
use crate::model::ResultBundle;
use crate::schema::SheetSchema;
use crate::summary;

/// Destinations of the two report artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// Delimited-text export of the top sellers.
    pub csv: PathBuf,
    /// Workbook holding the quantity and price summaries.
    pub workbook: PathBuf,
}

impl ReportPaths {
    pub fn new(csv: impl Into<PathBuf>, workbook: impl Into<PathBuf>) -> Self {
        Self {
            csv: csv.into(),
            workbook: workbook.into(),
        }
    }

    /// Paths in the order they are handed to delivery: workbook, then CSV.
    pub fn attachments(&self) -> Vec<PathBuf> {
        vec![self.workbook.clone(), self.csv.clone()]
    }
}

/// Reads `sheet` from the workbook at `input` and computes the result bundle.
///
/// Either all three tables are produced or the call fails; nothing is written.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), sheet = %sheet)
)]
pub fn extract_and_aggregate(input: &Path, sheet: &str, schema: &SheetSchema) -> Result<ResultBundle> {
    schema.validate()?;
    let raw = excel_read::read_raw_sheet(input, sheet)?;
    info!(rows = raw.height(), "read worksheet");
    let bundle = summary::aggregate(raw, schema)?;
    info!(
        top_sellers = bundle.top_sellers.rows.len(),
        "aggregated worksheet"
    );
    Ok(bundle)
}

/// Writes the top sellers as CSV and both summaries as a two-sheet workbook,
/// replacing any existing files.
#[instrument(
    level = "info",
    skip_all,
    fields(csv = %paths.csv.display(), workbook = %paths.workbook.display())
)]
pub fn emit_reports(bundle: &ResultBundle, paths: &ReportPaths) -> Result<()> {
    csv_write::write_top_sellers(&paths.csv, &bundle.top_sellers)?;
    debug!(rows = bundle.top_sellers.rows.len(), "top sellers exported");
    excel_write::write_summaries(
        &paths.workbook,
        &[&bundle.quantity_summary, &bundle.price_summary],
    )?;
    info!("reports written");
    Ok(())
}

/// Runs extraction, aggregation and emission, returning the written paths.
pub fn run(
    input: &Path,
    sheet: &str,
    schema: &SheetSchema,
    paths: &ReportPaths,
) -> Result<Vec<PathBuf>> {
    let bundle = extract_and_aggregate(input, sheet, schema)?;
    emit_reports(&bundle, paths)?;
    Ok(paths.attachments())
}
