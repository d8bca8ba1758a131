use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::model::{CellValue, RawSheet};

/// Reads the named worksheet as a headerless grid anchored at cell A1.
///
/// The reader trims leading empty rows and columns from the used range; those
/// are restored as empty cells so row offsets count absolute sheet rows.
pub fn read_raw_sheet(path: &Path, sheet: &str) -> Result<RawSheet> {
    if !path.exists() {
        return Err(ReportError::MissingInput(path.to_path_buf()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = read_required_sheet(&mut workbook, sheet)?;

    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); first_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; first_col as usize];
        cells.extend(row.iter().map(to_cell_value));
        rows.push(cells);
    }

    debug!(sheet, rows = rows.len(), first_row, first_col, "worksheet loaded");
    Ok(RawSheet::new(rows))
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ReportError::MissingSheet {
            sheet: name.to_string(),
            available: workbook.sheet_names().join(", "),
        })?;
    let range = range_result.map_err(ReportError::from)?;
    Ok(range)
}

fn to_cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Boolean(*value),
        DataType::Empty | DataType::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}
