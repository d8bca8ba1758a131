use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::model::{SummaryTable, SummaryValue};

/// Header of the label column in every summary sheet.
pub const DESCRIPTION_HEADER: &str = "Descripción";
/// Header of the value column in every summary sheet.
pub const VALUE_HEADER: &str = "Valor";

/// Writes one worksheet per summary table, in the order given, to `path`.
pub fn write_summaries(path: &Path, tables: &[&SummaryTable]) -> Result<()> {
    let mut workbook_writer = Workbook::new();

    for table in tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;

        worksheet.write_string(0, 0, DESCRIPTION_HEADER)?;
        worksheet.write_string(0, 1, VALUE_HEADER)?;

        for (row_idx, row) in table.rows.iter().enumerate() {
            let excel_row = (row_idx + 1) as u32;
            worksheet.write_string(excel_row, 0, &row.description)?;
            match &row.value {
                SummaryValue::Number(value) => {
                    worksheet.write_number(excel_row, 1, *value)?;
                }
                SummaryValue::Text(value) => {
                    worksheet.write_string(excel_row, 1, value)?;
                }
            }
        }
    }

    workbook_writer.save(path)?;
    Ok(())
}
