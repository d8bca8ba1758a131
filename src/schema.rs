use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ReportError, Result};

/// Rows preceding the header in the published worksheet.
pub const DEFAULT_SKIP_ROWS: usize = 7;
/// Number of records kept in the top-seller listing.
pub const DEFAULT_TOP_N: usize = 10;

pub const NAME_COLUMN: &str = "Nombre producto";
pub const BRAND_COLUMN: &str = "Marca";
/// The trailing space is part of the published label.
pub const QUANTITY_COLUMN: &str = "Cantidades vendidas ";
/// The trailing space is part of the published label.
pub const PRICE_COLUMN: &str = "Precio Reportado ";
/// Name of the derived quantity × price column.
pub const TOTAL_COLUMN: &str = "Precio total";

/// Describes where the data table sits inside the worksheet and which column
/// labels carry the fields the aggregation needs.
///
/// The defaults match the layout of the published sales annex. A JSON file
/// may override any subset of the fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SheetSchema {
    pub skip_rows: usize,
    pub name_column: String,
    pub brand_column: String,
    pub quantity_column: String,
    pub price_column: String,
    pub total_column: String,
    pub top_n: usize,
}

impl Default for SheetSchema {
    fn default() -> Self {
        Self {
            skip_rows: DEFAULT_SKIP_ROWS,
            name_column: NAME_COLUMN.to_string(),
            brand_column: BRAND_COLUMN.to_string(),
            quantity_column: QUANTITY_COLUMN.to_string(),
            price_column: PRICE_COLUMN.to_string(),
            total_column: TOTAL_COLUMN.to_string(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl SheetSchema {
    /// Loads a schema descriptor from a JSON file and validates it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let schema: SheetSchema = serde_json::from_str(&data)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Checks the descriptor is usable before any sheet is read.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(ReportError::Schema("top_n must be at least 1".into()));
        }

        let labels = [
            &self.name_column,
            &self.brand_column,
            &self.quantity_column,
            &self.price_column,
            &self.total_column,
        ];
        let mut seen = HashSet::new();
        for label in labels {
            if label.is_empty() {
                return Err(ReportError::Schema("column labels must not be empty".into()));
            }
            if !seen.insert(label.as_str()) {
                return Err(ReportError::Schema(format!(
                    "column label '{label}' is used more than once"
                )));
            }
        }
        Ok(())
    }

    /// Labels that must be present after header promotion.
    pub fn required_columns(&self) -> [&str; 4] {
        [
            &self.name_column,
            &self.brand_column,
            &self.quantity_column,
            &self.price_column,
        ]
    }

    /// Column order of the top-seller export.
    pub fn export_columns(&self) -> [&str; 4] {
        [
            &self.name_column,
            &self.brand_column,
            &self.price_column,
            &self.total_column,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let schema: SheetSchema = serde_json::from_str(r#"{"skip_rows": 3}"#).unwrap();
        assert_eq!(schema.skip_rows, 3);
        assert_eq!(schema.quantity_column, "Cantidades vendidas ");
        assert_eq!(schema.top_n, 10);
    }

    #[test]
    fn rejects_duplicate_labels() {
        let schema = SheetSchema {
            brand_column: NAME_COLUMN.to_string(),
            ..SheetSchema::default()
        };
        assert!(matches!(schema.validate(), Err(ReportError::Schema(_))));
    }

    #[test]
    fn rejects_zero_top_n() {
        let schema = SheetSchema {
            top_n: 0,
            ..SheetSchema::default()
        };
        assert!(schema.validate().is_err());
    }
}
