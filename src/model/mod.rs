use std::fmt;

/// A single worksheet cell as read from the source workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl CellValue {
    /// Numeric view of the cell. Text holding a finite number counts as numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) if value.is_finite() => Some(*value),
            CellValue::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Text view of the cell; `None` for empty cells and empty text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(value) if value.is_empty() => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Text(value) => f.write_str(value),
            CellValue::Boolean(value) => write!(f, "{value}"),
        }
    }
}

/// The worksheet as an ordered grid of untyped cells, anchored at cell A1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSheet {
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// A rectangular table with unique, named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    /// Position of the column carrying exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Cell at `row`/`col`; short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(EMPTY)
    }
}

/// A product row as projected from the data table, before the
/// drop-incomplete filter is applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartialRecord {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
}

impl PartialRecord {
    /// Quantity × unit price; undefined if either input is absent.
    pub fn total_price(&self) -> Option<f64> {
        Some(self.quantity? * self.unit_price?).filter(|total| total.is_finite())
    }

    /// Converts into a complete record, or `None` if any field is missing.
    pub fn complete(self) -> Option<ProductRecord> {
        let total_price = self.total_price()?;
        Some(ProductRecord {
            name: self.name?,
            brand: self.brand?,
            quantity: self.quantity?,
            unit_price: self.unit_price?,
            total_price,
        })
    }
}

/// A fully populated product row taking part in the aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub brand: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_price: f64,
}

/// Published view of a top seller. Quantity is a ranking key only and is not
/// part of the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct TopSeller {
    pub name: String,
    pub brand: String,
    pub unit_price: f64,
    pub total_price: f64,
}

impl From<&ProductRecord> for TopSeller {
    fn from(record: &ProductRecord) -> Self {
        Self {
            name: record.name.clone(),
            brand: record.brand.clone(),
            unit_price: record.unit_price,
            total_price: record.total_price,
        }
    }
}

/// The ranked listing plus the labels of its four exported columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TopSellers {
    pub columns: [String; 4],
    pub rows: Vec<TopSeller>,
}

/// Value column of a summary row.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryValue {
    Number(f64),
    Text(String),
}

/// One labeled line of a summary sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub description: String,
    pub value: SummaryValue,
}

impl SummaryRow {
    pub fn new(description: impl Into<String>, value: SummaryValue) -> Self {
        Self {
            description: description.into(),
            value,
        }
    }
}

/// A summary table that will be materialised as a workbook sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub sheet_name: String,
    pub rows: Vec<SummaryRow>,
}

/// The three result tables computed from one filtered record set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBundle {
    pub top_sellers: TopSellers,
    pub quantity_summary: SummaryTable,
    pub price_summary: SummaryTable,
}
