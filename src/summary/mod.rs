//! Turns a raw worksheet into the three result tables.
//!
//! The stages run in a fixed order: header promotion, projection onto the
//! product fields, the drop-incomplete filter, ranking, and finally the two
//! concentration summaries. Every total and percentage is computed against the
//! same filtered record set that feeds the ranking.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{ReportError, Result};
use crate::model::{
    CellValue, DataTable, PartialRecord, ProductRecord, RawSheet, ResultBundle, SummaryRow,
    SummaryTable, SummaryValue, TopSeller, TopSellers,
};
use crate::schema::SheetSchema;

/// Sheet name of the quantity summary.
pub const QUANTITY_SHEET: &str = "Resumen Cantidades";
/// Sheet name of the price summary.
pub const PRICE_SHEET: &str = "Resumen Precios";

/// Drops the leading `skip_rows` rows, promotes the next row to column names
/// and returns the rows below it.
pub fn promote_header(raw: RawSheet, skip_rows: usize) -> Result<DataTable> {
    if raw.height() <= skip_rows {
        return Err(ReportError::Schema(format!(
            "worksheet has {} rows, header expected at row {}",
            raw.height(),
            skip_rows + 1
        )));
    }

    let width = raw.rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut rows = raw.rows.into_iter().skip(skip_rows);
    let header = rows.next().unwrap_or_default();

    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(width);
    for idx in 0..width {
        let label = match header.get(idx) {
            Some(cell) if !cell.is_empty() => cell.to_string(),
            _ => format!("Unnamed: {idx}"),
        };
        columns.push(unique_label(label, &mut seen));
    }

    let rows: Vec<Vec<CellValue>> = rows.collect();
    debug!(columns = columns.len(), rows = rows.len(), "header promoted");
    Ok(DataTable { columns, rows })
}

fn unique_label(label: String, seen: &mut HashSet<String>) -> String {
    if seen.insert(label.clone()) {
        return label;
    }
    let mut suffix = 1;
    loop {
        let candidate = format!("{label}.{suffix}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Projects every data row onto name, brand, quantity and unit price.
pub fn project_records(table: &DataTable, schema: &SheetSchema) -> Result<Vec<PartialRecord>> {
    let missing: Vec<&str> = schema
        .required_columns()
        .into_iter()
        .filter(|column| table.column_index(column).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::Schema(format!(
            "missing required columns {missing:?}; found {:?}",
            table.columns
        )));
    }

    let index = |name: &str| table.column_index(name).unwrap_or_default();
    let name_idx = index(&schema.name_column);
    let brand_idx = index(&schema.brand_column);
    let quantity_idx = index(&schema.quantity_column);
    let price_idx = index(&schema.price_column);

    Ok((0..table.rows.len())
        .map(|row| PartialRecord {
            name: table.cell(row, name_idx).as_text(),
            brand: table.cell(row, brand_idx).as_text(),
            quantity: table.cell(row, quantity_idx).as_number(),
            unit_price: table.cell(row, price_idx).as_number(),
        })
        .collect())
}

/// Keeps only records with every field present, in their original order.
pub fn drop_incomplete(records: Vec<PartialRecord>) -> Vec<ProductRecord> {
    records.into_iter().filter_map(PartialRecord::complete).collect()
}

/// The `limit` records with the highest quantity, descending. Equal
/// quantities keep their original row order.
pub fn rank_by_quantity(records: &[ProductRecord], limit: usize) -> Vec<ProductRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|lhs, rhs| rhs.quantity.total_cmp(&lhs.quantity));
    ranked.truncate(limit);
    ranked
}

/// Quantity and price sums over a record set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub quantity: f64,
    pub price: f64,
}

impl Totals {
    pub fn of(records: &[ProductRecord]) -> Self {
        records.iter().fold(Totals::default(), |acc, record| Totals {
            quantity: acc.quantity + record.quantity,
            price: acc.price + record.total_price,
        })
    }
}

/// `part / total × 100`, refusing to divide by a zero total.
pub fn percentage(part: f64, total: f64, what: &str) -> Result<f64> {
    if total == 0.0 {
        return Err(ReportError::DegenerateInput(format!(
            "total {what} is zero; concentration percentage is undefined"
        )));
    }
    let share = part / total * 100.0;
    if !share.is_finite() {
        return Err(ReportError::DegenerateInput(format!(
            "concentration percentage of {what} is not finite"
        )));
    }
    Ok(share)
}

/// Two decimals followed by a percent sign, e.g. `42.50%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Dollar prefix, thousands separators and two decimals, e.g. `$1,234.50`.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("${sign}{}.{frac_part}", group_thousands(int_part, ','))
}

fn group_thousands(int_part: &str, sep: char) -> String {
    let mut out = String::new();
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        let pos_from_end = len - i;
        out.push(ch);
        if pos_from_end > 1 && pos_from_end % 3 == 1 {
            out.push(sep);
        }
    }
    out
}

/// Builds the result bundle from an already filtered record set.
pub fn summarize(records: &[ProductRecord], schema: &SheetSchema) -> Result<ResultBundle> {
    let top = rank_by_quantity(records, schema.top_n);
    if top.len() < schema.top_n {
        warn!(
            available = top.len(),
            requested = schema.top_n,
            "fewer valid records than the ranking limit"
        );
    }

    let all = Totals::of(records);
    let top_totals = Totals::of(&top);
    let quantity_share = percentage(top_totals.quantity, all.quantity, "quantity")?;
    let price_share = percentage(top_totals.price, all.price, "price")?;

    let n = schema.top_n;
    let quantity_summary = SummaryTable {
        sheet_name: QUANTITY_SHEET.to_string(),
        rows: vec![
            SummaryRow::new(
                "Total de productos vendidos",
                SummaryValue::Number(all.quantity),
            ),
            SummaryRow::new(
                format!("Total de los {n} productos más vendidos"),
                SummaryValue::Number(top_totals.quantity),
            ),
            SummaryRow::new(
                format!("Porcentaje de los {n} productos más vendidos"),
                SummaryValue::Text(format_percent(quantity_share)),
            ),
        ],
    };

    let price_summary = SummaryTable {
        sheet_name: PRICE_SHEET.to_string(),
        rows: vec![
            SummaryRow::new(
                "Total del precio de todos los productos vendidos",
                SummaryValue::Text(format_currency(all.price)),
            ),
            SummaryRow::new(
                format!("Total del precio de los {n} productos más vendidos"),
                SummaryValue::Text(format_currency(top_totals.price)),
            ),
            SummaryRow::new(
                format!("Porcentaje del precio de los {n} productos más vendidos respecto al total"),
                SummaryValue::Text(format_percent(price_share)),
            ),
        ],
    };

    let columns = schema.export_columns().map(str::to_string);
    Ok(ResultBundle {
        top_sellers: TopSellers {
            columns,
            rows: top.iter().map(TopSeller::from).collect(),
        },
        quantity_summary,
        price_summary,
    })
}

/// Runs every stage from the raw grid to the result bundle.
pub fn aggregate(raw: RawSheet, schema: &SheetSchema) -> Result<ResultBundle> {
    let table = promote_header(raw, schema.skip_rows)?;
    let records = drop_incomplete(project_records(&table, schema)?);
    debug!(
        rows = table.rows.len(),
        valid = records.len(),
        "incomplete records dropped"
    );
    summarize(&records, schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn record(name: &str, quantity: f64, unit_price: f64) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            brand: "Marca".to_string(),
            quantity,
            unit_price,
            total_price: quantity * unit_price,
        }
    }

    fn sheet_with(data: Vec<Vec<CellValue>>) -> RawSheet {
        let mut rows = vec![vec![text("Título")]];
        rows.extend(std::iter::repeat_with(Vec::new).take(6));
        rows.push(vec![
            text("Nombre producto"),
            text("Marca"),
            text("Cantidades vendidas "),
            text("Precio Reportado "),
        ]);
        rows.extend(data);
        RawSheet::new(rows)
    }

    #[test]
    fn promotes_header_after_skipped_rows() {
        let raw = sheet_with(vec![vec![
            text("Arroz"),
            text("Diana"),
            CellValue::Number(3.0),
            CellValue::Number(2500.0),
        ]]);
        let original_height = raw.height();
        let table = promote_header(raw, 7).unwrap();

        assert_eq!(table.columns[2], "Cantidades vendidas ");
        assert_eq!(table.rows.len(), original_height - 8);
    }

    #[test]
    fn header_labels_are_made_unique() {
        let raw = RawSheet::new(vec![
            vec![text("A"), text("A"), CellValue::Empty, CellValue::Number(5.0)],
            vec![text("x")],
        ]);
        let table = promote_header(raw, 0).unwrap();

        assert_eq!(table.columns, vec!["A", "A.1", "Unnamed: 2", "5"]);
    }

    #[test]
    fn short_sheet_is_a_schema_error() {
        let raw = RawSheet::new(vec![vec![text("only")]; 7]);
        assert!(matches!(promote_header(raw, 7), Err(ReportError::Schema(_))));
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let raw = RawSheet::new(vec![vec![text("Nombre producto"), text("Marca")]]);
        let table = promote_header(raw, 0).unwrap();
        let err = project_records(&table, &SheetSchema::default()).unwrap_err();

        assert!(matches!(err, ReportError::Schema(message) if message.contains("Cantidades vendidas ")));
    }

    #[test]
    fn records_with_a_missing_field_are_dropped() {
        let raw = sheet_with(vec![
            vec![text("Arroz"), text("Diana"), CellValue::Number(3.0), CellValue::Number(10.0)],
            vec![text("Leche"), text("Alpina"), CellValue::Empty, CellValue::Number(10.0)],
            vec![text("Café"), CellValue::Empty, CellValue::Number(2.0), CellValue::Number(10.0)],
            vec![text("Sal"), text("Refisal"), CellValue::Number(1.0), text("n.d.")],
            vec![text("Azúcar"), text("Manuelita"), text(" 4 "), CellValue::Number(10.0)],
            vec![text(""), text("Zenú"), CellValue::Number(8.0), CellValue::Number(10.0)],
            vec![text("Atún"), text(""), CellValue::Number(6.0), CellValue::Number(10.0)],
        ]);
        let table = promote_header(raw, 7).unwrap();
        let records = drop_incomplete(project_records(&table, &SheetSchema::default()).unwrap());

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Arroz", "Azúcar"]);
        assert_eq!(records[1].total_price, 40.0);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let records = vec![
            record("a", 5.0, 1.0),
            record("b", 9.0, 1.0),
            record("c", 5.0, 1.0),
            record("d", 7.0, 1.0),
        ];
        let ranked = rank_by_quantity(&records, 3);

        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "a"]);
    }

    #[test]
    fn zero_total_quantity_is_degenerate() {
        let records = vec![record("a", 0.0, 10.0), record("b", 0.0, 5.0)];
        let err = summarize(&records, &SheetSchema::default()).unwrap_err();

        assert!(matches!(err, ReportError::DegenerateInput(_)));
    }

    #[test]
    fn zero_total_price_is_degenerate() {
        let records = vec![record("a", 5.0, 0.0), record("b", 3.0, 0.0)];
        let err = summarize(&records, &SheetSchema::default()).unwrap_err();

        assert!(matches!(err, ReportError::DegenerateInput(message) if message.contains("price")));
    }

    #[test]
    fn empty_record_set_is_degenerate() {
        assert!(matches!(
            summarize(&[], &SheetSchema::default()),
            Err(ReportError::DegenerateInput(_))
        ));
    }

    #[test]
    fn summaries_share_the_filtered_record_set() {
        let records: Vec<ProductRecord> = (1..=12)
            .map(|i| record(&format!("p{i}"), i as f64, 100.0))
            .collect();
        let bundle = summarize(&records, &SheetSchema::default()).unwrap();

        assert_eq!(bundle.top_sellers.rows.len(), 10);
        assert_eq!(bundle.top_sellers.rows[0].name, "p12");
        assert_eq!(bundle.quantity_summary.rows[0].value, SummaryValue::Number(78.0));
        assert_eq!(bundle.quantity_summary.rows[1].value, SummaryValue::Number(75.0));
        assert_eq!(
            bundle.quantity_summary.rows[2].value,
            SummaryValue::Text("96.15%".into())
        );
        assert_eq!(
            bundle.price_summary.rows[0].value,
            SummaryValue::Text("$7,800.00".into())
        );
        assert_eq!(
            bundle.price_summary.rows[2].value,
            SummaryValue::Text("96.15%".into())
        );
    }

    #[test]
    fn fewer_records_than_limit_returns_all() {
        let records = vec![record("a", 2.0, 1.0), record("b", 3.0, 1.0)];
        let bundle = summarize(&records, &SheetSchema::default()).unwrap();

        assert_eq!(bundle.top_sellers.rows.len(), 2);
        assert_eq!(
            bundle.quantity_summary.rows[2].value,
            SummaryValue::Text("100.00%".into())
        );
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-1234.5), "$-1,234.50");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(format_percent(12.0), "12.00%");
        assert_eq!(format_percent(33.33333), "33.33%");
    }
}
