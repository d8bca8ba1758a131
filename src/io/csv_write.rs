use std::path::Path;

use crate::error::Result;
use crate::model::TopSellers;

/// Writes the top-seller listing as comma-separated UTF-8 text with a header
/// row and no index column. Any existing file at `path` is replaced.
pub fn write_top_sellers(path: &Path, top_sellers: &TopSellers) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&top_sellers.columns)?;

    for seller in &top_sellers.rows {
        let unit_price = seller.unit_price.to_string();
        let total_price = seller.total_price.to_string();
        writer.write_record([
            seller.name.as_str(),
            seller.brand.as_str(),
            unit_price.as_str(),
            total_price.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
