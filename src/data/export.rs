use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::filter::Filtered;
use super::model::{Dataset, Record, PROFIT_MARGIN_COLUMN};

// ---------------------------------------------------------------------------
// Column layout shared by the CSV export and the Data tab preview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    OrderId,
    OrderDate,
    ShipDate,
    CustomerName,
    ProductName,
    Region,
    Market,
    Category,
    SubCategory,
    Segment,
    Sales,
    Profit,
    Discount,
    Quantity,
    Extra(usize),
    ProfitMargin,
}

/// Output columns: the loaded file's columns in file order, then the margin.
#[derive(Debug, Clone)]
pub struct ExportLayout {
    header: Vec<String>,
    fields: Vec<Field>,
}

impl ExportLayout {
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let mut header = Vec::with_capacity(dataset.columns.len() + 1);
        let mut fields = Vec::with_capacity(dataset.columns.len() + 1);

        for name in &dataset.columns {
            let field = match name.as_str() {
                "Order ID" => Field::OrderId,
                "Order Date" => Field::OrderDate,
                "Ship Date" => Field::ShipDate,
                "Customer Name" => Field::CustomerName,
                "Product Name" => Field::ProductName,
                "Region" => Field::Region,
                "Market" => Field::Market,
                "Category" => Field::Category,
                "Sub-Category" => Field::SubCategory,
                "Segment" => Field::Segment,
                "Sales" => Field::Sales,
                "Profit" => Field::Profit,
                "Discount" => Field::Discount,
                "Quantity" => Field::Quantity,
                other => match dataset.extra_columns.iter().position(|c| c == other) {
                    Some(i) => Field::Extra(i),
                    None => continue,
                },
            };
            header.push(name.clone());
            fields.push(field);
        }

        header.push(PROFIT_MARGIN_COLUMN.to_string());
        fields.push(Field::ProfitMargin);

        Self { header, fields }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Render one record as text cells; missing numbers become empty cells.
    pub fn row(&self, rec: &Record) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| match *field {
                Field::OrderId => rec.order_id.clone(),
                Field::OrderDate => rec.order_date.to_string(),
                Field::ShipDate => rec.ship_date.to_string(),
                Field::CustomerName => rec.customer_name.clone(),
                Field::ProductName => rec.product_name.clone(),
                Field::Region => rec.region.clone(),
                Field::Market => rec.market.clone(),
                Field::Category => rec.category.clone(),
                Field::SubCategory => rec.sub_category.clone(),
                Field::Segment => rec.segment.clone(),
                Field::Sales => rec.sales.to_string(),
                Field::Profit => rec.profit.to_string(),
                Field::Discount => rec.discount.map(|d| d.to_string()).unwrap_or_default(),
                Field::Quantity => rec.quantity.map(|q| q.to_string()).unwrap_or_default(),
                Field::Extra(i) => rec.extra.get(i).cloned().unwrap_or_default(),
                Field::ProfitMargin => rec.profit_margin_pct().to_string(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write the filtered rows as UTF-8 CSV with a header row.
pub fn write_csv<W: Write>(layout: &ExportLayout, data: &Filtered<'_>, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(layout.header()).context("writing CSV header")?;
    for rec in data.iter() {
        writer
            .write_record(layout.row(rec))
            .with_context(|| format!("writing order {}", rec.order_id))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// The download payload of the Data tab.
pub fn export_csv_bytes(dataset: &Dataset, data: &Filtered<'_>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&ExportLayout::for_dataset(dataset), data, &mut buf)?;
    Ok(buf)
}

pub fn export_to_path(dataset: &Dataset, data: &Filtered<'_>, path: &Path) -> Result<()> {
    let bytes = export_csv_bytes(dataset, data)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} rows to {}", data.len(), path.display());
    Ok(())
}

/// Header plus the first `limit` rows, rendered for the Data tab table.
pub fn preview(dataset: &Dataset, data: &Filtered<'_>, limit: usize) -> (Vec<String>, Vec<Vec<String>>) {
    let layout = ExportLayout::for_dataset(dataset);
    let rows = data.iter().take(limit).map(|rec| layout.row(rec)).collect();
    (layout.header().to_vec(), rows)
}
