use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use super::error::LoadError;
use super::model::{Dataset, Record};

/// Column removed during cleaning; never shown or exported.
pub const DROPPED_COLUMN: &str = "Postal Code";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and clean a sales CSV.
///
/// The file is decoded as UTF-8, falling back to Latin-1 when the bytes are
/// not valid UTF-8. Rows whose order date, ship date, sales or profit cannot
/// be coerced are dropped; a missing required column is fatal.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, encoding) = decode(bytes);
    if encoding == TextEncoding::Latin1 {
        log::warn!("{} is not valid UTF-8, decoded as Latin-1", path.display());
    }

    let dataset = parse_csv(&text, path)?;
    log::info!(
        "Loaded {} rows from {} ({encoding}), {} dropped during cleaning",
        dataset.len(),
        path.display(),
        dataset.dropped_rows
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "UTF-8"),
            TextEncoding::Latin1 => write!(f, "Latin-1"),
        }
    }
}

/// UTF-8 first, Latin-1 otherwise. Latin-1 maps every byte to the code
/// point of the same value, so the fallback cannot fail.
pub fn decode(bytes: Vec<u8>) -> (String, TextEncoding) {
    match String::from_utf8(bytes) {
        Ok(text) => {
            let text = match text.strip_prefix('\u{feff}') {
                Some(rest) => rest.to_string(),
                None => text,
            };
            (text, TextEncoding::Utf8)
        }
        Err(err) => {
            let text = err.into_bytes().iter().map(|&b| char::from(b)).collect();
            (text, TextEncoding::Latin1)
        }
    }
}

// ---------------------------------------------------------------------------
// CSV parsing and cleaning
// ---------------------------------------------------------------------------

/// Positions of the typed columns in the header row.
struct ColumnIndex {
    order_id: usize,
    order_date: usize,
    ship_date: usize,
    customer_name: usize,
    product_name: usize,
    region: usize,
    market: usize,
    category: usize,
    sub_category: usize,
    segment: usize,
    sales: usize,
    profit: usize,
    discount: usize,
    quantity: usize,
}

const REQUIRED_COLUMNS: [&str; 14] = [
    "Order ID",
    "Order Date",
    "Ship Date",
    "Customer Name",
    "Product Name",
    "Region",
    "Market",
    "Category",
    "Sub-Category",
    "Segment",
    "Sales",
    "Profit",
    "Discount",
    "Quantity",
];

impl ColumnIndex {
    fn locate(headers: &[String], path: &Path) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };
        Ok(ColumnIndex {
            order_id: find("Order ID")?,
            order_date: find("Order Date")?,
            ship_date: find("Ship Date")?,
            customer_name: find("Customer Name")?,
            product_name: find("Product Name")?,
            region: find("Region")?,
            market: find("Market")?,
            category: find("Category")?,
            sub_category: find("Sub-Category")?,
            segment: find("Segment")?,
            sales: find("Sales")?,
            profit: find("Profit")?,
            discount: find("Discount")?,
            quantity: find("Quantity")?,
        })
    }
}

/// Parse already-decoded CSV text. `path` is only used in error messages.
pub fn parse_csv(text: &str, path: &Path) -> Result<Dataset, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let index = ColumnIndex::locate(&headers, path)?;

    let extra_idx: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !REQUIRED_COLUMNS.contains(&h.as_str()) && h.as_str() != DROPPED_COLUMN)
        .map(|(i, _)| i)
        .collect();
    let extra_columns: Vec<String> = extra_idx.iter().map(|&i| headers[i].clone()).collect();
    let columns: Vec<String> = headers
        .iter()
        .filter(|h| h.as_str() != DROPPED_COLUMN)
        .cloned()
        .collect();

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let row = result.map_err(csv_err)?;
        match clean_row(&row, &index, &extra_idx) {
            Some(rec) => records.push(rec),
            None => {
                log::trace!("Row {row_no}: missing or invalid date/sales/profit, dropped");
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        log::warn!("{dropped} rows in {} failed type coercion and were dropped", path.display());
    }
    if records.is_empty() {
        return Err(LoadError::NoRecords {
            path: path.to_path_buf(),
            dropped,
        });
    }

    Ok(Dataset::from_records(records, columns, extra_columns, dropped))
}

/// Coerce one raw row; `None` when a key field is missing or invalid.
fn clean_row(row: &StringRecord, index: &ColumnIndex, extra_idx: &[usize]) -> Option<Record> {
    let field = |i: usize| row.get(i).unwrap_or("");

    let order_date = parse_date(field(index.order_date))?;
    let ship_date = parse_date(field(index.ship_date))?;
    let sales = parse_number(field(index.sales))?;
    let profit = parse_number(field(index.profit))?;

    Some(Record {
        order_id: field(index.order_id).to_string(),
        order_date,
        ship_date,
        customer_name: field(index.customer_name).to_string(),
        product_name: field(index.product_name).to_string(),
        region: field(index.region).to_string(),
        market: field(index.market).to_string(),
        category: field(index.category).to_string(),
        sub_category: field(index.sub_category).to_string(),
        segment: field(index.segment).to_string(),
        sales,
        profit,
        discount: parse_number(field(index.discount)),
        quantity: parse_quantity(field(index.quantity)),
        extra: extra_idx.iter().map(|&i| field(i).to_string()).collect(),
    })
}

/// Day-first date parsing. Accepts `-`, `/` or `.` separators, two- or
/// four-digit years, ISO `yyyy-mm-dd`, and ignores a trailing time
/// (`2013-03-09 10:00` or `2013-03-09T10:00:00`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let token = s.split_whitespace().next()?.split('T').next()?;
    let sep = token.chars().find(|c| matches!(c, '-' | '/' | '.'))?;

    let parts: Vec<&str> = token.split(sep).collect();
    if parts.len() != 3 {
        return None;
    }

    let format = if parts[0].len() == 4 {
        format!("%Y{sep}%m{sep}%d")
    } else if parts[2].len() == 2 {
        format!("%d{sep}%m{sep}%y")
    } else {
        format!("%d{sep}%m{sep}%Y")
    };
    NaiveDate::parse_from_str(token, &format).ok()
}

/// Lenient float parsing: surrounding whitespace and thousands separators
/// are accepted, blanks and non-finite values are not.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let value: f64 = if s.contains(',') {
        s.replace(',', "").parse().ok()?
    } else {
        s.parse().ok()?
    };
    value.is_finite().then_some(value)
}

fn parse_quantity(s: &str) -> Option<u32> {
    let value = parse_number(s)?;
    if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}
