use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Dimension – categorical columns used for filtering and grouping
// ---------------------------------------------------------------------------

/// A categorical column of the sales table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Region,
    Market,
    Category,
    SubCategory,
    Segment,
    CustomerName,
    ProductName,
}

impl Dimension {
    /// The five dimensions exposed as sidebar filters, in sidebar order.
    pub const FILTERS: [Dimension; 5] = [
        Dimension::Region,
        Dimension::Category,
        Dimension::SubCategory,
        Dimension::Segment,
        Dimension::Market,
    ];

    /// Column header in the source CSV.
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Region => "Region",
            Dimension::Market => "Market",
            Dimension::Category => "Category",
            Dimension::SubCategory => "Sub-Category",
            Dimension::Segment => "Segment",
            Dimension::CustomerName => "Customer Name",
            Dimension::ProductName => "Product Name",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// Measure – numeric columns that can be summed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    Sales,
    Profit,
    Discount,
    Quantity,
    ProfitMargin,
}

impl Measure {
    pub fn column_name(self) -> &'static str {
        match self {
            Measure::Sales => "Sales",
            Measure::Profit => "Profit",
            Measure::Discount => "Discount",
            Measure::Quantity => "Quantity",
            Measure::ProfitMargin => PROFIT_MARGIN_COLUMN,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Header of the derived margin column appended on export.
pub const PROFIT_MARGIN_COLUMN: &str = "Profit Margin %";

// ---------------------------------------------------------------------------
// Record – one order line
// ---------------------------------------------------------------------------

/// A single cleaned row of the sales table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub ship_date: NaiveDate,
    pub customer_name: String,
    pub product_name: String,
    pub region: String,
    pub market: String,
    pub category: String,
    pub sub_category: String,
    pub segment: String,
    pub sales: f64,
    pub profit: f64,
    /// `None` when the source cell was blank or not a number.
    pub discount: Option<f64>,
    pub quantity: Option<u32>,
    /// Pass-through columns, aligned with [`Dataset::extra_columns`].
    pub extra: Vec<String>,
}

impl Record {
    /// Profit as a percentage of sales; zero-sales rows have a margin of 0.
    pub fn profit_margin_pct(&self) -> f64 {
        if self.sales != 0.0 {
            self.profit / self.sales * 100.0
        } else {
            0.0
        }
    }

    pub fn dimension(&self, dim: Dimension) -> &str {
        match dim {
            Dimension::Region => &self.region,
            Dimension::Market => &self.market,
            Dimension::Category => &self.category,
            Dimension::SubCategory => &self.sub_category,
            Dimension::Segment => &self.segment,
            Dimension::CustomerName => &self.customer_name,
            Dimension::ProductName => &self.product_name,
        }
    }

    /// Numeric value of a measure; missing discount/quantity count as 0.
    pub fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Sales => self.sales,
            Measure::Profit => self.profit,
            Measure::Discount => self.discount.unwrap_or(0.0),
            Measure::Quantity => self.quantity.map(f64::from).unwrap_or(0.0),
            Measure::ProfitMargin => self.profit_margin_pct(),
        }
    }
}

// ---------------------------------------------------------------------------
// DateRange – inclusive interval of calendar days
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Build a valid range from possibly incomplete or out-of-range input.
    ///
    /// * a missing bound falls back to the observed bound
    /// * bounds outside `observed` are clamped into it
    /// * an inverted interval (start > end) falls back to `observed`
    pub fn resolve(start: Option<NaiveDate>, end: Option<NaiveDate>, observed: DateRange) -> Self {
        let start = start.unwrap_or(observed.start);
        let end = end.unwrap_or(observed.end);

        if start > end {
            log::warn!("Date range {start}..{end} is inverted, using full range {observed}");
            return observed;
        }

        let clamped = DateRange {
            start: start.clamp(observed.start, observed.end),
            end: end.clamp(observed.start, observed.end),
        };
        if clamped.start != start || clamped.end != end {
            log::debug!("Clamped date range {start}..{end} to {clamped}");
        }
        clamped
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete cleaned table
// ---------------------------------------------------------------------------

/// The cleaned dataset with pre-computed sidebar options.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All cleaned rows in file order.
    pub records: Vec<Record>,
    /// Kept CSV headers in file order (`Postal Code` removed).
    pub columns: Vec<String>,
    /// Headers of the pass-through columns stored in [`Record::extra`].
    pub extra_columns: Vec<String>,
    /// Sorted distinct non-empty values of each filter dimension.
    pub options: BTreeMap<Dimension, BTreeSet<String>>,
    /// Observed order-date interval; `None` only for an empty dataset.
    pub date_range: Option<DateRange>,
    /// Source rows excluded during cleaning.
    pub dropped_rows: usize,
}

impl Dataset {
    /// Build option lists and the observed date range from cleaned records.
    pub fn from_records(
        records: Vec<Record>,
        columns: Vec<String>,
        extra_columns: Vec<String>,
        dropped_rows: usize,
    ) -> Self {
        let mut options: BTreeMap<Dimension, BTreeSet<String>> = Dimension::FILTERS
            .iter()
            .map(|&dim| (dim, BTreeSet::new()))
            .collect();

        let mut date_range: Option<DateRange> = None;

        for rec in &records {
            for dim in Dimension::FILTERS {
                let value = rec.dimension(dim);
                if !value.is_empty() {
                    options.entry(dim).or_default().insert(value.to_string());
                }
            }
            date_range = Some(match date_range {
                None => DateRange::new(rec.order_date, rec.order_date),
                Some(r) => DateRange::new(r.start.min(rec.order_date), r.end.max(rec.order_date)),
            });
        }

        Dataset {
            records,
            columns,
            extra_columns,
            options,
            date_range,
            dropped_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sidebar options of one dimension (empty set if the dimension is unknown).
    pub fn options_for(&self, dim: Dimension) -> BTreeSet<String> {
        self.options.get(&dim).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A record with sensible defaults; callers override what they test.
    pub fn record(order_id: &str, order_date: NaiveDate, sales: f64, profit: f64) -> Record {
        Record {
            order_id: order_id.to_string(),
            order_date,
            ship_date: order_date,
            customer_name: "Aaron Bergman".to_string(),
            product_name: "Staples".to_string(),
            region: "West".to_string(),
            market: "US".to_string(),
            category: "Office Supplies".to_string(),
            sub_category: "Fasteners".to_string(),
            segment: "Consumer".to_string(),
            sales,
            profit,
            discount: Some(0.0),
            quantity: Some(1),
            extra: Vec::new(),
        }
    }

    pub fn dataset(records: Vec<Record>) -> Dataset {
        Dataset::from_records(records, Vec::new(), Vec::new(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn margin_is_zero_when_sales_is_zero() {
        let rec = record("A-1", date(2014, 1, 1), 0.0, -5.0);
        assert_eq!(rec.profit_margin_pct(), 0.0);

        let rec = record("A-2", date(2014, 1, 1), 200.0, 50.0);
        assert!((rec.profit_margin_pct() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn options_skip_empty_values_and_are_sorted() {
        let mut a = record("A-1", date(2013, 5, 1), 10.0, 1.0);
        a.region = "South".into();
        let mut b = record("A-2", date(2012, 1, 3), 10.0, 1.0);
        b.region = "Central".into();
        let mut c = record("A-3", date(2014, 12, 31), 10.0, 1.0);
        c.region = String::new();

        let ds = dataset(vec![a, b, c]);
        let regions: Vec<_> = ds.options_for(Dimension::Region).into_iter().collect();
        assert_eq!(regions, vec!["Central".to_string(), "South".to_string()]);
        assert_eq!(
            ds.date_range,
            Some(DateRange::new(date(2012, 1, 3), date(2014, 12, 31)))
        );
    }

    #[test]
    fn resolve_defaults_clamps_and_rejects_inverted() {
        let observed = DateRange::new(date(2011, 1, 1), date(2014, 12, 31));

        assert_eq!(DateRange::resolve(None, None, observed), observed);
        assert_eq!(
            DateRange::resolve(Some(date(2010, 6, 1)), Some(date(2012, 1, 1)), observed),
            DateRange::new(date(2011, 1, 1), date(2012, 1, 1))
        );
        assert_eq!(
            DateRange::resolve(Some(date(2013, 1, 1)), None, observed),
            DateRange::new(date(2013, 1, 1), date(2014, 12, 31))
        );
        assert_eq!(
            DateRange::resolve(Some(date(2014, 1, 1)), Some(date(2012, 1, 1)), observed),
            observed
        );
    }
}
