use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Months, NaiveDate};

use super::filter::Filtered;
use super::model::{Dimension, Measure};

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline figures of the Overview tab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_profit: f64,
    /// Mean of the per-row margins, not total profit over total sales.
    pub avg_profit_margin: f64,
    /// Distinct non-blank order ids; one order may span several rows.
    pub total_orders: usize,
}

impl Kpis {
    pub fn compute(data: &Filtered<'_>) -> Self {
        let mut total_sales = 0.0;
        let mut total_profit = 0.0;
        let mut margin_sum = 0.0;
        let mut orders: HashSet<&str> = HashSet::new();

        for rec in data.iter() {
            total_sales += rec.sales;
            total_profit += rec.profit;
            margin_sum += rec.profit_margin_pct();
            if !rec.order_id.is_empty() {
                orders.insert(rec.order_id.as_str());
            }
        }

        Kpis {
            total_sales,
            total_profit,
            avg_profit_margin: margin_sum / data.len() as f64,
            total_orders: orders.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Monthly trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyPoint {
    /// First day of the calendar month.
    pub month: NaiveDate,
    pub sales: f64,
    pub profit: f64,
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Sales and profit per calendar month, ascending.
///
/// Every month between the first and last order month is present; months
/// without rows are zero so the line chart stays continuous.
pub fn monthly_trend(data: &Filtered<'_>) -> Vec<MonthlyPoint> {
    let mut sums: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for rec in data.iter() {
        let entry = sums.entry(month_start(rec.order_date)).or_insert((0.0, 0.0));
        entry.0 += rec.sales;
        entry.1 += rec.profit;
    }

    let (Some(&first), Some(&last)) = (sums.keys().next(), sums.keys().next_back()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut month = first;
    while month <= last {
        let (sales, profit) = sums.get(&month).copied().unwrap_or((0.0, 0.0));
        out.push(MonthlyPoint {
            month,
            sales,
            profit,
        });
        match month.checked_add_months(Months::new(1)) {
            Some(next) => month = next,
            None => break,
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Group sums and rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sum `measure` per distinct value of `dim`. Rows with a blank value
/// belong to no group.
pub fn group_sum(data: &Filtered<'_>, dim: Dimension, measure: Measure) -> BTreeMap<String, f64> {
    let mut out: BTreeMap<String, f64> = BTreeMap::new();
    for rec in data.iter() {
        let key = rec.dimension(dim);
        if key.is_empty() {
            continue;
        }
        *out.entry(key.to_string()).or_insert(0.0) += rec.measure(measure);
    }
    out
}

/// All groups ordered by summed `measure`; equal sums are ordered by name.
pub fn ranked(
    data: &Filtered<'_>,
    dim: Dimension,
    measure: Measure,
    direction: SortDirection,
) -> Vec<(String, f64)> {
    let mut rows: Vec<(String, f64)> = group_sum(data, dim, measure).into_iter().collect();
    rows.sort_by(|(name_a, a), (name_b, b)| {
        let by_value = match direction {
            SortDirection::Descending => b.total_cmp(a),
            SortDirection::Ascending => a.total_cmp(b),
        };
        by_value.then_with(|| name_a.cmp(name_b))
    });
    rows
}

/// The first `n` entries of [`ranked`]; fewer when there are fewer groups.
pub fn top_n(
    data: &Filtered<'_>,
    dim: Dimension,
    measure: Measure,
    n: usize,
    direction: SortDirection,
) -> Vec<(String, f64)> {
    let mut rows = ranked(data, dim, measure, direction);
    rows.truncate(n);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::*;
    use crate::data::model::Record;

    fn filtered(records: &[Record]) -> Filtered<'_> {
        Filtered::new(records.iter().collect()).unwrap()
    }

    #[test]
    fn average_margin_differs_from_ratio_of_sums() {
        let records = vec![
            record("O-1", date(2014, 1, 1), 100.0, 50.0),
            record("O-2", date(2014, 1, 2), 10.0, -10.0),
        ];
        let kpis = Kpis::compute(&filtered(&records));

        assert!((kpis.total_sales - 110.0).abs() < 1e-9);
        assert!((kpis.total_profit - 40.0).abs() < 1e-9);
        assert!((kpis.avg_profit_margin - -25.0).abs() < 1e-9);
        let ratio = kpis.total_profit / kpis.total_sales * 100.0;
        assert!((ratio - 36.3636).abs() < 1e-3);
    }

    #[test]
    fn orders_are_counted_distinct() {
        let records = vec![
            record("O-1", date(2014, 1, 1), 1.0, 0.0),
            record("O-1", date(2014, 1, 1), 2.0, 0.0),
            record("O-2", date(2014, 1, 3), 3.0, 0.0),
        ];
        assert_eq!(Kpis::compute(&filtered(&records)).total_orders, 2);
    }

    #[test]
    fn blank_order_ids_are_not_orders() {
        let records = vec![
            record("", date(2014, 1, 1), 900.0, 0.0),
            record("O-1", date(2014, 1, 2), 10.0, 0.0),
        ];
        let kpis = Kpis::compute(&filtered(&records));
        assert_eq!(kpis.total_orders, 1);
        assert_eq!(kpis.total_sales, 910.0);
    }

    #[test]
    fn blank_group_values_are_left_out_of_rankings() {
        let mut blank = record("", date(2014, 1, 1), 900.0, 0.0);
        blank.customer_name = String::new();
        let mut ann = record("O-1", date(2014, 1, 2), 10.0, 0.0);
        ann.customer_name = "Ann".to_string();
        let records = vec![blank, ann];
        let data = filtered(&records);

        let sums = group_sum(&data, Dimension::CustomerName, Measure::Sales);
        assert!(!sums.contains_key(""));
        let top = top_n(&data, Dimension::CustomerName, Measure::Sales, 5, SortDirection::Descending);
        assert_eq!(top, vec![("Ann".to_string(), 10.0)]);
    }

    #[test]
    fn monthly_trend_zero_fills_gaps() {
        let records = vec![
            record("O-1", date(2013, 11, 30), 10.0, 1.0),
            record("O-2", date(2014, 2, 1), 5.0, 2.0),
            record("O-3", date(2013, 11, 2), 1.0, 1.0),
        ];
        let trend = monthly_trend(&filtered(&records));

        let months: Vec<_> = trend.iter().map(|p| p.month).collect();
        assert_eq!(
            months,
            vec![date(2013, 11, 1), date(2013, 12, 1), date(2014, 1, 1), date(2014, 2, 1)]
        );
        assert_eq!(trend[0].sales, 11.0);
        assert_eq!(trend[0].profit, 2.0);
        assert_eq!(trend[1].sales, 0.0);
        assert_eq!(trend[3].profit, 2.0);
    }

    #[test]
    fn group_sum_conserves_totals() {
        let mut records = Vec::new();
        for (i, seg) in ["Consumer", "Corporate", "Home Office", "Consumer"].iter().enumerate() {
            let mut rec = record(&format!("O-{i}"), date(2014, 1, 1), (i + 1) as f64 * 10.5, 1.0);
            rec.segment = seg.to_string();
            records.push(rec);
        }
        let data = filtered(&records);
        let sums = group_sum(&data, Dimension::Segment, Measure::Sales);

        assert_eq!(sums.len(), 3);
        let grouped: f64 = sums.values().sum();
        let total: f64 = records.iter().map(|r| r.sales).sum();
        assert!((grouped - total).abs() < 1e-9);
    }

    #[test]
    fn ranked_breaks_ties_by_name() {
        let mut records = Vec::new();
        for (name, sales) in [("Zed", 10.0), ("Amy", 10.0), ("Bob", 30.0)] {
            let mut rec = record("O", date(2014, 1, 1), sales, 0.0);
            rec.customer_name = name.to_string();
            records.push(rec);
        }
        let data = filtered(&records);

        let desc = ranked(&data, Dimension::CustomerName, Measure::Sales, SortDirection::Descending);
        let names: Vec<_> = desc.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Amy", "Zed"]);

        let asc = ranked(&data, Dimension::CustomerName, Measure::Sales, SortDirection::Ascending);
        let names: Vec<_> = asc.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Zed", "Bob"]);
    }

    #[test]
    fn top_n_returns_all_groups_when_fewer_than_n() {
        let records = vec![record("O-1", date(2014, 1, 1), 5.0, 1.0)];
        let top = top_n(&filtered(&records), Dimension::ProductName, Measure::Sales, 10, SortDirection::Descending);
        assert_eq!(top, vec![("Staples".to_string(), 5.0)]);
    }

    #[test]
    fn missing_quantity_sums_as_zero() {
        let mut a = record("O-1", date(2014, 1, 1), 5.0, 1.0);
        a.quantity = None;
        let b = record("O-2", date(2014, 1, 1), 5.0, 1.0);
        let records = vec![a, b];
        let sums = group_sum(&filtered(&records), Dimension::Region, Measure::Quantity);
        assert_eq!(sums["West"], 1.0);
    }
}
