//! The aggregate views behind each dashboard tab, rebuilt from scratch on
//! every filter change and dropped after rendering.

use super::aggregate::{group_sum, monthly_trend, ranked, top_n, Kpis, MonthlyPoint, SortDirection};
use super::filter::Filtered;
use super::model::{Dimension, Measure};

/// How many entries the ranking charts show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLimits {
    pub top_customers_by_sales: usize,
    pub top_customers_by_profit: usize,
    pub top_products_by_sales: usize,
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self {
            top_customers_by_sales: 5,
            top_customers_by_profit: 10,
            top_products_by_sales: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewView {
    pub kpis: Kpis,
    pub trend: Vec<MonthlyPoint>,
    /// Sorted by segment name.
    pub sales_by_segment: Vec<(String, f64)>,
    pub profit_by_segment: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomersView {
    pub top_by_sales: Vec<(String, f64)>,
    pub top_by_profit: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductsView {
    pub top_by_sales: Vec<(String, f64)>,
    /// Every sub-category, highest profit first.
    pub profit_by_sub_category: Vec<(String, f64)>,
}

impl OverviewView {
    pub fn build(data: &Filtered<'_>) -> Self {
        Self {
            kpis: Kpis::compute(data),
            trend: monthly_trend(data),
            sales_by_segment: group_sum(data, Dimension::Segment, Measure::Sales)
                .into_iter()
                .collect(),
            profit_by_segment: group_sum(data, Dimension::Segment, Measure::Profit)
                .into_iter()
                .collect(),
        }
    }
}

impl CustomersView {
    pub fn build(data: &Filtered<'_>, limits: &ViewLimits) -> Self {
        Self {
            top_by_sales: top_n(
                data,
                Dimension::CustomerName,
                Measure::Sales,
                limits.top_customers_by_sales,
                SortDirection::Descending,
            ),
            top_by_profit: top_n(
                data,
                Dimension::CustomerName,
                Measure::Profit,
                limits.top_customers_by_profit,
                SortDirection::Descending,
            ),
        }
    }
}

impl ProductsView {
    pub fn build(data: &Filtered<'_>, limits: &ViewLimits) -> Self {
        Self {
            top_by_sales: top_n(
                data,
                Dimension::ProductName,
                Measure::Sales,
                limits.top_products_by_sales,
                SortDirection::Descending,
            ),
            profit_by_sub_category: ranked(
                data,
                Dimension::SubCategory,
                Measure::Profit,
                SortDirection::Descending,
            ),
        }
    }
}
