use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, Points};

use crate::color::{self, PROFIT_COLOR, RANKING_PALETTE, SALES_COLOR, SEGMENT_PALETTE};
use crate::data::aggregate::MonthlyPoint;
use crate::data::filter::FilterCriteria;
use crate::data::model::Dimension;
use crate::data::views::{CustomersView, OverviewView, ProductsView};

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// `1234567.891` → `"1,234,567.89"` with `decimals` fractional digits.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn format_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", format_thousands(-value, 2))
    } else {
        format!("${}", format_thousands(value, 2))
    }
}

// ---------------------------------------------------------------------------
// Overview tab
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, view: &OverviewView, criteria: &FilterCriteria) {
    ui.heading("Business Overview");

    ui.collapsing("View Active Filters", |ui: &mut Ui| {
        ui.label(format!("Date Range: {}", criteria.date_range));
        for dim in Dimension::FILTERS {
            let values: Vec<&str> = criteria
                .selected(dim)
                .map(|s| s.iter().map(String::as_str).collect())
                .unwrap_or_default();
            ui.label(format!("{dim}: {}", values.join(", ")));
        }
    });

    let kpis = &view.kpis;
    ui.columns(4, |cols: &mut [Ui]| {
        kpi(&mut cols[0], "Total Sales", format_currency(kpis.total_sales));
        kpi(&mut cols[1], "Total Profit", format_currency(kpis.total_profit));
        kpi(&mut cols[2], "Avg Profit Margin", format!("{:.2}%", kpis.avg_profit_margin));
        kpi(&mut cols[3], "Total Orders", format_thousands(kpis.total_orders as f64, 0));
    });
    ui.separator();

    ui.strong("Monthly Sales & Profit Trend");
    let labels: Vec<String> = view
        .trend
        .iter()
        .map(|p| p.month.format("%Y-%m").to_string())
        .collect();
    let (sales, profit) = trend_series(&view.trend);

    Plot::new("monthly_trend")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(sales.clone()).name("Sales").color(color::hex(SALES_COLOR)).width(2.0));
            plot_ui.line(Line::new(profit.clone()).name("Profit").color(color::hex(PROFIT_COLOR)).width(2.0));
            plot_ui.points(Points::new(sales).color(color::hex(SALES_COLOR)).radius(3.0));
            plot_ui.points(Points::new(profit).color(color::hex(PROFIT_COLOR)).radius(3.0));
        });

    ui.separator();
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Sales by Segment");
        bar_chart(&mut cols[0], "segment_sales", &view.sales_by_segment, &SEGMENT_PALETTE, false);
        cols[1].strong("Profit by Segment");
        bar_chart(&mut cols[1], "segment_profit", &view.profit_by_segment, &SEGMENT_PALETTE, false);
    });
}

/// Sales and profit points of the trend chart, x = month index.
fn trend_series(trend: &[MonthlyPoint]) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
    trend
        .iter()
        .enumerate()
        .map(|(i, p)| ([i as f64, p.sales], [i as f64, p.profit]))
        .unzip()
}

fn kpi(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.label(RichText::new(label).color(Color32::GRAY));
        ui.label(RichText::new(value).size(22.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Customers and Products tabs
// ---------------------------------------------------------------------------

pub fn customers(ui: &mut Ui, view: &CustomersView) {
    ui.heading("Customer Performance");

    ui.strong(format!("Top {} Customers by Sales", view.top_by_sales.len()));
    bar_chart(ui, "top_customers_sales", &view.top_by_sales, &RANKING_PALETTE, false);
    ui.separator();

    ui.strong(format!("Top {} Customers by Profit", view.top_by_profit.len()));
    bar_chart(ui, "top_customers_profit", &view.top_by_profit, &RANKING_PALETTE, false);
}

pub fn products(ui: &mut Ui, view: &ProductsView) {
    ui.heading("Product Insights");

    ui.strong(format!("Top {} Products by Sales", view.top_by_sales.len()));
    bar_chart(ui, "top_products_sales", &view.top_by_sales, &RANKING_PALETTE, true);
    ui.separator();

    ui.strong("Profit by Sub-Category");
    bar_chart(ui, "profit_by_subcategory", &view.profit_by_sub_category, &RANKING_PALETTE, true);
}

// ---------------------------------------------------------------------------
// Shared chart helpers
// ---------------------------------------------------------------------------

/// Axis formatter printing `labels[i]` at integer position `i`.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value;
        if pos < 0.0 || pos.fract() != 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

/// One bar per `(label, value)`; horizontal charts list the first entry at the top.
fn bar_chart(ui: &mut Ui, id: &str, rows: &[(String, f64)], palette: &[&str], horizontal: bool) {
    let colors = color::bar_colors(palette, rows.len());
    let n = rows.len();

    let position = |i: usize| if horizontal { (n - 1 - i) as f64 } else { i as f64 };

    let bars: Vec<Bar> = rows
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, ((label, value), fill))| {
            Bar::new(position(i), *value)
                .name(label)
                .fill(fill)
                .width(0.6)
        })
        .collect();

    let mut labels = vec![String::new(); n];
    for (i, (label, _)) in rows.iter().enumerate() {
        labels[position(i) as usize] = label.clone();
    }

    let mut chart = BarChart::new(bars);
    if horizontal {
        chart = chart.horizontal();
    }

    let mut plot = Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_drag(false);
    plot = if horizontal {
        plot.y_axis_formatter(category_formatter(labels)).include_x(0.0)
    } else {
        plot.x_axis_formatter(category_formatter(labels)).include_y(0.0)
    };

    plot.show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(format_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_thousands(999.0, 0), "999");
        assert_eq!(format_thousands(1000.0, 0), "1,000");
        assert_eq!(format_thousands(-12345.5, 1), "-12,345.5");
        assert_eq!(format_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn currency_keeps_sign_outside() {
        assert_eq!(format_currency(2297200.86), "$2,297,200.86");
        assert_eq!(format_currency(-50.0), "-$50.00");
    }

    #[test]
    fn category_labels_only_on_integers() {
        let fmt = category_formatter(vec!["2014-01".into(), "2014-02".into()]);
        let mark = |value| GridMark { value, step_size: 1.0 };
        assert_eq!(fmt(mark(1.0), &(0.0..=1.0)), "2014-02");
        assert_eq!(fmt(mark(0.5), &(0.0..=1.0)), "");
        assert_eq!(fmt(mark(5.0), &(0.0..=1.0)), "");
        assert_eq!(fmt(mark(-1.0), &(0.0..=1.0)), "");
    }

    #[test]
    fn trend_series_share_month_positions() {
        let month = |m| chrono::NaiveDate::from_ymd_opt(2014, m, 1).unwrap();
        let trend = vec![
            MonthlyPoint { month: month(1), sales: 10.0, profit: -2.0 },
            MonthlyPoint { month: month(2), sales: 0.0, profit: 0.0 },
        ];
        let (sales, profit) = trend_series(&trend);
        assert_eq!(sales, vec![[0.0, 10.0], [1.0, 0.0]]);
        assert_eq!(profit, vec![[0.0, -2.0], [1.0, 0.0]]);
    }
}
