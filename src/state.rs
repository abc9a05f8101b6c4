use chrono::NaiveDate;

use crate::data::filter::FilterCriteria;
use crate::data::model::{DateRange, Dataset, Dimension};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Customers,
    Products,
    Data,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Customers, Tab::Products, Tab::Data];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Customers => "Customers",
            Tab::Products => "Products",
            Tab::Data => "Data",
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Current sidebar selection (None until a dataset is loaded).
    pub criteria: Option<FilterCriteria>,

    /// Bumped on every reset; widget ids are salted with it so that
    /// widgets holding their own state are rebuilt from the defaults.
    pub generation: u64,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl DashboardState {
    /// Initialise the selection for a newly loaded dataset.
    pub fn set_dataset(&mut self, dataset: &Dataset) {
        self.criteria = FilterCriteria::all(dataset);
        self.status_message = None;
    }

    /// Restore every filter to its default and invalidate widget state.
    pub fn reset(&mut self, dataset: &Dataset) {
        self.criteria = FilterCriteria::all(dataset);
        self.generation += 1;
        log::debug!("Filters reset (generation {})", self.generation);
    }

    /// Suffix for widget ids so a reset yields fresh widgets.
    pub fn widget_key(&self, name: &str) -> String {
        format!("{name}_{}", self.generation)
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &str) {
        let Some(criteria) = &mut self.criteria else {
            return;
        };
        let selected = criteria.selected.entry(dim).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dataset: &Dataset, dim: Dimension) {
        if let Some(criteria) = &mut self.criteria {
            criteria.set_selected(dim, dataset.options_for(dim));
        }
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        if let Some(criteria) = &mut self.criteria {
            criteria.set_selected(dim, Default::default());
        }
    }

    /// Update the date interval, clamping it to what the dataset covers.
    pub fn set_date_range(&mut self, dataset: &Dataset, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        let (Some(criteria), Some(observed)) = (&mut self.criteria, dataset.date_range) else {
            return;
        };
        criteria.date_range = DateRange::resolve(start, end, observed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::*;

    fn sample() -> Dataset {
        let mut a = record("A-1", date(2012, 1, 1), 1.0, 0.0);
        a.segment = "Consumer".into();
        let mut b = record("A-2", date(2014, 6, 30), 1.0, 0.0);
        b.segment = "Corporate".into();
        dataset(vec![a, b])
    }

    #[test]
    fn toggle_and_select_helpers() {
        let ds = sample();
        let mut state = DashboardState::default();
        state.set_dataset(&ds);

        state.toggle_filter_value(Dimension::Segment, "Consumer");
        let seg = state.criteria.as_ref().unwrap().selected(Dimension::Segment).unwrap();
        assert_eq!(seg.len(), 1);
        assert!(seg.contains("Corporate"));

        state.toggle_filter_value(Dimension::Segment, "Consumer");
        assert_eq!(state.criteria.as_ref().unwrap().selected(Dimension::Segment).unwrap().len(), 2);

        state.select_none(Dimension::Segment);
        assert!(state.criteria.as_ref().unwrap().selected(Dimension::Segment).unwrap().is_empty());

        state.select_all(&ds, Dimension::Segment);
        assert_eq!(state.criteria.as_ref().unwrap().selected(Dimension::Segment).unwrap().len(), 2);
    }

    #[test]
    fn reset_restores_defaults_and_bumps_generation() {
        let ds = sample();
        let mut state = DashboardState::default();
        state.set_dataset(&ds);
        let before = state.widget_key("region");

        state.select_none(Dimension::Region);
        state.set_date_range(&ds, Some(date(2013, 1, 1)), None);
        state.reset(&ds);

        assert_eq!(state.generation, 1);
        assert_ne!(state.widget_key("region"), before);
        assert_eq!(state.criteria, FilterCriteria::all(&ds));
    }

    #[test]
    fn date_range_is_clamped() {
        let ds = sample();
        let mut state = DashboardState::default();
        state.set_dataset(&ds);

        state.set_date_range(&ds, Some(date(2000, 1, 1)), Some(date(2013, 1, 1)));
        assert_eq!(
            state.criteria.as_ref().unwrap().date_range,
            DateRange::new(date(2012, 1, 1), date(2013, 1, 1))
        );
    }
}
