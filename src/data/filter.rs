use std::collections::{BTreeMap, BTreeSet};

use super::error::PipelineError;
use super::model::{DateRange, Dataset, Dimension, Record};

// ---------------------------------------------------------------------------
// Filter criteria: date interval plus selected values per dimension
// ---------------------------------------------------------------------------

/// What the sidebar currently selects.
///
/// A record matches when its order date lies in `date_range` and, for each
/// of the five filter dimensions, its value is in the selected set. An empty
/// set selects nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub selected: BTreeMap<Dimension, BTreeSet<String>>,
}

impl FilterCriteria {
    /// Full observed date range with every option selected (the defaults).
    ///
    /// Returns `None` for a dataset without records.
    pub fn all(dataset: &Dataset) -> Option<Self> {
        let date_range = dataset.date_range?;
        let selected = Dimension::FILTERS
            .iter()
            .map(|&dim| (dim, dataset.options_for(dim)))
            .collect();
        Some(Self {
            date_range,
            selected,
        })
    }

    pub fn selected(&self, dim: Dimension) -> Option<&BTreeSet<String>> {
        self.selected.get(&dim)
    }

    /// Replace one dimension's selection.
    pub fn set_selected(&mut self, dim: Dimension, values: BTreeSet<String>) {
        self.selected.insert(dim, values);
    }

    pub fn matches(&self, record: &Record) -> bool {
        if !self.date_range.contains(record.order_date) {
            return false;
        }
        Dimension::FILTERS.iter().all(|&dim| {
            self.selected
                .get(&dim)
                .is_some_and(|values| values.contains(record.dimension(dim)))
        })
    }
}

// ---------------------------------------------------------------------------
// Filtered – a non-empty, order-preserving view of matching records
// ---------------------------------------------------------------------------

/// Records that passed a filter. Never empty, so every aggregate computed
/// from it is meaningful.
#[derive(Debug, Clone)]
pub struct Filtered<'a> {
    records: Vec<&'a Record>,
}

impl<'a> Filtered<'a> {
    /// Wrap a record list, rejecting an empty one.
    pub fn new(records: Vec<&'a Record>) -> Result<Self, PipelineError> {
        if records.is_empty() {
            return Err(PipelineError::EmptyResult);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    /// Apply `criteria` again to this already-filtered view.
    pub fn refilter(&self, criteria: &FilterCriteria) -> Result<Filtered<'a>, PipelineError> {
        Filtered::new(matching(self.iter(), criteria))
    }
}

fn matching<'a>(
    records: impl Iterator<Item = &'a Record>,
    criteria: &FilterCriteria,
) -> Vec<&'a Record> {
    records.filter(|rec| criteria.matches(rec)).collect()
}

/// Return the records of `dataset` that satisfy `criteria`, in dataset order.
///
/// Signals [`PipelineError::EmptyResult`] when nothing matches; callers show
/// a "no data" notice instead of aggregating.
pub fn filter<'a>(
    dataset: &'a Dataset,
    criteria: &FilterCriteria,
) -> Result<Filtered<'a>, PipelineError> {
    let records = matching(dataset.records.iter(), criteria);
    log::debug!(
        "Filter {} kept {} of {} rows",
        criteria.date_range,
        records.len(),
        dataset.len()
    );
    Filtered::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::*;

    fn sample() -> Dataset {
        let mut a = record("A-1", date(2014, 1, 10), 100.0, 10.0);
        a.region = "East".into();
        let mut b = record("A-2", date(2014, 2, 10), 50.0, 5.0);
        b.region = "West".into();
        b.segment = "Corporate".into();
        let mut c = record("A-3", date(2014, 3, 10), 25.0, -5.0);
        c.region = "East".into();
        c.market = "EU".into();
        dataset(vec![a, b, c])
    }

    #[test]
    fn defaults_keep_everything_in_order() {
        let ds = sample();
        let criteria = FilterCriteria::all(&ds).unwrap();
        let filtered = filter(&ds, &criteria).unwrap();
        let ids: Vec<_> = filtered.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["A-1", "A-2", "A-3"]);
        assert_eq!(filtered.len(), 3);
        assert!(!filtered.is_empty());
    }

    #[test]
    fn categorical_and_date_predicates_combine() {
        let ds = sample();
        let mut criteria = FilterCriteria::all(&ds).unwrap();
        criteria.set_selected(Dimension::Region, BTreeSet::from(["East".to_string()]));
        criteria.date_range = DateRange::new(date(2014, 1, 1), date(2014, 2, 28));

        let filtered = filter(&ds, &criteria).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].order_id, "A-1");
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let ds = sample();
        let mut criteria = FilterCriteria::all(&ds).unwrap();
        criteria.date_range = DateRange::new(date(2014, 2, 10), date(2014, 3, 10));
        assert_eq!(filter(&ds, &criteria).unwrap().len(), 2);
    }

    #[test]
    fn empty_selection_is_an_empty_result() {
        let ds = sample();
        let mut criteria = FilterCriteria::all(&ds).unwrap();
        criteria.set_selected(Dimension::Segment, BTreeSet::new());
        assert_eq!(filter(&ds, &criteria).unwrap_err(), PipelineError::EmptyResult);
    }

    #[test]
    fn empty_record_list_cannot_become_filtered() {
        assert_eq!(Filtered::new(Vec::new()).unwrap_err(), PipelineError::EmptyResult);
    }

    #[test]
    fn refilter_is_idempotent() {
        let ds = sample();
        let mut criteria = FilterCriteria::all(&ds).unwrap();
        criteria.set_selected(Dimension::Market, BTreeSet::from(["US".to_string()]));

        let once = filter(&ds, &criteria).unwrap();
        let twice = once.refilter(&criteria).unwrap();
        assert_eq!(once.records(), twice.records());
    }
}
