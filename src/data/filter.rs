use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dimension, Incident};
use crate::error::ExploreError;

// ---------------------------------------------------------------------------
// FilterSet: which values are allowed per dimension
// ---------------------------------------------------------------------------

/// Per-dimension selections, AND-ed together.
///
/// A dimension with no entry (or an empty selection) does not constrain
/// anything; it is never "exclude everything". Only non-empty selections are
/// stored, so two filter sets compare equal exactly when they admit the same
/// records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    selections: BTreeMap<Dimension, BTreeSet<String>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the allowed values for `dimension`. An empty set clears it.
    pub fn set_selection<I, S>(&mut self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.selections.remove(&dimension);
        } else {
            self.selections.insert(dimension, values);
        }
    }

    /// Like [`FilterSet::set_selection`], with the dimension given by name.
    pub fn set_selection_by_name<I, S>(&mut self, dimension: &str, values: I) -> Result<(), ExploreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dimension: Dimension = dimension.parse()?;
        self.set_selection(dimension, values);
        Ok(())
    }

    /// Add `value` to the selection if absent, remove it otherwise.
    pub fn toggle(&mut self, dimension: Dimension, value: &str) {
        let selected = self.selections.entry(dimension).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        if selected.is_empty() {
            self.selections.remove(&dimension);
        }
    }

    pub fn clear(&mut self, dimension: Dimension) {
        self.selections.remove(&dimension);
    }

    pub fn clear_all(&mut self) {
        self.selections.clear();
    }

    /// Selected values for `dimension`, if it is constrained.
    pub fn selection(&self, dimension: Dimension) -> Option<&BTreeSet<String>> {
        self.selections.get(&dimension)
    }

    pub fn is_selected(&self, dimension: Dimension, value: &str) -> bool {
        self.selections
            .get(&dimension)
            .is_some_and(|sel| sel.contains(value))
    }

    /// Dimensions that currently constrain the subset.
    pub fn active_dimensions(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.selections.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Whether `incident` passes every active constraint.
    pub fn matches(&self, incident: &Incident) -> bool {
        self.selections
            .iter()
            .all(|(dim, allowed)| allowed.contains(&*incident.value(*dim)))
    }

    /// The AND of all active constraints as a standalone predicate.
    pub fn combined_predicate(&self) -> impl Fn(&Incident) -> bool + '_ {
        move |incident: &Incident| self.matches(incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::incident;

    #[test]
    fn empty_filter_set_admits_everything() {
        let filters = FilterSet::new();
        let pred = filters.combined_predicate();
        assert!(pred(&incident("Theft", "Mon")));
        assert!(pred(&incident("Assault", "Sun")));
    }

    #[test]
    fn empty_selection_clears_the_dimension() {
        let mut filters = FilterSet::new();
        filters.set_selection(Dimension::DayOfWeek, ["Mon"]);
        assert!(!filters.matches(&incident("Theft", "Tue")));

        filters.set_selection(Dimension::DayOfWeek, Vec::<String>::new());
        assert!(filters.is_empty());
        assert!(filters.matches(&incident("Theft", "Tue")));
    }

    #[test]
    fn dimensions_are_anded_values_are_ored() {
        let mut filters = FilterSet::new();
        filters.set_selection(Dimension::DayOfWeek, ["Mon", "Tue"]);
        filters.set_selection(Dimension::Category, ["Theft"]);

        assert!(filters.matches(&incident("Theft", "Mon")));
        assert!(filters.matches(&incident("Theft", "Tue")));
        assert!(!filters.matches(&incident("Assault", "Mon")));
        assert!(!filters.matches(&incident("Theft", "Wed")));
    }

    #[test]
    fn many_dimensions_at_once() {
        let mut filters = FilterSet::new();
        filters.set_selection(Dimension::IncidentDate, ["2018-01-01"]);
        filters.set_selection(Dimension::IncidentYear, ["2018"]);
        filters.set_selection(Dimension::Subcategory, ["Theft - Other"]);
        filters.set_selection(Dimension::Neighborhood, ["Mission"]);
        filters.set_selection(Dimension::PoliceDistrict, ["Central"]);
        filters.set_selection(Dimension::SupervisorDistrict, ["9"]);
        assert_eq!(filters.active_dimensions().count(), 6);
        assert!(filters.matches(&incident("Theft", "Mon")));

        filters.set_selection(Dimension::SupervisorDistrict, ["3"]);
        assert!(!filters.matches(&incident("Theft", "Mon")));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut filters = FilterSet::new();
        filters.toggle(Dimension::Category, "Theft");
        assert!(filters.is_selected(Dimension::Category, "Theft"));
        filters.toggle(Dimension::Category, "Theft");
        assert!(filters.is_empty());
    }

    #[test]
    fn selection_by_unknown_name_fails() {
        let mut filters = FilterSet::new();
        assert_eq!(
            filters.set_selection_by_name("Weather", ["Rain"]),
            Err(ExploreError::UnknownDimension("Weather".into()))
        );
        filters
            .set_selection_by_name("Police District", ["Central"])
            .unwrap();
        assert_eq!(
            filters.active_dimensions().collect::<Vec<_>>(),
            [Dimension::PoliceDistrict]
        );
    }
}
