//! Row and group filters applied between pipeline stages
//!
//! Filters only drop items. They never touch counter values.

use super::aggregator::{Group, Predicate};
use super::record::{Fields, Record, Value};

/// Keep items whose `field` equals `value`
#[derive(Debug, Clone)]
pub struct IdentityFilter {
    field: String,
    value: Value,
}

impl IdentityFilter {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches<T: Fields>(&self, item: &T) -> bool {
        item.field(&self.field) == Some(&self.value)
    }

    pub fn apply<T: Fields>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

/// Drop groups where every listed counter is zero
#[derive(Debug, Clone)]
pub struct AllZeroFilter {
    counters: Vec<String>,
}

impl AllZeroFilter {
    pub fn new<S: Into<String>>(counters: impl IntoIterator<Item = S>) -> Self {
        Self {
            counters: counters.into_iter().map(Into::into).collect(),
        }
    }

    /// A counter the group does not carry reads as zero
    pub fn is_all_zero(&self, group: &Group) -> bool {
        self.counters
            .iter()
            .all(|name| group.count(name).unwrap_or(0) == 0)
    }

    pub fn apply(&self, groups: Vec<Group>) -> Vec<Group> {
        groups
            .into_iter()
            .filter(|group| !self.is_all_zero(group))
            .collect()
    }
}

/// Keep records satisfying a predicate (e.g. classified as a comment)
#[derive(Debug, Clone)]
pub struct PredicateFilter {
    predicate: Predicate,
}

impl PredicateFilter {
    pub fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }

    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        records
            .into_iter()
            .filter(|record| self.predicate.holds(record))
            .collect()
    }
}
