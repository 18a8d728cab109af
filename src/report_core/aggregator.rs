//! Hash group-by with named predicate counters

use super::classifier::{classify_record, SemanticEvent, SpaceKind};
use super::record::{Fields, KeyValue, Record, Value};
use std::collections::BTreeMap;

/// Condition a record must satisfy to bump a counter
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Every record counts (group size)
    Always,
    /// Record's event code means this event
    Event(SemanticEvent),
    /// Record's space code means this space, whatever its event code
    Space(SpaceKind),
    /// Raw field equality
    FieldEquals { field: String, value: Value },
}

impl Predicate {
    pub fn holds(&self, record: &Record) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Event(event) => classify_record(record).event == *event,
            Predicate::Space(space) => classify_record(record).space == Some(*space),
            Predicate::FieldEquals { field, value } => record.get(field) == Some(value),
        }
    }
}

/// A named counter: `name` is bumped for every record where `predicate` holds
#[derive(Debug, Clone)]
pub struct Counter {
    pub name: String,
    pub predicate: Predicate,
}

impl Counter {
    pub fn new(name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }

    /// Unconditional counter, i.e. group size
    pub fn size(name: impl Into<String>) -> Self {
        Self::new(name, Predicate::Always)
    }
}

/// One aggregated group: its key fields plus one tally per counter
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: Vec<(String, Value)>,
    counts: Vec<(String, Value)>,
}

impl Group {
    pub fn key_value(&self, field: &str) -> Option<&Value> {
        self.key.iter().find(|(name, _)| name == field).map(|(_, v)| v)
    }

    pub fn count(&self, counter: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|(name, _)| name == counter)
            .and_then(|(_, v)| v.as_integer())
            .map(|c| c as u64)
    }

    pub fn counts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts
            .iter()
            .map(|(name, v)| (name.as_str(), v.as_integer().unwrap_or(0) as u64))
    }
}

impl Fields for Group {
    fn field(&self, name: &str) -> Option<&Value> {
        self.key_value(name).or_else(|| {
            self.counts
                .iter()
                .find(|(counter, _)| counter == name)
                .map(|(_, v)| v)
        })
    }
}

/// Group-by over a fixed composite key with a fixed set of counters
#[derive(Debug, Clone)]
pub struct Aggregator {
    group_by: Vec<String>,
    counters: Vec<Counter>,
}

impl Aggregator {
    pub fn new<S: Into<String>>(group_by: impl IntoIterator<Item = S>, counters: Vec<Counter>) -> Self {
        Self {
            group_by: group_by.into_iter().map(Into::into).collect(),
            counters,
        }
    }

    pub fn counter_names(&self) -> impl Iterator<Item = &str> {
        self.counters.iter().map(|c| c.name.as_str())
    }

    /// Single pass over `records`.
    ///
    /// Groups are created on first encounter. Records with a NULL or missing
    /// key component are skipped. Output is ordered by ascending key.
    pub fn aggregate(&self, records: &[Record]) -> Vec<Group> {
        let mut groups: BTreeMap<Vec<KeyValue>, Vec<u64>> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            let Some(key) = self.group_key(record) else {
                skipped += 1;
                continue;
            };

            let tallies = groups
                .entry(key)
                .or_insert_with(|| vec![0; self.counters.len()]);

            for (tally, counter) in tallies.iter_mut().zip(&self.counters) {
                if counter.predicate.holds(record) {
                    *tally += 1;
                }
            }
        }

        if skipped > 0 {
            log::debug!("aggregate: skipped {} records with a null group key", skipped);
        }

        groups
            .into_iter()
            .map(|(key, tallies)| Group {
                key: self
                    .group_by
                    .iter()
                    .cloned()
                    .zip(key.iter().map(Value::from))
                    .collect(),
                counts: self
                    .counters
                    .iter()
                    .map(|c| c.name.clone())
                    .zip(tallies.into_iter().map(|t| Value::Integer(t as i64)))
                    .collect(),
            })
            .collect()
    }

    fn group_key(&self, record: &Record) -> Option<Vec<KeyValue>> {
        self.group_by
            .iter()
            .map(|field| record.get(field).and_then(Value::key))
            .collect()
    }
}
