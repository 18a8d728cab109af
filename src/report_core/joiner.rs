//! Inner equi-join of two record sequences (hash join)

use super::record::{KeyValue, Record};
use std::collections::{BTreeSet, HashMap};

/// Inner equi-join on `left[left_key] == right[right_key]`
///
/// Field names present on both sides are suffixed with the side labels.
/// When both keys share one name the key column is emitted once, unsuffixed.
/// NULL keys never match.
#[derive(Debug, Clone)]
pub struct RelationalJoiner {
    left_key: String,
    right_key: String,
    left_suffix: String,
    right_suffix: String,
}

impl RelationalJoiner {
    pub fn on(left_key: impl Into<String>, right_key: impl Into<String>) -> Self {
        Self {
            left_key: left_key.into(),
            right_key: right_key.into(),
            left_suffix: "_left".to_string(),
            right_suffix: "_right".to_string(),
        }
    }

    pub fn with_suffixes(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_suffix = left.into();
        self.right_suffix = right.into();
        self
    }

    /// Join `left` against `right`.
    ///
    /// Output follows left order, then right order within one left row, so a
    /// left row matching N right rows yields N merged rows.
    pub fn join(&self, left: &[Record], right: &[Record]) -> Vec<Record> {
        if left.is_empty() || right.is_empty() {
            return Vec::new();
        }

        // Build side: key -> right row positions
        let mut index: HashMap<KeyValue, Vec<usize>> = HashMap::new();
        for (pos, row) in right.iter().enumerate() {
            if let Some(key) = row.get(&self.right_key).and_then(|v| v.key()) {
                index.entry(key).or_default().push(pos);
            }
        }

        let shared_key = self.left_key == self.right_key;
        let collisions = self.collisions(left, right, shared_key);

        let mut merged = Vec::new();
        for left_row in left {
            let Some(key) = left_row.get(&self.left_key).and_then(|v| v.key()) else {
                continue;
            };
            let Some(matches) = index.get(&key) else {
                continue;
            };

            for &pos in matches {
                merged.push(self.merge(left_row, &right[pos], &collisions, shared_key));
            }
        }

        log::debug!(
            "join {}={}: {} x {} rows -> {} rows",
            self.left_key,
            self.right_key,
            left.len(),
            right.len(),
            merged.len()
        );

        merged
    }

    fn collisions(&self, left: &[Record], right: &[Record], shared_key: bool) -> BTreeSet<String> {
        let left_names: BTreeSet<&str> = left.iter().flat_map(Record::names).collect();
        let right_names: BTreeSet<&str> = right.iter().flat_map(Record::names).collect();

        left_names
            .intersection(&right_names)
            .filter(|name| !(shared_key && **name == self.left_key))
            .map(|name| name.to_string())
            .collect()
    }

    fn merge(
        &self,
        left: &Record,
        right: &Record,
        collisions: &BTreeSet<String>,
        shared_key: bool,
    ) -> Record {
        let mut out = Record::new();

        for (name, value) in left.iter() {
            if collisions.contains(name) {
                out.insert(format!("{}{}", name, self.left_suffix), value.clone());
            } else {
                out.insert(name, value.clone());
            }
        }

        for (name, value) in right.iter() {
            if shared_key && name == self.right_key {
                continue;
            }
            if collisions.contains(name) {
                out.insert(format!("{}{}", name, self.right_suffix), value.clone());
            } else {
                out.insert(name, value.clone());
            }
        }

        out
    }
}
