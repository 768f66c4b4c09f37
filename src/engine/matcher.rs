//! Record matching for select, update and delete
//!
//! Conjunctive equality only. No type coercion, no expressions, exact match.

use std::collections::BTreeMap;

use crate::schema::{Record, Value};

/// Conjunction of `column = value` conditions.
///
/// An empty predicate matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Predicate {
    conditions: BTreeMap<String, Value>,
}

impl Predicate {
    /// The empty predicate
    pub fn all() -> Self {
        Self::default()
    }

    /// A single `column = value` condition
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(column, value)
    }

    /// Adds a condition. A later condition on the same column replaces the earlier one.
    pub fn and(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(column.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Predicate {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::all(), |pred, (k, v)| pred.and(k, v))
    }
}

/// Set-clause of an update: column to new value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignments {
    values: BTreeMap<String, Value>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overwrites every assigned column of `record`
    pub fn apply(&self, record: &mut Record) {
        for (column, value) in &self.values {
            record.set(column.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Assignments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, (k, v)| set.set(k, v))
    }
}

/// Evaluates predicates against records
pub struct RecordMatcher;

impl RecordMatcher {
    /// Checks if a record satisfies every condition (AND semantics)
    pub fn matches(record: &Record, predicate: &Predicate) -> bool {
        predicate
            .iter()
            .all(|(column, expected)| Self::matches_condition(record, column, expected))
    }

    fn matches_condition(record: &Record, column: &str, expected: &Value) -> bool {
        match record.get(column) {
            Some(actual) => actual == expected,
            None => false, // Missing column = no match
        }
    }

    /// Returns the matching records in original order
    pub fn filter(data: &[Record], predicate: &Predicate) -> Vec<Record> {
        data.iter()
            .filter(|record| Self::matches(record, predicate))
            .cloned()
            .collect()
    }
}
