//! Row level data model shared by the aggregation stages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{AggError, ErrorInfo};

/// One row of a replicate log keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    /// Creates a record from `(field, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Returns the raw string value stored under `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Iterates over the record in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Parses `field` as a non-negative counter such as a generation or an
    /// evaluation count.
    pub fn counter(&self, field: &str) -> Result<u64, AggError> {
        let raw = self.get(field).ok_or_else(|| {
            AggError::Input(
                ErrorInfo::new("record.missing_counter", "counter field missing from record")
                    .with_context("field", field),
            )
        })?;
        raw.trim().parse::<u64>().map_err(|err| {
            AggError::Input(
                ErrorInfo::new("record.bad_counter", "counter field is not an integer")
                    .with_context("field", field)
                    .with_context("value", raw)
                    .with_hint(err.to_string()),
            )
        })
    }
}

/// Allow-listed configuration parameters of one replicate.
///
/// Built once per replicate and shared read-only by the summary row and all
/// time-series entries of that replicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigContext {
    params: BTreeMap<String, String>,
}

impl ConfigContext {
    /// Freezes the provided parameters into a context.
    pub fn new(params: BTreeMap<String, String>) -> Self {
        Self { params }
    }

    /// Returns the value of an allow-listed parameter.
    pub fn get(&self, param: &str) -> Option<&str> {
        self.params.get(param).map(String::as_str)
    }

    /// Iterates over the parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of parameters carried by the context.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when no allow-listed parameter was found.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Flat per-replicate row of the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicateSummary {
    /// Identifier of the replicate the row was built from.
    pub replicate: String,
    /// Column values keyed by column name.
    pub fields: BTreeMap<String, String>,
}

impl ReplicateSummary {
    /// Sorted field set of the row.
    pub fn schema(&self) -> Schema {
        Schema::from_names(self.fields.keys().cloned())
    }
}

/// One retained generation of one replicate in the time-series table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesEntry {
    /// Raw generation counter the entry is keyed by.
    pub generation: u64,
    /// Zero-based position of the generation within the retained subsequence.
    pub step: usize,
    /// Column values keyed by column name, the step column included.
    pub fields: BTreeMap<String, String>,
}

impl TimeSeriesEntry {
    /// Sorted field set of the entry.
    pub fn schema(&self) -> Schema {
        Schema::from_names(self.fields.keys().cloned())
    }
}

/// Sorted, de-duplicated list of column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema(Vec<String>);

impl Schema {
    /// Builds a schema from any collection of field names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<String> = names.into_iter().map(Into::into).collect();
        columns.sort();
        columns.dedup();
        Self(columns)
    }

    /// Column names in sorted order.
    pub fn columns(&self) -> &[String] {
        &self.0
    }

    /// Columns present in `other` but not in `self`, and the reverse.
    pub fn difference(&self, other: &Schema) -> (Vec<String>, Vec<String>) {
        let added = other
            .0
            .iter()
            .filter(|name| self.0.binary_search(name).is_err())
            .cloned()
            .collect();
        let removed = self
            .0
            .iter()
            .filter(|name| other.0.binary_search(name).is_err())
            .cloned()
            .collect();
        (added, removed)
    }
}
