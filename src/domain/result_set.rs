// src/domain/result_set.rs
use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::listing::{Field, ListingRecord};

/// Column store of everything scraped in a run: field -> one value per record.
///
/// Columns are expected to stay the same length, but nothing here enforces
/// it. Check `is_uniform` before treating the set as rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    columns: BTreeMap<Field, Vec<String>>,
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSet {
    pub fn new() -> Self {
        Self {
            columns: Field::ALL.iter().map(|f| (*f, Vec::new())).collect(),
        }
    }

    pub fn push_record(&mut self, record: &ListingRecord) {
        for field in Field::ALL {
            self.push_value(field, record.value(field));
        }
    }

    pub fn push_value(&mut self, field: Field, value: impl Into<String>) {
        self.columns.entry(field).or_default().push(value.into());
    }

    #[cfg(test)]
    pub fn column(&self, field: Field) -> &[String] {
        self.columns.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn column_lengths(&self) -> Vec<(Field, usize)> {
        self.columns.iter().map(|(f, v)| (*f, v.len())).collect()
    }

    pub fn is_uniform(&self) -> bool {
        let mut lengths = self.columns.values().map(Vec::len);
        match lengths.next() {
            Some(first) => lengths.all(|len| len == first),
            None => true,
        }
    }

    /// Longest column; equals the record count when the set is uniform.
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major view, only available when every column has the same length.
    pub fn rows(&self) -> Option<Vec<Vec<&str>>> {
        if !self.is_uniform() {
            return None;
        }
        let rows = (0..self.len())
            .map(|i| {
                self.columns
                    .values()
                    .map(|column| column[i].as_str())
                    .collect()
            })
            .collect();
        Some(rows)
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (field, values) in &self.columns {
            map.serialize_entry(field.as_str(), values)?;
        }
        map.end()
    }
}
