// src/search/filters.rs
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::search::FilterFileError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCategory {
    pub name: String,
    pub values: Vec<String>,
}

/// Category -> values to tick, in the order the filter file lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    categories: Vec<FilterCategory>,
}

impl FilterSet {
    #[cfg(test)]
    pub fn new(categories: Vec<FilterCategory>) -> Self {
        Self { categories }
    }

    pub fn load(path: &Path) -> Result<Self, FilterFileError> {
        let raw = fs::read_to_string(path).map_err(|source| FilterFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Expects `{"make": ["Honda", "Toyota"], ...}`. Object order is kept.
    pub fn from_json(raw: &str) -> Result<Self, FilterFileError> {
        let doc: Value = serde_json::from_str(raw)?;
        let object = doc.as_object().ok_or(FilterFileError::NotAnObject)?;

        let mut categories = Vec::with_capacity(object.len());
        for (name, values) in object {
            let values = values
                .as_array()
                .and_then(|items| {
                    items
                        .iter()
                        .map(|v| v.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                })
                .ok_or_else(|| FilterFileError::BadCategory {
                    category: name.clone(),
                })?;
            categories.push(FilterCategory {
                name: name.clone(),
                values,
            });
        }

        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[FilterCategory] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.values.is_empty())
    }
}
