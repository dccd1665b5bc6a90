// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

//! Column role inference from column names and a single sample row.

use crate::config::KeywordConfig;
use crate::row::{cell, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Time,
    Numeric,
    Label,
    Unclassified,
}

/// Independent role signals for one column. A column may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnTraits {
    pub time: bool,
    pub numeric: bool,
    pub label: bool,
}

impl ColumnTraits {
    pub fn role(&self) -> ColumnRole {
        if self.time {
            ColumnRole::Time
        } else if self.numeric {
            ColumnRole::Numeric
        } else if self.label {
            ColumnRole::Label
        } else {
            ColumnRole::Unclassified
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnClass {
    pub name: String,
    pub traits: ColumnTraits,
}

/// The classification of a whole row-set, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnRoles {
    columns: Vec<ColumnClass>,
}

impl ColumnRoles {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnClass> {
        self.columns.iter()
    }

    pub fn traits(&self, column: &str) -> Option<ColumnTraits> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.traits)
    }

    pub fn role(&self, column: &str) -> ColumnRole {
        self.traits(column)
            .map_or(ColumnRole::Unclassified, |t| t.role())
    }

    pub fn first_time(&self) -> Option<&str> {
        self.first_where(|t| t.time, None)
    }

    pub fn first_label(&self) -> Option<&str> {
        self.first_where(|t| t.label, None)
    }

    pub fn first_numeric(&self) -> Option<&str> {
        self.first_where(|t| t.numeric, None)
    }

    pub fn first_numeric_except(&self, excluded: &str) -> Option<&str> {
        self.first_where(|t| t.numeric, Some(excluded))
    }

    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.traits.numeric)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn numeric_count(&self) -> usize {
        self.columns.iter().filter(|c| c.traits.numeric).count()
    }

    pub fn has_time(&self) -> bool {
        self.columns.iter().any(|c| c.traits.time)
    }

    fn first_where<F>(&self, predicate: F, excluded: Option<&str>) -> Option<&str>
    where
        F: Fn(&ColumnTraits) -> bool,
    {
        self.columns
            .iter()
            .filter(|c| excluded != Some(c.name.as_str()))
            .find(|c| predicate(&c.traits))
            .map(|c| c.name.as_str())
    }
}

pub struct ColumnClassifier<'a> {
    keywords: &'a KeywordConfig,
}

impl<'a> ColumnClassifier<'a> {
    pub fn new(keywords: &'a KeywordConfig) -> Self {
        Self { keywords }
    }

    pub fn classify(&self, columns: &[String], sample_row: &Row) -> ColumnRoles {
        let columns = columns
            .iter()
            .map(|name| ColumnClass {
                name: name.clone(),
                traits: self.classify_column(name, sample_row),
            })
            .collect();
        ColumnRoles { columns }
    }

    fn classify_column(&self, name: &str, sample_row: &Row) -> ColumnTraits {
        let lowered = name.to_lowercase();
        let sample = cell(sample_row, name);
        // Aggregates often arrive as strings; trust the name when the text parses.
        let numeric_override =
            sample.looks_numeric() && name_matches(&lowered, &self.keywords.numeric_columns);
        ColumnTraits {
            time: name_matches(&lowered, &self.keywords.time_columns),
            numeric: sample.is_number() || numeric_override,
            label: (sample.is_text() && !numeric_override)
                || name_matches(&lowered, &self.keywords.label_columns),
        }
    }
}

fn name_matches(lowered: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| lowered.contains(k.as_str()))
}

/// Classifies with the built-in keyword tables.
pub fn classify(columns: &[String], sample_row: &Row) -> ColumnRoles {
    let keywords = KeywordConfig::default();
    ColumnClassifier::new(&keywords).classify(columns, sample_row)
}
