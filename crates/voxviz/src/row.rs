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

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

static FLOAT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("float prefix regex is valid")
});

/// A single cell of a query result. Numbers keep their integer or float
/// representation so rows echo back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

/// One result row. Key order is column order.
pub type Row = IndexMap<String, Scalar>;

impl Scalar {
    pub fn is_number(&self) -> bool {
        matches!(self, Scalar::Number(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Scalar::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric reading of a cell that never fails.
    ///
    /// Text contributes its longest leading float literal, so `"12.5kg"` reads
    /// as `12.5`. Booleans, nulls, non-finite numbers and text without a
    /// leading number all read as `0.0`.
    pub fn lenient_f64(&self) -> f64 {
        let value = match self {
            Scalar::Number(n) => n.as_f64().unwrap_or(0.0),
            Scalar::Text(s) => parse_float_prefix(s).unwrap_or(0.0),
            Scalar::Bool(_) | Scalar::Null => 0.0,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// True for text that is, in its entirety, a finite float literal.
    pub fn looks_numeric(&self) -> bool {
        match self {
            Scalar::Text(s) => {
                let trimmed = s.trim();
                FLOAT_PREFIX_RE
                    .find(trimmed)
                    .is_some_and(|m| m.end() == trimmed.len())
            }
            _ => false,
        }
    }
}

fn parse_float_prefix(text: &str) -> Option<f64> {
    let m = FLOAT_PREFIX_RE.find(text.trim_start())?;
    m.as_str().parse::<f64>().ok()
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Scalar::Null, Scalar::Number)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(Number::from(value))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(Number::from(value))
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Number(Number::from(value))
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

static NULL_CELL: Scalar = Scalar::Null;

pub(crate) fn null_cell() -> &'static Scalar {
    &NULL_CELL
}

/// Reads a cell, treating a missing key as `Null`.
pub fn cell<'r>(row: &'r Row, column: &str) -> &'r Scalar {
    row.get(column).unwrap_or(&NULL_CELL)
}

/// Column names of the first row, in order.
pub fn column_names(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// Builds a row from `(column, value)` pairs.
#[macro_export]
macro_rules! row {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut row = $crate::Row::new();
        $( row.insert($key.to_string(), $crate::Scalar::from($value)); )*
        row
    }};
}
