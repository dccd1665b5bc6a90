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

use crate::error::{IngestError, IngestResult};
use crate::row::{Row, Scalar};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Parses a JSON array of flat objects.
pub fn rows_from_json(content: &str) -> IngestResult<Vec<Row>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(content)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            if !value.is_object() {
                return Err(IngestError::NotARow { index });
            }
            serde_json::from_value::<Row>(value).map_err(|_| IngestError::NotARow { index })
        })
        .collect()
}

/// Parses CSV with a header row. Cells are typed by their text.
pub fn rows_from_csv<R: Read>(reader: R) -> IngestResult<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| (header.to_string(), infer_cell(field)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

pub fn rows_from_json_file<P: AsRef<Path>>(path: P) -> IngestResult<Vec<Row>> {
    let content = std::fs::read_to_string(path)?;
    rows_from_json(&content)
}

pub fn rows_from_csv_file<P: AsRef<Path>>(path: P) -> IngestResult<Vec<Row>> {
    rows_from_csv(File::open(path)?)
}

fn infer_cell(field: &str) -> Scalar {
    if field.is_empty() {
        return Scalar::Null;
    }
    // Zero-padded codes such as "007" are identifiers, not quantities.
    if has_leading_zero(field) {
        return Scalar::Text(field.to_string());
    }
    if let Ok(number) = field.parse::<i64>() {
        return Scalar::from(number);
    }
    if let Ok(number) = field.parse::<u64>() {
        return Scalar::from(number);
    }
    if let Ok(number) = field.parse::<f64>() {
        if number.is_finite() {
            return Scalar::from(number);
        }
    }
    match field {
        "true" | "TRUE" | "True" => Scalar::Bool(true),
        "false" | "FALSE" | "False" => Scalar::Bool(false),
        _ => Scalar::Text(field.to_string()),
    }
}

fn has_leading_zero(field: &str) -> bool {
    let digits = field.strip_prefix(['+', '-']).unwrap_or(field);
    let mut chars = digits.chars();
    chars.next() == Some('0') && chars.next().is_some_and(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_json_rows() {
        let rows = rows_from_json(r#"[{"device": "iOS", "count": 40}]"#).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["count"], Scalar::from(40));
    }

    #[test]
    fn test_json_rejects_nested_values() {
        let err = rows_from_json(r#"[{"a": 1}, {"a": {"b": 2}}]"#).unwrap_err();
        assert!(matches!(err, IngestError::NotARow { index: 1 }));
        let err = rows_from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, IngestError::NotARow { index: 0 }));
    }

    #[test]
    fn test_json_empty_array() {
        assert!(rows_from_json("[]").unwrap().is_empty());
    }

    #[test]
    fn test_csv_typing() {
        let csv = "month, revenue, active, note\n2024-01, 1200.5, true,\nFeb, 900, false, late\n";
        let rows = rows_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        let columns: Vec<&String> = rows[0].keys().collect();
        assert_eq!(columns, vec!["month", "revenue", "active", "note"]);
        assert_eq!(rows[0]["month"], Scalar::from("2024-01"));
        assert_eq!(rows[0]["revenue"], Scalar::from(1200.5));
        assert_eq!(rows[0]["active"], Scalar::Bool(true));
        assert_eq!(rows[0]["note"], Scalar::Null);
        assert_eq!(rows[1]["note"], Scalar::from("late"));
    }

    #[test]
    fn test_csv_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "product,sales\nA,10\nB,5\n").unwrap();
        let rows = rows_from_csv_file(file.path()).unwrap();
        assert_eq!(rows[1]["sales"], Scalar::from(5));
        assert_eq!(serde_json::to_string(&rows[1]["sales"]).unwrap(), "5");
    }

    #[test]
    fn test_csv_keeps_zero_padded_codes_as_text() {
        let csv = "sku,qty,ratio,delta\n007,0,0.5,-0012\n";
        let rows = rows_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows[0]["sku"], Scalar::from("007"));
        assert_eq!(rows[0]["qty"], Scalar::from(0));
        assert_eq!(rows[0]["ratio"], Scalar::from(0.5));
        assert_eq!(rows[0]["delta"], Scalar::from("-0012"));
    }

    #[test]
    fn test_csv_large_integers_keep_precision() {
        let rows = rows_from_csv("id\n9007199254740993\n".as_bytes()).unwrap();
        assert_eq!(serde_json::to_string(&rows[0]["id"]).unwrap(), "9007199254740993");
    }
}
