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

//! Outward response shapes wrapped around a [`VisualizationResult`].

use crate::error::{ValidationError, VoxvizError};
use crate::formatter::VisualizationResult;
use crate::row::Row;
use crate::selector::ChartType;
use crate::series::ChartSeries;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_QUERY_CHARS: usize = 3;
pub const MAX_QUERY_CHARS: usize = 500;

/// Accepts questions of 3 to 500 characters, measured after trimming.
pub fn validate_query_text(text: &str) -> Result<&str, ValidationError> {
    let trimmed = text.trim();
    let actual = trimmed.chars().count();
    if (MIN_QUERY_CHARS..=MAX_QUERY_CHARS).contains(&actual) {
        Ok(trimmed)
    } else {
        Err(ValidationError::QueryLength {
            min: MIN_QUERY_CHARS,
            max: MAX_QUERY_CHARS,
            actual,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    pub title: String,
    pub description: String,
    pub chart_type: ChartType,
    pub columns: Vec<String>,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInfo {
    pub original: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    pub executed_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub success: bool,
    pub data: Vec<ChartSeries>,
    pub metadata: ResultMetadata,
    pub raw_data: Vec<Row>,
    pub query: QueryInfo,
}

impl QueryResponse {
    pub fn build(
        result: VisualizationResult,
        raw_rows: Vec<Row>,
        original: &str,
        sql: Option<&str>,
    ) -> Self {
        Self::build_at(result, raw_rows, original, sql, Utc::now())
    }

    pub fn build_at(
        result: VisualizationResult,
        raw_rows: Vec<Row>,
        original: &str,
        sql: Option<&str>,
        executed_at: DateTime<Utc>,
    ) -> Self {
        let VisualizationResult {
            data,
            chart_type,
            title,
            description,
            columns,
            row_count,
        } = result;
        Self {
            success: true,
            data,
            metadata: ResultMetadata {
                title,
                description,
                chart_type,
                columns,
                row_count,
            },
            raw_data: raw_rows,
            query: QueryInfo {
                original: original.to_string(),
                sql: sql.map(str::to_string),
                executed_at: executed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

pub fn error_body(err: &VoxvizError) -> ErrorBody {
    ErrorBody {
        error: err.label().to_string(),
        message: err.user_message(),
    }
}
