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

use crate::classifier::ColumnClassifier;
use crate::config::FormatterConfig;
use crate::error::FormatError;
use crate::row::{column_names, Row};
use crate::selector::{ChartType, ChartTypeSelector};
use crate::series::{ChartSeries, SeriesBuilder};
use crate::titles::{generate_description, TitleGenerator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationResult {
    pub data: Vec<ChartSeries>,
    pub chart_type: ChartType,
    pub title: String,
    pub description: String,
    pub columns: Vec<String>,
    pub row_count: usize,
}

/// Turns a query result and the question that produced it into a chart.
///
/// Holds only configuration, so one instance can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct VisualizationFormatter {
    config: FormatterConfig,
}

impl VisualizationFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyword tables are normalised on the way in.
    pub fn with_config(mut config: FormatterConfig) -> Self {
        config.normalise();
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Fails only on an empty row-set. The first row is the schema sample.
    pub fn format(
        &self,
        rows: &[Row],
        query_text: &str,
    ) -> Result<VisualizationResult, FormatError> {
        let sample_row = rows.first().ok_or(FormatError::EmptyInput)?;
        let columns = column_names(rows);
        let keywords = &self.config.keywords;

        let roles = ColumnClassifier::new(keywords).classify(&columns, sample_row);
        let chart_type = ChartTypeSelector::new(keywords).select(query_text, rows, &roles);
        tracing::debug!(
            columns = columns.len(),
            rows = rows.len(),
            chart_type = %chart_type,
            "Selected chart type"
        );

        let data = SeriesBuilder::new(&self.config).build(chart_type, rows, &columns, &roles);
        let title = TitleGenerator::new(keywords).title(query_text, chart_type.title_suffix());
        let description = generate_description(chart_type, rows.len());

        Ok(VisualizationResult {
            data,
            chart_type,
            title,
            description,
            columns,
            row_count: rows.len(),
        })
    }
}

/// Formats with the built-in configuration.
pub fn format_for_visualization(
    rows: &[Row],
    query_text: &str,
) -> Result<VisualizationResult, FormatError> {
    VisualizationFormatter::new().format(rows, query_text)
}
