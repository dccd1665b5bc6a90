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

pub mod classifier;
pub mod config;
pub mod error;
pub mod formatter;
pub mod ingest;
pub mod palette;
pub mod response;
pub mod row;
pub mod selector;
pub mod series;
pub mod titles;

pub use classifier::{classify, ColumnClassifier, ColumnRole, ColumnRoles, ColumnTraits};
pub use config::{FormatterConfig, KeywordConfig, PaletteConfig, StyleConfig};
pub use error::{
    ConfigError, FormatError, IngestError, Result, ValidationError, VoxvizError,
};
pub use formatter::{format_for_visualization, VisualizationFormatter, VisualizationResult};
pub use palette::{generate_colors, Palette};
pub use response::{error_body, validate_query_text, ErrorBody, QueryResponse};
pub use row::{Row, Scalar};
pub use selector::{select_chart_type, ChartType, ChartTypeSelector};
pub use series::{bind_axes, AxisBinding, ChartSeries, SeriesBuilder};
pub use titles::{generate_description, generate_title};

/// Validates the question, formats the rows and wraps the outward envelope.
pub fn answer(
    formatter: &VisualizationFormatter,
    query_text: &str,
    rows: Vec<Row>,
    sql: Option<&str>,
) -> Result<QueryResponse> {
    let query_text = validate_query_text(query_text)?;
    let result = formatter.format(&rows, query_text)?;
    Ok(QueryResponse::build(result, rows, query_text, sql))
}
