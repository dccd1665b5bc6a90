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

use crate::classifier::ColumnRoles;
use crate::config::KeywordConfig;
use crate::row::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Pie,
    Line,
    Scatter,
    Bar,
}

impl ChartType {
    pub const ALL: [ChartType; 4] = [
        ChartType::Pie,
        ChartType::Line,
        ChartType::Scatter,
        ChartType::Bar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Pie => "pie",
            ChartType::Line => "line",
            ChartType::Scatter => "scatter",
            ChartType::Bar => "bar",
        }
    }

    /// Noun phrase appended to the chart title.
    pub fn title_suffix(&self) -> &'static str {
        match self {
            ChartType::Pie => "Distribution",
            ChartType::Line => "Trend Analysis",
            ChartType::Scatter => "Correlation Analysis",
            ChartType::Bar => "Performance Analysis",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered decision table. The first rule that fires wins.
pub struct ChartTypeSelector<'a> {
    keywords: &'a KeywordConfig,
}

impl<'a> ChartTypeSelector<'a> {
    pub fn new(keywords: &'a KeywordConfig) -> Self {
        Self { keywords }
    }

    pub fn select(&self, query_text: &str, rows: &[Row], roles: &ColumnRoles) -> ChartType {
        let query = query_text.to_lowercase();
        let column_count = rows.first().map_or(roles.len(), |row| row.len());
        if mentions_any(&query, &self.keywords.pie) {
            ChartType::Pie
        } else if mentions_any(&query, &self.keywords.line) || roles.has_time() {
            ChartType::Line
        } else if mentions_any(&query, &self.keywords.scatter)
            || (column_count >= 2 && roles.numeric_count() >= 2)
        {
            ChartType::Scatter
        } else {
            ChartType::Bar
        }
    }
}

fn mentions_any(query: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| query.contains(k.as_str()))
}

/// Selects with the built-in keyword tables.
pub fn select_chart_type(query_text: &str, rows: &[Row], roles: &ColumnRoles) -> ChartType {
    let keywords = KeywordConfig::default();
    ChartTypeSelector::new(&keywords).select(query_text, rows, roles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::row;
    use crate::row::column_names;

    fn choose(query: &str, rows: &[Row]) -> ChartType {
        let roles = classify(&column_names(rows), &rows[0]);
        select_chart_type(query, rows, &roles)
    }

    #[test]
    fn test_pie_keywords() {
        let rows = vec![row! { "device" => "iOS", "count" => 40 }];
        for query in ["Show a PIE chart", "market share by device", "Percentage of users"] {
            assert_eq!(choose(query, &rows), ChartType::Pie, "{query}");
        }
    }

    #[test]
    fn test_pie_beats_trend() {
        let rows = vec![row! { "month" => "Jan", "revenue" => 10 }];
        assert_eq!(choose("pie chart of the sales trend", &rows), ChartType::Pie);
    }

    #[test]
    fn test_time_column_selects_line() {
        let rows = vec![row! { "quarter" => "Q1", "revenue" => 10 }];
        assert_eq!(choose("revenue by quarter", &rows), ChartType::Line);
    }

    #[test]
    fn test_line_beats_numeric_scatter() {
        let rows = vec![row! { "year" => 2020, "price" => 1.5, "volume" => 30 }];
        assert_eq!(choose("prices", &rows), ChartType::Line);
    }

    #[test]
    fn test_two_numeric_columns_select_scatter() {
        let rows = vec![row! { "height" => 180, "weight" => 75 }];
        assert_eq!(choose("height against weight", &rows), ChartType::Scatter);
    }

    #[test]
    fn test_scatter_keyword() {
        let rows = vec![row! { "product" => "A", "sales" => 10 }];
        assert_eq!(
            choose("relationship between product and sales", &rows),
            ChartType::Scatter
        );
    }

    #[test]
    fn test_bar_fallback() {
        let rows = vec![row! { "product" => "A", "sales" => 10 }];
        assert_eq!(choose("Compare product performance", &rows), ChartType::Bar);
        let single = vec![row! { "flag" => true }];
        assert_eq!(choose("what", &single), ChartType::Bar);
    }

    #[test]
    fn test_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&ChartType::Scatter).unwrap(), "\"scatter\"");
        assert_eq!(ChartType::Bar.to_string(), "bar");
    }
}
