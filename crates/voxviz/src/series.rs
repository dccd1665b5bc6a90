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

//! Axis binding and chart-ready series records.
//!
//! Each chart type picks its columns by role, falling back to position when
//! no column carries the wanted role. With a single column every "second
//! column" fallback resolves to that column.

use crate::classifier::ColumnRoles;
use crate::config::FormatterConfig;
use crate::palette::Palette;
use crate::row::{cell, null_cell, Row, Scalar};
use crate::selector::ChartType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartSeries {
    Pie(PieSeries),
    Line(LineSeries),
    Scatter(ScatterSeries),
    Bar(BarSeries),
}

impl ChartSeries {
    pub fn chart_type(&self) -> ChartType {
        match self {
            ChartSeries::Pie(_) => ChartType::Pie,
            ChartSeries::Line(_) => ChartType::Line,
            ChartSeries::Scatter(_) => ChartType::Scatter,
            ChartSeries::Bar(_) => ChartType::Bar,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ChartSeries::Pie(s) => s.points.len(),
            ChartSeries::Line(s) => s.points.len(),
            ChartSeries::Scatter(s) => s.points.len(),
            ChartSeries::Bar(s) => s.points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiePoint {
    pub label: Scalar,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSeries {
    pub name: String,
    pub points: Vec<PiePoint>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub x: Scalar,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<LinePoint>,
    pub color: String,
    pub width: u32,
    pub marker_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterSeries {
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
    pub color: String,
    pub size: u32,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPoint {
    pub category: Scalar,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub points: Vec<BarPoint>,
    pub colors: Vec<String>,
}

/// Two-column binding chosen for a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBinding<'c> {
    pub primary: Option<&'c str>,
    pub secondary: Option<&'c str>,
}

pub struct SeriesBuilder<'a> {
    config: &'a FormatterConfig,
}

impl<'a> SeriesBuilder<'a> {
    pub fn new(config: &'a FormatterConfig) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        chart_type: ChartType,
        rows: &[Row],
        columns: &[String],
        roles: &ColumnRoles,
    ) -> Vec<ChartSeries> {
        let binding = bind_axes(chart_type, columns, roles);
        tracing::debug!(
            chart_type = %chart_type,
            primary = ?binding.primary,
            secondary = ?binding.secondary,
            "Bound chart axes"
        );
        let series = match chart_type {
            ChartType::Pie => ChartSeries::Pie(self.pie(rows, binding)),
            ChartType::Line => ChartSeries::Line(self.line(rows, binding)),
            ChartType::Scatter => ChartSeries::Scatter(self.scatter(rows, binding)),
            ChartType::Bar => ChartSeries::Bar(self.bar(rows, binding)),
        };
        vec![series]
    }

    fn pie(&self, rows: &[Row], binding: AxisBinding<'_>) -> PieSeries {
        let points: Vec<PiePoint> = rows
            .iter()
            .map(|row| PiePoint {
                label: value_at(row, binding.primary).clone(),
                value: value_at(row, binding.secondary).lenient_f64(),
            })
            .collect();
        PieSeries {
            name: "Distribution".to_string(),
            colors: self.palette().colors(points.len()),
            points,
        }
    }

    fn line(&self, rows: &[Row], binding: AxisBinding<'_>) -> LineSeries {
        let style = &self.config.style;
        LineSeries {
            name: humanise(binding.secondary.unwrap_or_default()),
            points: rows
                .iter()
                .map(|row| LinePoint {
                    x: value_at(row, binding.primary).clone(),
                    y: value_at(row, binding.secondary).lenient_f64(),
                })
                .collect(),
            color: style.line_color.clone(),
            width: style.line_width,
            marker_size: style.line_marker_size,
        }
    }

    fn scatter(&self, rows: &[Row], binding: AxisBinding<'_>) -> ScatterSeries {
        let style = &self.config.style;
        ScatterSeries {
            name: "Data Points".to_string(),
            x_label: binding.primary.unwrap_or_default().to_string(),
            y_label: binding.secondary.unwrap_or_default().to_string(),
            points: rows
                .iter()
                .map(|row| ScatterPoint {
                    x: value_at(row, binding.primary).lenient_f64(),
                    y: value_at(row, binding.secondary).lenient_f64(),
                })
                .collect(),
            color: style.scatter_color.clone(),
            size: style.scatter_size,
            opacity: style.scatter_opacity,
        }
    }

    fn bar(&self, rows: &[Row], binding: AxisBinding<'_>) -> BarSeries {
        let points: Vec<BarPoint> = rows
            .iter()
            .map(|row| BarPoint {
                category: value_at(row, binding.primary).clone(),
                value: value_at(row, binding.secondary).lenient_f64(),
            })
            .collect();
        BarSeries {
            name: humanise(binding.secondary.unwrap_or_default()),
            colors: self.palette().colors(points.len()),
            points,
        }
    }

    fn palette(&self) -> Palette<'_> {
        Palette::new(&self.config.palette)
    }
}

/// Picks the two columns a chart type draws from.
pub fn bind_axes<'c>(
    chart_type: ChartType,
    columns: &'c [String],
    roles: &'c ColumnRoles,
) -> AxisBinding<'c> {
    let first = positional(columns, 0);
    let second = positional(columns, 1);
    match chart_type {
        ChartType::Pie => AxisBinding {
            primary: roles.first_label().or(first),
            secondary: roles.first_numeric().or(second),
        },
        ChartType::Line => {
            let x = roles.first_time().or(first);
            AxisBinding {
                primary: x,
                secondary: numeric_other_than(roles, x).or(second),
            }
        }
        ChartType::Scatter => {
            let numeric = roles.numeric_columns();
            if numeric.len() >= 2 {
                AxisBinding {
                    primary: Some(numeric[0]),
                    secondary: Some(numeric[1]),
                }
            } else {
                AxisBinding {
                    primary: first,
                    secondary: second,
                }
            }
        }
        ChartType::Bar => {
            let category = roles.first_label().or(first);
            AxisBinding {
                primary: category,
                secondary: numeric_other_than(roles, category).or(second),
            }
        }
    }
}

fn numeric_other_than<'c>(roles: &'c ColumnRoles, column: Option<&str>) -> Option<&'c str> {
    match column {
        Some(excluded) => roles.first_numeric_except(excluded),
        None => roles.first_numeric(),
    }
}

fn positional(columns: &[String], index: usize) -> Option<&str> {
    columns
        .get(index)
        .or_else(|| columns.first())
        .map(String::as_str)
}

fn value_at<'r>(row: &'r Row, column: Option<&str>) -> &'r Scalar {
    match column {
        Some(name) => cell(row, name),
        None => null_cell(),
    }
}

/// `revenue_total` becomes `Revenue Total`.
pub fn humanise(column: &str) -> String {
    let spaced = column.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut previous_is_word = false;
    for c in spaced.chars() {
        let is_word = c.is_ascii_alphanumeric();
        if is_word && !previous_is_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        previous_is_word = is_word;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::row;
    use crate::row::column_names;

    fn build(chart_type: ChartType, rows: &[Row]) -> ChartSeries {
        let columns = column_names(rows);
        let roles = classify(&columns, &rows[0]);
        let config = FormatterConfig::default();
        let mut series = SeriesBuilder::new(&config).build(chart_type, rows, &columns, &roles);
        assert_eq!(series.len(), 1);
        series.remove(0)
    }

    #[test]
    fn test_pie_binds_label_and_value() {
        let rows = vec![
            row! { "device" => "iOS", "count" => 40 },
            row! { "device" => "Android", "count" => 60 },
        ];
        let ChartSeries::Pie(pie) = build(ChartType::Pie, &rows) else {
            panic!("expected pie series");
        };
        assert_eq!(pie.points[0].label, Scalar::from("iOS"));
        assert_eq!(pie.points.iter().map(|p| p.value).collect::<Vec<_>>(), vec![40.0, 60.0]);
        assert_eq!(pie.colors, vec!["#3B82F6", "#10B981"]);
    }

    #[test]
    fn test_pie_falls_back_to_positions() {
        let rows = vec![row! { "flag" => true, "other" => Scalar::Null }];
        let ChartSeries::Pie(pie) = build(ChartType::Pie, &rows) else {
            panic!("expected pie series");
        };
        assert_eq!(pie.points[0].label, Scalar::Bool(true));
        assert_eq!(pie.points[0].value, 0.0);
    }

    #[test]
    fn test_line_keeps_row_order() {
        let rows = vec![
            row! { "month" => "2024-03", "revenue" => "300" },
            row! { "month" => "2024-01", "revenue" => 100 },
        ];
        let ChartSeries::Line(line) = build(ChartType::Line, &rows) else {
            panic!("expected line series");
        };
        assert_eq!(line.points[0].x, Scalar::from("2024-03"));
        assert_eq!(line.points[1].x, Scalar::from("2024-01"));
        assert_eq!(line.points[0].y, 300.0);
        assert_eq!(line.points[1].y, 100.0);
        assert_eq!(line.name, "Revenue");
        assert_eq!(line.color, "#10B981");
    }

    #[test]
    fn test_line_y_skips_numeric_time_column() {
        let rows = vec![row! { "year" => 2023, "units_sold" => 9 }];
        let columns = column_names(&rows);
        let roles = classify(&columns, &rows[0]);
        let binding = bind_axes(ChartType::Line, &columns, &roles);
        assert_eq!(binding.primary, Some("year"));
        assert_eq!(binding.secondary, Some("units_sold"));
    }

    #[test]
    fn test_scatter_uses_numeric_columns() {
        let rows = vec![
            row! { "city" => "Oslo", "temp" => 4.5, "rain" => 120 },
            row! { "city" => "Rome", "temp" => "N/A", "rain" => 40 },
        ];
        let ChartSeries::Scatter(scatter) = build(ChartType::Scatter, &rows) else {
            panic!("expected scatter series");
        };
        assert_eq!(scatter.x_label, "temp");
        assert_eq!(scatter.y_label, "rain");
        assert_eq!(scatter.points[1], ScatterPoint { x: 0.0, y: 40.0 });
        assert_eq!(scatter.opacity, 0.7);
    }

    #[test]
    fn test_scatter_positional_fallback_coerces() {
        let rows = vec![row! { "a" => "1.5", "b" => "x" }];
        let ChartSeries::Scatter(scatter) = build(ChartType::Scatter, &rows) else {
            panic!("expected scatter series");
        };
        assert_eq!(scatter.x_label, "a");
        assert_eq!(scatter.points[0], ScatterPoint { x: 1.5, y: 0.0 });
    }

    #[test]
    fn test_bar_value_not_category() {
        let rows = vec![
            row! { "product" => "A", "sales" => 10 },
            row! { "product" => "B", "sales" => "N/A" },
        ];
        let ChartSeries::Bar(bar) = build(ChartType::Bar, &rows) else {
            panic!("expected bar series");
        };
        assert_eq!(bar.points[0].category, Scalar::from("A"));
        assert_eq!(bar.points[1].value, 0.0);
        assert_eq!(bar.name, "Sales");
        assert_eq!(bar.colors.len(), 2);
    }

    #[test]
    fn test_single_column_duplicates() {
        let rows = vec![row! { "total" => 5 }];
        let ChartSeries::Bar(bar) = build(ChartType::Bar, &rows) else {
            panic!("expected bar series");
        };
        assert_eq!(bar.points[0].category, Scalar::from(5));
        assert_eq!(bar.points[0].value, 5.0);
    }

    #[test]
    fn test_missing_cells_read_as_zero() {
        let rows = vec![
            row! { "product" => "A", "sales" => 10 },
            row! { "product" => "B" },
        ];
        let ChartSeries::Bar(bar) = build(ChartType::Bar, &rows) else {
            panic!("expected bar series");
        };
        assert_eq!(bar.points[1].value, 0.0);
    }

    #[test]
    fn test_series_serialises_tagged() {
        let rows = vec![row! { "product" => "A", "sales" => 10 }];
        let value = serde_json::to_value(build(ChartType::Bar, &rows)).unwrap();
        assert_eq!(value["type"], "bar");
        assert_eq!(value["points"][0]["category"], "A");
        assert_eq!(value["points"][0]["value"], 10.0);
    }

    #[test]
    fn test_humanise() {
        assert_eq!(humanise("revenue_total"), "Revenue Total");
        assert_eq!(humanise("avg-price"), "Avg-Price");
        assert_eq!(humanise(""), "");
    }

    #[test]
    fn test_integer_labels_serialise_as_integers() {
        let rows = vec![
            row! { "year" => 2024, "units" => 10 },
            row! { "year" => 2025, "units" => 12 },
        ];
        let value = serde_json::to_value(build(ChartType::Pie, &rows)).unwrap();
        assert_eq!(serde_json::to_string(&value["points"][0]["label"]).unwrap(), "2024");
    }
}
