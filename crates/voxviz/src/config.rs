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

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_PATH_ENV: &str = "VOXVIZ_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/formatter.yml";

/// Generated hues must not repeat within this many steps.
const MIN_DISTINCT_HUES: u32 = 12;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub keywords: KeywordConfig,
    pub palette: PaletteConfig,
    pub style: StyleConfig,
}

/// Substring tables driving classification, chart selection and titles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub pie: Vec<String>,
    pub line: Vec<String>,
    pub scatter: Vec<String>,
    pub time_columns: Vec<String>,
    pub label_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    /// Checked in order; the first hit names the chart.
    pub title_domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub base: Vec<String>,
    pub hue_step: f64,
    pub saturation: u8,
    pub lightness: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub line_color: String,
    pub line_width: u32,
    pub line_marker_size: u32,
    pub scatter_color: String,
    pub scatter_size: u32,
    pub scatter_opacity: f64,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            pie: strings(&["pie", "distribution", "share", "percentage", "proportion"]),
            line: strings(&["line", "trend", "time", "over time", "timeline"]),
            scatter: strings(&["scatter", "correlation", "relationship"]),
            time_columns: strings(&[
                "date",
                "time",
                "timestamp",
                "created_at",
                "updated_at",
                "period",
                "quarter",
                "month",
                "year",
            ]),
            label_columns: strings(&["name", "category"]),
            numeric_columns: strings(&["amount", "count", "value"]),
            title_domains: strings(&["sales", "revenue", "customer", "product", "performance"]),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            base: strings(&[
                "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6",
                "#F97316", "#6366F1", "#84CC16", "#F43F5E", "#06B6D4",
            ]),
            hue_step: 137.508,
            saturation: 70,
            lightness: 50,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            line_color: "#10B981".to_string(),
            line_width: 3,
            line_marker_size: 8,
            scatter_color: "#3B82F6".to_string(),
            scatter_size: 10,
            scatter_opacity: 0.7,
        }
    }
}

impl FormatterConfig {
    /// Loads from `$VOXVIZ_CONFIG_PATH`, or `config/formatter.yml` when unset.
    pub fn load() -> ConfigResult<Self> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_yaml_file(&config_path)
    }

    /// Like [`FormatterConfig::load`], but any failure yields the defaults.
    ///
    /// A missing default file is routine and logged at debug level; a failure
    /// on an explicitly configured path is a warning.
    pub fn load_or_default() -> Self {
        let explicit = std::env::var_os(CONFIG_PATH_ENV).is_some();
        match Self::load() {
            Ok(config) => config,
            Err(e) if explicit => {
                tracing::warn!(error = %e, "Falling back to default formatter configuration");
                Self::default()
            }
            Err(e) => {
                tracing::debug!(error = %e, "Using default formatter configuration");
                Self::default()
            }
        }
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileError {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let mut config: FormatterConfig = serde_yaml::from_str(content)?;
        config.normalise();
        config.validate()?;
        Ok(config)
    }

    /// Keywords are matched against lowercased text, so they are stored
    /// trimmed and lowercased.
    pub fn normalise(&mut self) {
        self.keywords.normalise();
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (field, table, required) in self.keywords.tables() {
            if required && table.is_empty() {
                return Err(invalid(field, "must contain at least one keyword"));
            }
            if table.iter().any(|k| k.trim().is_empty()) {
                return Err(invalid(field, "must contain only non-empty keywords"));
            }
        }
        self.palette.validate()?;
        if !(0.0..=1.0).contains(&self.style.scatter_opacity) {
            return Err(invalid("style.scatter_opacity", "must be between 0.0 and 1.0"));
        }
        Ok(())
    }
}

impl KeywordConfig {
    pub fn normalise(&mut self) {
        for table in [
            &mut self.pie,
            &mut self.line,
            &mut self.scatter,
            &mut self.time_columns,
            &mut self.label_columns,
            &mut self.numeric_columns,
            &mut self.title_domains,
        ] {
            for keyword in table.iter_mut() {
                *keyword = keyword.trim().to_lowercase();
            }
        }
    }

    /// Every table with its field name and whether it must be non-empty.
    fn tables(&self) -> [(&'static str, &[String], bool); 7] {
        [
            ("keywords.pie", self.pie.as_slice(), true),
            ("keywords.line", self.line.as_slice(), true),
            ("keywords.scatter", self.scatter.as_slice(), true),
            ("keywords.time_columns", self.time_columns.as_slice(), true),
            ("keywords.label_columns", self.label_columns.as_slice(), false),
            ("keywords.numeric_columns", self.numeric_columns.as_slice(), false),
            ("keywords.title_domains", self.title_domains.as_slice(), false),
        ]
    }
}

impl PaletteConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.base.is_empty() {
            return Err(invalid("palette.base", "must contain at least one colour"));
        }
        for (i, colour) in self.base.iter().enumerate() {
            if self.base[..i].iter().any(|c| c.eq_ignore_ascii_case(colour)) {
                return Err(invalid("palette.base", "must not repeat a colour"));
            }
        }
        if !(self.hue_step.is_finite() && self.hue_step > 0.0) {
            return Err(invalid("palette.hue_step", "must be a positive number"));
        }
        let repeats = (1..MIN_DISTINCT_HUES).any(|k| {
            let turn = (f64::from(k) * self.hue_step) % 360.0;
            turn < 1e-6 || 360.0 - turn < 1e-6
        });
        if repeats {
            return Err(invalid(
                "palette.hue_step",
                "must not bring generated hues back round within 12 steps",
            ));
        }
        if self.saturation > 100 {
            return Err(invalid("palette.saturation", "must be between 0 and 100"));
        }
        if self.lightness > 100 {
            return Err(invalid("palette.lightness", "must be between 0 and 100"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
