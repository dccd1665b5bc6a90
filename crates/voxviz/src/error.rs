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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxvizError {
    #[error("Formatting error: {0}")]
    Format(#[from] FormatError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}

/// The formatter's only failure. Everything else degrades to a fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("No data to format")]
    EmptyInput,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML configuration: {source}")]
    YamlParseError {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Invalid configuration: {field} {reason}")]
    InvalidField { field: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Query text must be between {min} and {max} characters, got {actual}")]
    QueryLength {
        min: usize,
        max: usize,
        actual: usize,
    },
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to parse JSON rows: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse CSV rows: {0}")]
    Csv(#[from] csv::Error),
    #[error("Row {index} is not a flat object of scalar values")]
    NotARow { index: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VoxvizError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type IngestResult<T> = std::result::Result<T, IngestError>;

impl VoxvizError {
    pub fn category(&self) -> &'static str {
        match self {
            VoxvizError::Format(_) => "Format",
            VoxvizError::Config(_) => "Configuration",
            VoxvizError::Validation(_) => "Validation",
            VoxvizError::Ingest(_) => "Ingest",
            VoxvizError::Serialisation(_) => "Serialisation",
        }
    }

    /// Short label suitable for an `error` field in a response body.
    pub fn label(&self) -> &'static str {
        match self {
            VoxvizError::Format(FormatError::EmptyInput) => "No data found",
            VoxvizError::Validation(_) => "Validation error",
            VoxvizError::Config(_) | VoxvizError::Ingest(_) | VoxvizError::Serialisation(_) => {
                "Internal server error"
            }
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            VoxvizError::Format(FormatError::EmptyInput) => {
                "The query returned no results".to_string()
            }
            VoxvizError::Validation(ValidationError::QueryLength { min, max, .. }) => {
                format!("Please ask a question between {min} and {max} characters long.")
            }
            VoxvizError::Config(ConfigError::ConfigFileError { .. }) => {
                "Unable to load formatter configuration. Please check the configuration file."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }
}
