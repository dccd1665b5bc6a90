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

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voxviz::ingest::{rows_from_csv_file, rows_from_json_file};
use voxviz::{
    answer, error_body, validate_query_text, FormatterConfig, Row, VisualizationFormatter,
    VoxvizError,
};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum RowFormat {
    Json,
    Csv,
}

/// Turn a query result into a chart description.
#[derive(Parser, Debug)]
#[command(name = "voxviz", version)]
struct Args {
    /// The natural-language question that produced the rows.
    #[arg(long, short)]
    query: String,

    /// File holding the result rows.
    #[arg(long, short)]
    rows: PathBuf,

    /// Row file format. Inferred from the extension when omitted.
    #[arg(long, value_enum)]
    format: Option<RowFormat>,

    /// Formatter configuration. Falls back to $VOXVIZ_CONFIG_PATH, then defaults.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// SQL text to echo in the response envelope.
    #[arg(long)]
    sql: Option<String>,

    /// Print the full response envelope instead of the visualization only.
    #[arg(long)]
    envelope: bool,

    #[arg(long)]
    pretty: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        match e.downcast_ref::<VoxvizError>() {
            Some(err) => {
                warn!(category = err.category(), "Query could not be visualised");
                match serde_json::to_string(&error_body(err)) {
                    Ok(body) => println!("{body}"),
                    Err(_) => eprintln!("{err}"),
                }
            }
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let formatter = VisualizationFormatter::with_config(config);
    let rows = load_rows(&args.rows, args.format)?;
    info!(rows = rows.len(), path = %args.rows.display(), "Loaded result rows");

    let output = if args.envelope {
        let response = answer(&formatter, &args.query, rows, args.sql.as_deref())?;
        to_json(&response, args.pretty)?
    } else {
        let query = validate_query_text(&args.query).map_err(VoxvizError::from)?;
        let result = formatter
            .format(&rows, query)
            .map_err(VoxvizError::from)?;
        info!(chart_type = %result.chart_type, title = %result.title, "Formatted visualization");
        to_json(&result, args.pretty)?
    };
    println!("{output}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<FormatterConfig> {
    match path {
        Some(path) => FormatterConfig::from_yaml_file(path)
            .map_err(VoxvizError::from)
            .with_context(|| format!("Failed to load formatter config '{}'", path.display())),
        None => Ok(FormatterConfig::load_or_default()),
    }
}

fn load_rows(path: &Path, format: Option<RowFormat>) -> Result<Vec<Row>> {
    let format = format.unwrap_or_else(|| infer_format(path));
    let rows = match format {
        RowFormat::Json => rows_from_json_file(path),
        RowFormat::Csv => rows_from_csv_file(path),
    };
    rows.map_err(VoxvizError::from)
        .with_context(|| format!("Failed to read rows from '{}'", path.display()))
}

fn infer_format(path: &Path) -> RowFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => RowFormat::Csv,
        _ => RowFormat::Json,
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    Ok(json.map_err(VoxvizError::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use voxviz::FormatError;

    fn args_for(rows: &Path, envelope: bool) -> Args {
        Args {
            query: "sales by region".to_string(),
            rows: rows.to_path_buf(),
            format: None,
            config: None,
            sql: None,
            envelope,
            pretty: false,
        }
    }

    #[test]
    fn test_infer_format_from_extension() {
        assert_eq!(infer_format(Path::new("rows.CSV")), RowFormat::Csv);
        assert_eq!(infer_format(Path::new("rows.json")), RowFormat::Json);
        assert_eq!(infer_format(Path::new("rows")), RowFormat::Json);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "voxviz", "--query", "sales by region", "--rows", "out.csv", "--envelope",
        ])
        .unwrap();
        assert_eq!(args.query, "sales by region");
        assert!(args.envelope);
        assert!(args.format.is_none());
    }

    #[test]
    fn test_empty_rows_surface_as_format_error() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, "[]").unwrap();
        for envelope in [false, true] {
            let err = run(args_for(file.path(), envelope)).unwrap_err();
            let err = err.downcast_ref::<VoxvizError>().unwrap();
            assert!(matches!(err, VoxvizError::Format(FormatError::EmptyInput)));
            assert_eq!(error_body(err).error, "No data found");
        }
    }

    #[test]
    fn test_run_formats_csv_rows() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        write!(file, "region,sales\nNorth,120\nSouth,80\n").unwrap();
        assert!(run(args_for(file.path(), false)).is_ok());
    }
}
