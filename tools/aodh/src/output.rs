//! Output formatting
//!
//! Lists are reduced to a fixed set of columns with [`list2cols`]; single
//! objects are shown as field/value pairs.

use anyhow::Result;
use clap::ValueEnum;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Output format selected with `-f/--format`
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// Selected columns of a list of JSON rows
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Pick `cols` out of every row; a missing field becomes an empty string
pub fn list2cols(cols: &[&str], rows: &[Value]) -> Columns {
    Columns {
        headers: cols.iter().map(|c| c.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| {
                cols.iter()
                    .map(|col| {
                        row.get(*col)
                            .cloned()
                            .unwrap_or_else(|| Value::String(String::new()))
                    })
                    .collect()
            })
            .collect(),
    }
}

/// Cell text: strings unquoted, null empty, everything else as JSON
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a column selection in the requested format
pub fn render_list(columns: &Columns, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(columns.headers.iter().cloned());
            for row in &columns.rows {
                builder.push_record(row.iter().map(cell));
            }
            let mut table = builder.build();
            table.with(Style::modern());
            Ok(table.to_string())
        },
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&as_objects(columns))?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&as_objects(columns))?),
    }
}

/// Render one object as a two-column field/value table
pub fn render_object(object: &Map<String, Value>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["Field".to_string(), "Value".to_string()]);
            let mut fields: Vec<_> = object.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));
            for (field, value) in fields {
                builder.push_record([field.clone(), cell(value)]);
            }
            let mut table = builder.build();
            table.with(Style::modern());
            Ok(table.to_string())
        },
        OutputFormat::Json => Ok(serde_json::to_string_pretty(object)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(object)?),
    }
}

fn as_objects(columns: &Columns) -> Vec<Map<String, Value>> {
    columns
        .rows
        .iter()
        .map(|row| {
            columns
                .headers
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect()
        })
        .collect()
}
