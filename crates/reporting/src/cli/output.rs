//! Output formatting utilities

use anyhow::{Context, Result};
use colored::Colorize;
use reporting_diagnostics::Diagnostic;
use serde_json::Value;
use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    JsonPretty,
    Table,
}

impl OutputFormat {
    /// Parse a `--format` value; anything unrecognised is pretty JSON
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "table" => Self::Table,
            _ => Self::JsonPretty,
        }
    }
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stdout().is_terminal()),
    }
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    let mut out = format!("{} {}", "Error:".red().bold(), error);
    for cause in error.chain().skip(1) {
        out.push_str(&format!("\n  {} {}", "caused by:".dimmed(), cause));
    }
    out
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    diagnostic.render_colored()
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        fs::write(path, content)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        log::info!("output written to {}", path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Format JSON value for output
pub fn format_json(value: &Value, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

/// Format value as table (if possible)
///
/// Arrays of objects become one row per object with the first object's keys
/// as columns; objects become key/value rows.
pub fn format_as_table(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let Some(Value::Object(first)) = items.first() else {
                return Some("(empty list)".to_string());
            };
            let keys: Vec<&String> = first.keys().collect();

            let mut builder = Builder::default();
            builder.push_record(keys.iter().map(|k| k.to_string()));
            for item in items {
                let row = keys
                    .iter()
                    .map(|k| item.get(k.as_str()).map(format_value).unwrap_or_default());
                builder.push_record(row);
            }
            Some(builder.build().with(Style::modern()).to_string())
        }
        Value::Object(obj) => {
            let mut builder = Builder::default();
            builder.push_record(["Key".to_string(), "Value".to_string()]);
            for (k, v) in obj {
                builder.push_record([k.clone(), format_value(v)]);
            }
            Some(builder.build().with(Style::modern()).to_string())
        }
        _ => None,
    }
}

/// Format a simple value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

/// Print output in the specified format
pub fn print_output(value: &Value, format: OutputFormat, output_file: Option<&Path>) -> Result<()> {
    let content = match format {
        OutputFormat::Json => format_json(value, false)?,
        OutputFormat::JsonPretty => format_json(value, true)?,
        OutputFormat::Table => match format_as_table(value) {
            Some(table) => table,
            None => format_json(value, true)?,
        },
    };

    write_output(&content, output_file)
}
