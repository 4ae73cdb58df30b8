//! Validate command implementation

use super::output;
use anyhow::{Context, Result};
use colored::Colorize;
use reporting_diagnostics::{Diagnostic, ReportingError};
use reporting_serializer::{Definition, ReportingSerializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for validate command
pub struct ValidateConfig {
    pub files: Vec<PathBuf>,
    pub verbose: bool,
}

/// Validation result for a single file
pub struct ValidationResult {
    pub file: PathBuf,
    pub outcome: std::result::Result<Summary, Diagnostic>,
}

/// What a valid file contained
pub struct Summary {
    pub kind: String,
    pub type_tag: &'static str,
    pub name: String,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Validate definition files
///
/// Every file is checked; the command fails if any of them is invalid.
pub async fn validate(config: ValidateConfig) -> Result<()> {
    if config.files.is_empty() {
        anyhow::bail!("No files specified for validation");
    }

    let serializer = ReportingSerializer::new();
    let mut failed = 0;
    for file in &config.files {
        let result = validate_file(&serializer, file)?;
        print_validation_result(&result, config.verbose);
        if !result.is_valid() {
            failed += 1;
        }
    }

    println!();
    if failed == 0 {
        println!(
            "{}",
            output::format_success(&format!(
                "All {} file(s) validated successfully",
                config.files.len()
            ))
        );
        Ok(())
    } else {
        anyhow::bail!("{} of {} file(s) failed validation", failed, config.files.len())
    }
}

/// Validate a single file
///
/// Unreadable files are an error; unparseable definitions are an invalid result.
pub fn validate_file(serializer: &ReportingSerializer, file: &Path) -> Result<ValidationResult> {
    log::debug!("validating {}", file.display());
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read definition file: {}", file.display()))?;

    let outcome = serializer
        .deserialize_definition(&text)
        .map(|definition| summarize(&definition))
        .map_err(|err| ReportingError::from(err).to_diagnostic());

    Ok(ValidationResult {
        file: file.to_path_buf(),
        outcome,
    })
}

fn summarize(definition: &Definition) -> Summary {
    Summary {
        kind: definition.kind().to_string(),
        type_tag: definition.type_tag(),
        name: definition.name().to_string(),
    }
}

fn print_validation_result(result: &ValidationResult, verbose: bool) {
    match &result.outcome {
        Ok(summary) => {
            print!("{} {}", "✓".green().bold(), result.file.display());
            if verbose {
                print!(" ({} '{}', {})", summary.kind, summary.name, summary.type_tag);
            }
            println!();
        }
        Err(diagnostic) => {
            println!("{} {}", "✗".red().bold(), result.file.display());
            println!("  {}", output::format_diagnostic(diagnostic));
        }
    }
}
