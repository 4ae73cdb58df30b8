//! Evaluate command implementation

use super::output;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reporting_eval::{
    EncounterQueryResult, EncounterQueryService, EvaluationContext,
    MostRecentEncounterForPatientQuery,
};
use reporting_model::InMemoryEncounterStore;
use reporting_types::{Cohort, Encounter, ParameterValue, PatientId};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for evaluate command
pub struct EvaluateConfig {
    /// JSON array of encounters
    pub encounters: PathBuf,
    /// Base cohort; every patient in the file when empty
    pub patients: Vec<i64>,
    pub on_or_after: Option<NaiveDate>,
    pub on_or_before: Option<NaiveDate>,
    /// Context parameters (name=value)
    pub params: Vec<String>,
    pub verbose: bool,
    pub output_format: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Evaluate a most-recent-encounter query over an encounter file
pub async fn evaluate(config: EvaluateConfig) -> Result<()> {
    let content = fs::read_to_string(&config.encounters).with_context(|| {
        format!("Failed to read encounter file: {}", config.encounters.display())
    })?;
    let encounters: Vec<Encounter> = serde_json::from_str(&content).with_context(|| {
        format!("Failed to parse encounter file: {}", config.encounters.display())
    })?;
    log::debug!(
        "loaded {} encounters from {}",
        encounters.len(),
        config.encounters.display()
    );

    let cohort = if config.patients.is_empty() {
        let mut cohort = Cohort::new();
        for encounter in &encounters {
            cohort.add_member(encounter.patient_id);
        }
        cohort
    } else {
        Cohort::of(config.patients.iter().copied())
    };

    let mut ctx = EvaluationContext::new(cohort);
    for (name, value) in parse_parameters(&config.params)? {
        if config.verbose {
            eprintln!("  {} = {}", name, value);
        }
        ctx.set_parameter(name, value);
    }

    let mut query = MostRecentEncounterForPatientQuery::new().with_date_parameters();
    query.on_or_after = config.on_or_after;
    query.on_or_before = config.on_or_before;

    let source = Arc::new(InMemoryEncounterStore::with_encounters(encounters));
    let service = EncounterQueryService::new(source);
    let result = service
        .evaluate(&query.into(), &ctx)
        .await
        .context("Evaluation failed")?;

    if config.verbose {
        eprintln!(
            "{}",
            output::format_success(&format!(
                "{} of {} patients have a qualifying encounter",
                result.size(),
                ctx.base_cohort.size()
            ))
        );
    }

    let format = output::OutputFormat::parse(config.output_format.as_deref().unwrap_or("pretty"));
    let value = match format {
        output::OutputFormat::Table => rows(&result),
        _ => result_json(&result)?,
    };
    output::print_output(&value, format, config.output_file.as_deref())
}

/// One `{patientId, encounterId}` row per selected encounter
fn rows(result: &EncounterQueryResult) -> Value {
    Value::Array(
        result
            .patient_encounters()
            .iter()
            .map(|(patient, encounter)| json!({ "patientId": patient, "encounterId": encounter }))
            .collect(),
    )
}

fn result_json(result: &EncounterQueryResult) -> Result<Value> {
    serde_json::to_value(result).context("Failed to serialize evaluation result")
}

/// Parse parameter strings (name=value)
///
/// Values are read as an ISO date, an integer, a boolean, `null`, or else a
/// string; a `patients:` prefix reads a comma-separated cohort.
fn parse_parameters(params: &[String]) -> Result<Vec<(String, ParameterValue)>> {
    let mut result = Vec::with_capacity(params.len());

    for param in params {
        let Some((name, raw)) = param.split_once('=') else {
            anyhow::bail!("Invalid parameter format: '{}'. Expected 'name=value'", param);
        };
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("Invalid parameter format: '{}'. Missing name", param);
        }
        result.push((name.to_string(), parse_value(raw.trim())?));
    }

    Ok(result)
}

fn parse_value(raw: &str) -> Result<ParameterValue> {
    if let Some(ids) = raw.strip_prefix("patients:") {
        let mut cohort = Cohort::new();
        for id in ids.split(',').filter(|s| !s.trim().is_empty()) {
            let id: PatientId = id
                .parse()
                .with_context(|| format!("Invalid patient id in '{}'", raw))?;
            cohort.add_member(id);
        }
        return Ok(ParameterValue::Cohort(cohort));
    }

    let value = if let Ok(date) = raw.parse::<NaiveDate>() {
        ParameterValue::Date(date)
    } else if let Ok(int) = raw.parse::<i64>() {
        ParameterValue::Integer(int)
    } else if raw == "true" || raw == "false" {
        ParameterValue::Boolean(raw == "true")
    } else if raw == "null" {
        ParameterValue::Null
    } else {
        ParameterValue::String(raw.to_string())
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-03-01", ParameterValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))]
    #[case("42", ParameterValue::Integer(42))]
    #[case("true", ParameterValue::Boolean(true))]
    #[case("null", ParameterValue::Null)]
    #[case("Outpatient", ParameterValue::String("Outpatient".into()))]
    #[case("patients:7,11", ParameterValue::Cohort(Cohort::of([7, 11])))]
    fn test_parse_value(#[case] raw: &str, #[case] expected: ParameterValue) {
        assert_eq!(parse_value(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_parameters_rejects_missing_value() {
        assert!(parse_parameters(&["onOrAfter".to_string()]).is_err());
        assert!(parse_parameters(&["=2024-01-01".to_string()]).is_err());
    }
}
