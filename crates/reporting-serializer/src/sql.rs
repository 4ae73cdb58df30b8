//! Named-parameter discovery in SQL text
//!
//! SQL-backed definitions declare one parameter per distinct `:name`
//! placeholder in their query. PostgreSQL-style `::type` casts and text
//! inside single-quoted literals are not placeholders.

use once_cell::sync::Lazy;
use regex::Regex;
use reporting_types::{Parameter, ParameterType};

static PLACEHOLDER: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"(::?)([A-Za-z_][A-Za-z0-9_]*)"));

/// Placeholder names in order of first appearance, each once
pub fn placeholder_names(query: &str) -> Vec<String> {
    let regex = match PLACEHOLDER.as_ref() {
        Ok(regex) => regex,
        Err(e) => {
            log::warn!("placeholder pattern failed to compile: {}", e);
            return Vec::new();
        }
    };

    let code = mask_literals(query);
    let mut names: Vec<String> = Vec::new();
    for captures in regex.captures_iter(&code) {
        if &captures[1] == "::" {
            continue;
        }
        let name = &captures[2];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// The query with the contents of single-quoted literals blanked out
///
/// A doubled quote inside a literal closes and reopens it, so escaped
/// quotes need no special case.
fn mask_literals(query: &str) -> String {
    let mut in_literal = false;
    query
        .chars()
        .map(|c| match c {
            '\'' => {
                in_literal = !in_literal;
                c
            }
            _ if in_literal => ' ',
            _ => c,
        })
        .collect()
}

/// Declared parameters for a query, typed by naming convention
pub fn query_parameters(query: &str) -> Vec<Parameter> {
    placeholder_names(query)
        .into_iter()
        .map(|name| {
            let parameter_type = ParameterType::infer_from_name(&name);
            Parameter::new(name, parameter_type)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("select patient_id from patient where patient_id = :patientId", &["patientId"])]
    #[case("select 1 where a = :x and b = :y and c = :x", &["x", "y"])]
    #[case("select encounter_datetime::date from encounter where voided = :voided", &["voided"])]
    #[case("select 1", &[])]
    #[case("select '12:30' as t", &[])]
    #[case("select * from visit where t = '10:am' and id = :patientId", &["patientId"])]
    #[case("select 'it''s :late' as note, :when as w", &["when"])]
    fn test_placeholder_names(#[case] query: &str, #[case] expected: &[&str]) {
        assert_eq!(placeholder_names(query), expected);
    }

    #[test]
    fn test_query_parameters_infer_types() {
        let params = query_parameters(
            "select p.patient_id from patient p where p.date_created >= :startDate \
             and p.creator = :creatorId and p.gender = :gender",
        );
        let types: Vec<_> = params
            .iter()
            .map(|p| (p.name.as_str(), p.parameter_type))
            .collect();
        assert_eq!(
            types,
            vec![
                ("startDate", ParameterType::Date),
                ("creatorId", ParameterType::Integer),
                ("gender", ParameterType::String),
            ]
        );
    }
}
