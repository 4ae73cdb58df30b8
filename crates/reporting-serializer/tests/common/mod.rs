//! Shared definition fixtures

#![allow(dead_code)]

use reporting_serializer::{
    AllPatientsCohortDefinition, CohortDefinition, CohortDefinitionDimension, CohortIndicator,
    CohortIndicatorColumn, CohortIndicatorDataSetDefinition, CompositionCohortDefinition,
    DataSetDefinition, Dimension, Indicator, Mapped, ReportDefinition, SqlCohortDefinition,
    SqlDataSetDefinition, StaticCohortDefinition,
};
use reporting_types::{Cohort, Parameter, ParameterType, ParameterValue};
use std::sync::Arc;

pub fn sql_cohort(name: &str, query: &str) -> Arc<CohortDefinition> {
    Arc::new(SqlCohortDefinition::new(name, query).into())
}

pub fn males() -> Arc<CohortDefinition> {
    sql_cohort("Males", "select person_id from person where gender = 'M'")
}

pub fn females() -> Arc<CohortDefinition> {
    sql_cohort("Females", "select person_id from person where gender = 'F'")
}

pub fn visits_in_period() -> Arc<CohortDefinition> {
    sql_cohort(
        "Visits in period",
        "select patient_id from encounter \
         where encounter_datetime between :startDate and :endDate",
    )
}

pub fn static_cohort() -> Arc<CohortDefinition> {
    let pilot = Cohort::of([7, 11, 12]).named("pilot");
    Arc::new(StaticCohortDefinition::new("Pilot patients", pilot).into())
}

pub fn gender_dimension(
    males: Arc<CohortDefinition>,
    females: Arc<CohortDefinition>,
) -> Arc<Dimension> {
    Arc::new(
        CohortDefinitionDimension::new("Gender")
            .with_option("male", Mapped::new(males))
            .with_option("female", Mapped::new(females))
            .into(),
    )
}

pub fn visit_indicator(cohort: Arc<CohortDefinition>) -> Arc<Indicator> {
    let mut indicator = CohortIndicator::count(
        "Patients with visits",
        Mapped::new(cohort).straight_through(["startDate", "endDate"]),
    );
    indicator.header.description = Some("Patients seen at least once in the period".into());
    indicator
        .header
        .add_parameter(Parameter::new("startDate", ParameterType::Date));
    indicator
        .header
        .add_parameter(Parameter::new("endDate", ParameterType::Date));
    Arc::new(indicator.into())
}

/// An indicator dataset whose two columns share one indicator
pub fn indicator_data_set() -> Arc<DataSetDefinition> {
    let indicator = visit_indicator(visits_in_period());
    let mapped = Mapped::new(indicator).straight_through(["startDate", "endDate"]);
    Arc::new(
        CohortIndicatorDataSetDefinition::new("Visits by gender")
            .with_dimension("gender", Mapped::new(gender_dimension(males(), females())))
            .with_column(
                CohortIndicatorColumn::new("1.m", "Male patients with visits", mapped.clone())
                    .with_dimension_option("gender", "male"),
            )
            .with_column(
                CohortIndicatorColumn::new("1.f", "Female patients with visits", mapped)
                    .with_dimension_option("gender", "female"),
            )
            .into(),
    )
}

pub fn line_list() -> Arc<DataSetDefinition> {
    Arc::new(
        SqlDataSetDefinition::new(
            "Line list",
            "select p.patient_id, p.gender\nfrom patient p\nwhere p.date_created >= :startDate",
        )
        .into(),
    )
}

/// A report exercising every family, with one cohort shared between
/// the base cohort and a composition search
pub fn monthly_report() -> Arc<ReportDefinition> {
    let pilot = static_cohort();
    let base: Arc<CohortDefinition> = Arc::new(
        CompositionCohortDefinition::new("Pilot or everyone", "(1 OR 2) AND NOT 3")
            .with_search("1", Mapped::new(pilot.clone()))
            .with_search(
                "2",
                Mapped::new(Arc::new(AllPatientsCohortDefinition::new("All patients").into())),
            )
            .with_search("3", Mapped::new(pilot))
            .into(),
    );

    let mut report = ReportDefinition::new("Monthly visits")
        .with_base_cohort_definition(Mapped::new(base))
        .with_data_set_definition(
            "indicators",
            Mapped::new(indicator_data_set()).straight_through(["startDate", "endDate"]),
        )
        .with_data_set_definition(
            "patients",
            Mapped::new(line_list()).with_mapping("startDate", "${startDate-1m}"),
        );
    report.header.add_parameter(
        Parameter::new("startDate", ParameterType::Date)
            .with_label("Start date")
            .with_default(ParameterValue::Date(
                chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )),
    );
    report
        .header
        .add_parameter(Parameter::new("endDate", ParameterType::Date));
    Arc::new(report)
}
