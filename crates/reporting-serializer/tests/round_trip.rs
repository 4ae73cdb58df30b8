//! Serialize / deserialize round trips for every definition family in both wire formats

mod common;

use common::*;
use pretty_assertions::assert_eq;
use reporting_serializer::{
    CohortDefinition, DataSetDefinition, Definition, DefinitionKind, Dimension, Indicator,
    ReportDefinition, ReportingSerializer, SerializerConfig, WireFormat,
};
use rstest::rstest;
use std::sync::Arc;

fn serializer(format: WireFormat, pretty: bool) -> ReportingSerializer {
    ReportingSerializer::with_config(SerializerConfig { format, pretty })
}

#[rstest]
#[case::json(WireFormat::Json, false)]
#[case::json_pretty(WireFormat::Json, true)]
#[case::xml(WireFormat::Xml, false)]
#[case::xml_pretty(WireFormat::Xml, true)]
fn test_report_round_trip(#[case] format: WireFormat, #[case] pretty: bool) {
    let serializer = serializer(format, pretty);
    let report = monthly_report();

    let text = serializer.serialize(report.clone()).unwrap();
    assert_eq!(WireFormat::detect(&text), Some(format));

    let decoded = serializer.deserialize::<ReportDefinition>(&text).unwrap();
    assert_eq!(*decoded, *report);
}

#[rstest]
#[case::json(WireFormat::Json)]
#[case::xml(WireFormat::Xml)]
fn test_every_family_round_trips(#[case] format: WireFormat) {
    let serializer = serializer(format, false);

    let cohort = static_cohort();
    let text = serializer.serialize(cohort.clone()).unwrap();
    assert_eq!(serializer.deserialize::<CohortDefinition>(&text).unwrap(), cohort);

    let indicator = visit_indicator(visits_in_period());
    let text = serializer.serialize(indicator.clone()).unwrap();
    assert_eq!(serializer.deserialize::<Indicator>(&text).unwrap(), indicator);

    let dimension = gender_dimension(males(), females());
    let text = serializer.serialize(dimension.clone()).unwrap();
    assert_eq!(serializer.deserialize::<Dimension>(&text).unwrap(), dimension);

    for data_set in [indicator_data_set(), line_list()] {
        let text = serializer.serialize(data_set.clone()).unwrap();
        assert_eq!(serializer.deserialize::<DataSetDefinition>(&text).unwrap(), data_set);
    }
}

#[test]
fn test_deserialize_definition_reports_family() {
    let serializer = ReportingSerializer::new();
    let text = serializer.serialize(line_list()).unwrap();

    let definition = serializer.deserialize_definition(&text).unwrap();
    assert_eq!(definition.kind(), DefinitionKind::DataSet);
    assert_eq!(definition.name(), "Line list");
    assert_eq!(definition.type_tag(), "SqlDataSetDefinition");
}

#[test]
fn test_sql_parameters_survive_round_trip() {
    let serializer = ReportingSerializer::new();
    let cohort = visits_in_period();

    let decoded = serializer
        .deserialize::<CohortDefinition>(&serializer.serialize(cohort.clone()).unwrap())
        .unwrap();

    let names: Vec<_> = decoded
        .header()
        .parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["startDate", "endDate"]);
    let CohortDefinition::Sql(sql) = decoded.as_ref() else {
        panic!("expected a SQL cohort definition, got {:?}", decoded);
    };
    assert!(sql.query.contains(":startDate"));
}

#[test]
fn test_definition_without_uuid_round_trips() {
    let serializer = ReportingSerializer::new();
    let mut cohort = (*males()).clone();
    cohort.header_mut().uuid = uuid::Uuid::nil();
    let cohort = Arc::new(cohort);

    let text = serializer.serialize(cohort.clone()).unwrap();
    assert!(!text.contains("\"uuid\""));
    assert_eq!(serializer.deserialize::<CohortDefinition>(&text).unwrap(), cohort);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let serializer = ReportingSerializer::new();
    let text = r#"{
        "type": "SqlDataSetDefinition",
        "uuid": "6f0c2a57-4f4e-4a7e-9b8e-2f1f3f6f7a10",
        "name": "Line list",
        "sqlQuery": "select 1",
        "retired": false,
        "auditInfo": { "creator": "admin" }
    }"#;

    let definition = serializer.deserialize_definition(text).unwrap();
    let Definition::DataSet(data_set) = definition else {
        panic!("expected a dataset definition");
    };
    assert_eq!(data_set.header().name, "Line list");
}
