//! Definition store: save, load, persisted references and purge

mod common;

use common::*;
use pretty_assertions::assert_eq;
use reporting_serializer::{
    AllPatientsCohortDefinition, CohortDefinition, CompositionCohortDefinition, DataSetDefinition,
    DefinitionKind, DefinitionStore, Mapped, ReportDefinition, SerializationError,
    SqlCohortDefinition,
};
use reporting_types::ParameterType;
use std::sync::Arc;
use uuid::Uuid;

#[test]
fn test_save_and_load_sql_cohort() {
    let store = DefinitionStore::new();
    let definition: Arc<CohortDefinition> = Arc::new(
        SqlCohortDefinition::new(
            "Patient by id",
            "select patient_id from patient where patient_id = :patientId",
        )
        .into(),
    );

    let saved = store.save_definition(definition.clone()).unwrap();
    let loaded = store
        .get_definition_by_uuid::<CohortDefinition>(saved.header().uuid)
        .unwrap()
        .unwrap();

    assert_eq!(loaded, definition);
    let CohortDefinition::Sql(sql) = loaded.as_ref() else {
        panic!("expected a SQL cohort definition, got {:?}", loaded);
    };
    assert_eq!(sql.header.name, "Patient by id");
    assert_eq!(
        sql.query,
        "select patient_id from patient where patient_id = :patientId"
    );
    let parameter = sql.header.parameter("patientId").unwrap();
    assert_eq!(parameter.parameter_type, ParameterType::Integer);
}

#[test]
fn test_save_assigns_uuid_when_missing() {
    let store = DefinitionStore::new();
    let mut cohort = (*males()).clone();
    cohort.header_mut().uuid = Uuid::nil();

    let saved = store.save_definition(Arc::new(cohort)).unwrap();

    let uuid = saved.header().uuid;
    assert!(!uuid.is_nil());
    assert_eq!(store.len(), 1);
    assert_eq!(
        store.get_definition_by_uuid::<CohortDefinition>(uuid).unwrap(),
        Some(saved)
    );
}

#[test]
fn test_unknown_uuid() {
    let store = DefinitionStore::new();
    let uuid = Uuid::new_v4();

    assert_eq!(
        store.get_definition_by_uuid::<CohortDefinition>(uuid).unwrap(),
        None
    );
    assert_eq!(
        store.get_definition(uuid).unwrap_err(),
        SerializationError::NotFound { uuid }
    );
}

#[test]
fn test_load_with_wrong_family() {
    let store = DefinitionStore::new();
    let saved = store.save_definition(line_list()).unwrap();

    let err = store
        .get_definition_by_uuid::<CohortDefinition>(saved.header().uuid)
        .unwrap_err();
    assert_eq!(
        err,
        SerializationError::unexpected_family(DefinitionKind::Cohort, DefinitionKind::DataSet, "$")
    );
}

#[test]
fn test_saved_sub_definitions_are_written_as_persisted() {
    let store = DefinitionStore::new();
    let data_set = store.save_definition(indicator_data_set()).unwrap();
    let report = monthly_report();
    store.save_definition(report.clone()).unwrap();

    let text = store.serializer().serialize_with(report.clone(), &store).unwrap();
    assert!(text.contains(&format!("\"persisted\":\"{}\"", data_set.header().uuid)));
    assert!(!text.contains("Visits by gender"));

    let loaded = store
        .get_definition_by_uuid::<ReportDefinition>(report.header.uuid)
        .unwrap()
        .unwrap();
    assert_eq!(loaded, report);
}

#[test]
fn test_persisted_definition_resolves_once_per_load() {
    let store = DefinitionStore::new();
    let pilot = store.save_definition(static_cohort()).unwrap();
    let report = Arc::new(
        ReportDefinition::new("Pilot report").with_base_cohort_definition(Mapped::new(
            Arc::new(
                CompositionCohortDefinition::new("Pilot twice", "1 AND 2")
                    .with_search("1", Mapped::new(pilot.clone()))
                    .with_search("2", Mapped::new(pilot))
                    .into(),
            ),
        )),
    );
    let report = store.save_definition(report).unwrap();

    let loaded = store
        .get_definition_by_uuid::<ReportDefinition>(report.header.uuid)
        .unwrap()
        .unwrap();
    let base = &loaded.base_cohort_definition.as_ref().unwrap().definition;
    let CohortDefinition::Composition(composition) = base.as_ref() else {
        panic!("expected a composition, got {:?}", base);
    };
    assert!(Arc::ptr_eq(
        composition.search("1").unwrap(),
        composition.search("2").unwrap()
    ));
}

#[test]
fn test_purged_dependency_no_longer_resolves() {
    let store = DefinitionStore::new();
    let cohort = store.save_definition(visits_in_period()).unwrap();
    let indicator = store
        .save_definition(visit_indicator(cohort.clone()))
        .unwrap();

    assert!(store.purge_definition(cohort.header().uuid));
    assert!(!store.purge_definition(cohort.header().uuid));

    let err = store.get_definition(indicator.header().uuid).unwrap_err();
    assert!(matches!(
        err,
        SerializationError::UnresolvedReference { uuid, ref path }
            if uuid == cohort.header().uuid && path == "$.cohortDefinition.definition"
    ));
}

#[test]
fn test_get_all_definitions_filters_by_family() {
    let store = DefinitionStore::new();
    let males = store.save_definition(males()).unwrap();
    store.save_definition(line_list()).unwrap();
    let females = store.save_definition(females()).unwrap();

    let cohorts = store.get_all_definitions::<CohortDefinition>().unwrap();
    assert_eq!(cohorts, vec![males, females]);

    let data_sets = store.get_all_definitions::<DataSetDefinition>().unwrap();
    assert_eq!(data_sets.len(), 1);

    let kinds: Vec<_> = store.list().into_iter().map(|info| info.kind).collect();
    assert_eq!(
        kinds,
        vec![DefinitionKind::Cohort, DefinitionKind::DataSet, DefinitionKind::Cohort]
    );
}

#[test]
fn test_cycle_through_store_is_detected() {
    let store = DefinitionStore::new();
    let all: Arc<CohortDefinition> = Arc::new(AllPatientsCohortDefinition::new("All").into());
    let first = CompositionCohortDefinition::new("First", "1")
        .with_search("1", Mapped::new(all));
    let first_uuid = first.header.uuid;
    let first: Arc<CohortDefinition> = store.save_definition(Arc::new(first.into())).unwrap();

    let second: Arc<CohortDefinition> = Arc::new(
        CompositionCohortDefinition::new("Second", "1")
            .with_search("1", Mapped::new(first))
            .into(),
    );
    let second = store.save_definition(second).unwrap();

    let mut looped = CompositionCohortDefinition::new("First", "1")
        .with_search("1", Mapped::new(second));
    looped.header.uuid = first_uuid;
    store
        .save_definition(Arc::new(CohortDefinition::from(looped)))
        .unwrap();

    let err = store
        .get_definition_by_uuid::<CohortDefinition>(first_uuid)
        .unwrap_err();
    assert!(
        matches!(err, SerializationError::CircularReference { uuid, .. } if uuid == first_uuid),
        "{:?}",
        err
    );
}
