//! In-memory encounter store tests

use chrono::{NaiveDate, NaiveDateTime};
use reporting_model::{
    DataSourceError, EncounterDataSource, EncounterRequest, InMemoryEncounterStore,
    NoOpDataSource,
};
use reporting_types::{Cohort, DateRange, Encounter, EncounterId, PatientId};
use std::io::Write;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

#[test]
fn test_save_assigns_sequential_ids() {
    let store = InMemoryEncounterStore::new();
    let first = store.save_encounter(PatientId(7), at(2024, 1, 1, 9));
    let second = store.save_encounter(PatientId(7), at(2024, 1, 2, 9));

    assert_eq!(first, EncounterId(1));
    assert_eq!(second, EncounterId(2));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_save_continues_after_explicit_ids() {
    let store = InMemoryEncounterStore::with_encounters([Encounter::new(
        EncounterId(40),
        PatientId(1),
        at(2024, 1, 1, 9),
    )]);
    assert_eq!(store.save_encounter(PatientId(1), at(2024, 1, 2, 9)), EncounterId(41));
}

#[test]
fn test_insert_replaces_same_id() {
    let store = InMemoryEncounterStore::new();
    store.insert(Encounter::new(EncounterId(1), PatientId(1), at(2024, 1, 1, 9)));
    store.insert(Encounter::new(EncounterId(1), PatientId(2), at(2024, 1, 1, 9)));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_retrieve_filters_by_cohort_and_range() {
    let store = InMemoryEncounterStore::new();
    store.save_encounter(PatientId(7), at(2024, 1, 1, 9));
    let wanted = store.save_encounter(PatientId(7), at(2024, 2, 1, 9));
    store.save_encounter(PatientId(8), at(2024, 2, 1, 9));

    let request = EncounterRequest::new(Cohort::of([7])).with_date_range(DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 15),
        None,
    ));
    let found = store.encounters(&request).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, wanted);
}

#[tokio::test]
async fn test_load_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"id": 1, "patientId": 7, "encounterDatetime": "2024-03-01T10:00:00"}},
            {{"id": 2, "patientId": 8, "encounterDatetime": "2024-03-02T10:00:00"}}
        ]"#
    )
    .unwrap();

    let store = InMemoryEncounterStore::from_reader(std::fs::File::open(file.path()).unwrap())
        .unwrap();
    assert_eq!(store.len(), 2);

    let all = store
        .encounters(&EncounterRequest::new(Cohort::of([7, 8])))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn test_invalid_json_is_invalid_data() {
    let err = InMemoryEncounterStore::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, DataSourceError::InvalidData(_)));
}

#[tokio::test]
async fn test_noop_source_is_empty() {
    let found = NoOpDataSource::new()
        .encounters(&EncounterRequest::new(Cohort::of([1])))
        .await
        .unwrap();
    assert!(found.is_empty());
    assert_eq!(NoOpDataSource.source_name(), "no-op");
}
