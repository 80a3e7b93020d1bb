//! Tests for loading scheduler configuration from disk.

use std::fs;

use haarvi_model::{EventCategory, ModelError, Offset, ScheduleConfig, StatusFlag};

#[test]
fn loads_overrides_from_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("schedule.json");
    fs::write(
        &path,
        r#"{
            "appointment_log": {"id_column": "ptid"},
            "max_recent_appointments": 3,
            "output_file_prefix": "followups"
        }"#,
    )
    .expect("write config");

    let config = ScheduleConfig::from_json_file(&path).expect("load config");
    assert_eq!(config.appointment_log.id_column, "ptid");
    assert_eq!(config.appointment_log.date_column, "Date_Collected");
    assert_eq!(config.max_recent_appointments, 3);
    assert_eq!(config.output_file_prefix, "followups");
    assert_eq!(config.recent_window_weeks, 8);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("absent.json");
    let error = ScheduleConfig::from_json_file(&path).expect_err("missing file");
    match error {
        ModelError::ConfigRead { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn default_config_round_trips_through_json() {
    let config = ScheduleConfig::default();
    let json = serde_json::to_string_pretty(&config).expect("serialize");
    let parsed = ScheduleConfig::from_json_str(&json).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn category_order_and_offsets_follow_default_layout() {
    let config = ScheduleConfig::default();
    let order: Vec<EventCategory> = config.categories.iter().map(|c| c.category).collect();
    assert_eq!(
        order,
        vec![
            EventCategory::CovVaccine,
            EventCategory::CovInfection,
            EventCategory::FluVaccine,
            EventCategory::FluInfection,
            EventCategory::RsvVaccine,
            EventCategory::RsvInfection,
        ]
    );
    let rsv = &config.categories[5];
    assert_eq!(rsv.offsets, Offset::ALL.to_vec());
    let status = config.status_columns();
    assert_eq!(status.len(), 8);
    assert_eq!(
        status[0],
        (StatusFlag::ActivelyParticipating, "participant_status___1".to_string())
    );
}

#[test]
fn unbounded_window_in_file_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("schedule.json");
    fs::write(&path, r#"{"recent_window_weeks": 4294967295}"#).expect("write config");

    match ScheduleConfig::from_json_file(&path) {
        Err(ModelError::InvalidConfig(message)) => {
            assert!(message.contains("recent_window_weeks"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
