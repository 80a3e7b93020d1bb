//! End-to-end runs of the scheduler against files on disk.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use haarvi_cli::commands::{load_config, run_schedule};
use haarvi_cli::types::RunOptions;

const EXPORT_NAME: &str = "HAARVIStudyRecords-TimelineCheck_DATA_2024-04-10_0900.csv";

fn write_export(dir: &Path, name: &str) {
    let mut header = vec![
        "global_study_id",
        "conv_partid",
        "ctrl_partid",
        "participant_email",
        "dob",
    ]
    .join(",");
    for flag in 1..=8 {
        header.push_str(&format!(",participant_status___{flag}"));
    }
    header.push_str(",date_dose_1,test_date_flu_1");
    fs::write(
        dir.join(name),
        format!(
            "{header}\n\
             G-1,1a,,a@example.org,1979-04-10,1,0,0,0,0,0,0,0,2024-01-05,\n\
             G-2,,12b,\"b, jr@example.org\",1990-07-04,1,0,0,0,0,0,0,0,,03/15/2024\n\
             G-3,3c,,c@example.org,1985-05-05,1,0,0,0,0,0,1,0,2024-01-05,\n"
        ),
    )
    .expect("write export");
}

fn write_log(dir: &Path) {
    fs::write(
        dir.join("all_haarvi_bd_apts.csv"),
        "Patient_Study_ID,Date_Collected\n12B,2024-03-30\n1a,2023-11-02\n",
    )
    .expect("write log");
}

/// The log goes in first so the export is the newest CSV in the folder.
fn write_inputs(dir: &Path, export_name: &str) {
    write_log(dir);
    thread::sleep(Duration::from_millis(20));
    write_export(dir, export_name);
}

fn options(dir: &Path) -> RunOptions {
    RunOptions {
        export_dir: dir.to_path_buf(),
        as_of: NaiveDate::from_ymd_opt(2024, 4, 10),
        ..RunOptions::default()
    }
}

#[test]
fn writes_monthly_schedule() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_inputs(dir.path(), EXPORT_NAME);

    let result = run_schedule(&options(dir.path())).expect("run schedule");

    assert!(result.written);
    assert_eq!(result.export_path, dir.path().join(EXPORT_NAME));
    assert_eq!(result.schedule_path, dir.path().join("haarvi_apts_4_2024.csv"));
    let contents = fs::read_to_string(&result.schedule_path).expect("read schedule");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            "global_study_id,ptid,participant_email,age,Date_Collected,eligible_apts",
            "G-1,00001A,a@example.org,45,2023-11-02,cov_vax_3m",
            "G-2,00012B,\"b, jr@example.org\",33,2024-03-30,flu_inf_30d",
        ]
    );
    assert_eq!(result.output.report.input_rows(), 3);
    assert_eq!(result.output.report.output_rows(), 2);
}

#[test]
fn dry_run_leaves_no_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_inputs(dir.path(), EXPORT_NAME);
    let out = dir.path().join("out");

    let result = run_schedule(&RunOptions {
        output_dir: Some(out.clone()),
        dry_run: true,
        ..options(dir.path())
    })
    .expect("run schedule");

    assert!(!result.written);
    assert_eq!(result.schedule_path, out.join("haarvi_apts_4_2024.csv"));
    assert!(!out.exists());
    assert_eq!(result.output.rows.len(), 2);
}

#[test]
fn refuses_unexpected_latest_export() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_inputs(dir.path(), "SomeOtherProject_DATA_2024-04-10.csv");

    let error = run_schedule(&options(dir.path())).expect_err("wrong export name");
    assert!(format!("{error:#}").contains("HAARVIStudyRecords-TimelineCheck_DATA"));
    assert!(!dir.path().join("haarvi_apts_4_2024.csv").exists());
}

#[test]
fn missing_appointment_log_is_an_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_export(dir.path(), EXPORT_NAME);

    assert!(run_schedule(&options(dir.path())).is_err());
}

#[test]
fn config_file_overrides_output_prefix() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_inputs(dir.path(), EXPORT_NAME);
    let config_path = dir.path().join("schedule.json");
    fs::write(&config_path, r#"{"output_file_prefix": "draws"}"#).expect("write config");

    let config = load_config(Some(&config_path)).expect("load config");
    assert_eq!(config.output_file_prefix, "draws");

    let result = run_schedule(&RunOptions {
        config: Some(config_path),
        ..options(dir.path())
    })
    .expect("run schedule");
    assert_eq!(result.schedule_path, dir.path().join("draws_4_2024.csv"));
    assert!(result.schedule_path.exists());
}

#[test]
fn same_month_rerun_skips_previous_schedule_and_log() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_export(dir.path(), EXPORT_NAME);
    thread::sleep(Duration::from_millis(20));
    write_log(dir.path());

    let first = run_schedule(&options(dir.path())).expect("first run");
    thread::sleep(Duration::from_millis(20));
    let second = run_schedule(&options(dir.path())).expect("second run");

    assert_eq!(second.export_path, dir.path().join(EXPORT_NAME));
    assert_eq!(first.output.rows, second.output.rows);
}

#[test]
fn draw_later_on_the_as_of_day_counts_as_recent() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(
        dir.path().join("all_haarvi_bd_apts.csv"),
        "Patient_Study_ID,Date_Collected\n1a,03/20/24\n1a,04/10/24 9:15 AM\n",
    )
    .expect("write log");
    thread::sleep(Duration::from_millis(20));
    write_export(dir.path(), EXPORT_NAME);

    let result = run_schedule(&RunOptions {
        dry_run: true,
        ..options(dir.path())
    })
    .expect("run schedule");

    let ptids: Vec<&str> = result.output.rows.iter().map(|row| row.ptid.as_str()).collect();
    assert_eq!(ptids, vec!["00012B"]);
}
