//! End-to-end tests for the database-free `studyplan` commands.

use std::io::Write;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::NamedTempFile;

fn studyplan(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_studyplan"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run studyplan binary")
}

fn json_file(value: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{value}").unwrap();
    file
}

fn context(daily_minutes: u32) -> Value {
    json!({
        "userId": "7f1c2a4e-93b1-4d2f-a8c5-0e6b9d3f1a20",
        "date": "2024-03-18",
        "profile": {
            "subjectsPerDayLimit": 2,
            "studyMode": "FIXO",
            "weekdayRules": [{
                "weekday": 1,
                "dailyMinutes": daily_minutes,
                "theoryEnabled": true,
                "questionsEnabled": true,
                "informativesEnabled": false,
                "leiSecaEnabled": false
            }],
            "extrasDurations": {
                "questionsMinutes": 20,
                "informativesMinutes": 10,
                "leiSecaMinutes": 15
            },
            "autoReviewPolicy": { "enabled": true, "intervalsDays": [1, 7], "reviewMinutes": 30 }
        },
        "subjects": [
            { "id": "s1", "name": "A", "isActive": true },
            { "id": "s2", "name": "B", "isActive": true },
            { "id": "s3", "name": "C", "isActive": true }
        ],
        "reviewTasks": [{
            "id": "r1",
            "sourceDate": "2024-03-11",
            "subjectId": "s9",
            "subjectName": "Penal",
            "scheduledDate": "2024-03-18",
            "reviewMinutes": 30
        }],
        "hasExecution": false
    })
}

#[test]
fn compose_prints_plan_and_hashes() {
    let file = json_file(&context(180));
    let path = file.path().to_str().unwrap();

    let output = studyplan(&["compose", "--context", path]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let out: Value = serde_json::from_slice(&output.stdout).unwrap();
    let plan = &out["plan"];
    assert_eq!(plan["status"], "PLANNED");
    assert_eq!(plan["reviewMinutes"], 30);
    assert_eq!(plan["extrasMinutes"], 20);
    assert_eq!(plan["theoryMinutes"], 130);

    let titles: Vec<&str> = plan["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Revisão: Penal", "Questões", "Teoria: A", "Teoria: B"]);

    assert_eq!(out["inputHash"].as_str().unwrap().len(), 64);
    assert_eq!(out["outputHash"].as_str().unwrap().len(), 64);
    assert!(out.get("nextCycleCursor").is_none());

    let again = studyplan(&["compose", "--context", path]);
    let again: Value = serde_json::from_slice(&again.stdout).unwrap();
    assert_eq!(again, out);
}

#[test]
fn compose_reports_rest_day() {
    let file = json_file(&context(0));
    let output = studyplan(&["compose", "--context", file.path().to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rest day"), "{stderr}");
    assert!(stderr.contains("WEEKLY_SCHEDULE"), "{stderr}");
}

#[test]
fn hash_is_canonical() {
    let file = json_file(&json!({"b": {"y": null, "x": [1, 2]}, "a": 2}));
    let output = studyplan(&["hash", file.path().to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "f6be4eb8bf16de852f667ca303cf31f80f849e13dff7b6e8a5ed58b34bc80650"
    );
}
