use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

fn bin() -> Command {
    let path = assert_cmd::cargo::cargo_bin!("supporter_cli");
    Command::new(path)
}

fn write_corpus(dir: &Path) -> std::path::PathBuf {
    let corpus = json!([
        {
            "id": 1,
            "question": "How do I reset my password?",
            "keywords": ["reset password"],
            "answer": "Go to settings > security."
        },
        {
            "id": 2,
            "question": "What payment methods are accepted?",
            "keywords": ["payment"],
            "answer": "Cards and bank transfer."
        }
    ]);
    let path = dir.join("faq.json");
    fs::write(&path, serde_json::to_string_pretty(&corpus).unwrap()).unwrap();
    path
}

#[test]
fn ask_answers_exact_canonical_question() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = write_corpus(dir.path());

    bin()
        .args([
            "ask",
            "--corpus",
            corpus.to_str().unwrap(),
            "--question",
            "How do I reset my password?",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("decision=Hit"))
        .stdout(predicate::str::contains("entry_id=1"))
        .stdout(predicate::str::contains("answer=Go to settings > security."));
}

#[test]
fn ask_without_keyword_overlap_prints_default_answer() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = write_corpus(dir.path());

    bin()
        .args([
            "ask",
            "--corpus",
            corpus.to_str().unwrap(),
            "--question",
            "What is the weather today?",
            "--default-answer",
            "No idea.",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("decision=Miss"))
        .stdout(predicate::str::contains("entry_id=null"))
        .stdout(predicate::str::contains("answer=No idea."));
}

#[test]
fn ask_survives_a_missing_corpus_file() {
    bin()
        .args([
            "ask",
            "--corpus",
            "/nonexistent/faq.json",
            "--question",
            "Anything?",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("decision=Miss"));
}

#[test]
fn eval_reports_full_self_consistency() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = write_corpus(dir.path());
    let report = dir.path().join("report.json");

    bin()
        .args([
            "eval",
            "--corpus",
            corpus.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("total=2 passed=2 failed=0"))
        .stdout(predicate::str::contains("accuracy=1.0000"))
        .stdout(predicate::str::contains("failed_ids=[]"));

    let parsed: Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(parsed["total"], 2);
    assert_eq!(parsed["failed_ids"], json!([]));
    assert!(parsed["outcomes"].as_array().unwrap().len() == 2);
}

#[test]
fn dedup_keeps_first_occurrence() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dup.json");
    let output = dir.path().join("clean.json");
    let corpus = json!([
        {"id": 1, "question": "x", "answer": "a"},
        {"id": 2, "question": "x", "answer": "b"},
        {"id": 3, "question": "y", "answer": "c"}
    ]);
    fs::write(&input, serde_json::to_string(&corpus).unwrap()).unwrap();

    bin()
        .args([
            "dedup",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("kept=2 dropped=1"));

    let parsed: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let ids: Vec<u64> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn export_failed_copies_only_named_entries() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = write_corpus(dir.path());
    let output = dir.path().join("failed.json");

    bin()
        .args([
            "export-failed",
            "--input",
            corpus.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--ids",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("exported=1"));

    let parsed: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], 2);
}

#[test]
fn export_failed_requires_an_id_source() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = write_corpus(dir.path());
    let output = dir.path().join("failed.json");

    bin()
        .args([
            "export-failed",
            "--input",
            corpus.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no failed ids"));
}
