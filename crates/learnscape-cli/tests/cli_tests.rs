//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn learnscape() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("learnscape").unwrap()
}

const WORKSHEET: &str = r#"[worksheet]
id = "uji"
name = "LKPD Uji"
class_level = "Kelas 7"

[[questions]]
text = "Pilih jawaban B"
type = "multiple-choice"
options = ["A", "B", "C", "D"]
correct_answer = "1"

[[questions]]
text = "Berapakah 15 x 3?"
type = "numeric"
correct_answer = "45"
"#;

#[test]
fn validate_repo_worksheets() {
    learnscape()
        .arg("validate")
        .arg("--worksheet")
        .arg("../../worksheets")
        .assert()
        .success()
        .stdout(predicate::str::contains("LKPD Fisika Kelas 7"))
        .stdout(predicate::str::contains("LKPD Matematika Kelas 8"))
        .stdout(predicate::str::contains("All worksheets valid"));
}

#[test]
fn validate_single_worksheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("uji.toml");
    std::fs::write(&path, WORKSHEET).unwrap();

    learnscape()
        .arg("validate")
        .arg("--worksheet")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions"))
        .stdout(predicate::str::contains("All worksheets valid"));
}

#[test]
fn validate_warns_on_bad_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rusak.toml");
    std::fs::write(
        &path,
        r#"[worksheet]
id = "rusak"
name = "Rusak"

[[questions]]
text = "Pilih satu"
type = "multiple-choice"
options = ["A", "B"]
correct_answer = "9"
"#,
    )
    .unwrap();

    learnscape()
        .arg("validate")
        .arg("--worksheet")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("does not resolve"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    learnscape()
        .arg("validate")
        .arg("--worksheet")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    learnscape()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created learnscape.toml"))
        .stdout(predicate::str::contains("Created worksheets/contoh.toml"));

    assert!(dir.path().join("learnscape.toml").exists());
    assert!(dir.path().join("worksheets/contoh.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    learnscape()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    learnscape()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn grade_offline_full_marks() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("uji.toml"), WORKSHEET).unwrap();
    std::fs::write(dir.path().join("jawaban.json"), r#"["1", "x=45"]"#).unwrap();

    learnscape()
        .current_dir(dir.path())
        .arg("grade")
        .arg("--worksheet")
        .arg("uji.toml")
        .arg("--answers")
        .arg("jawaban.json")
        .arg("--student")
        .arg("Budi")
        .arg("--offline")
        .arg("--output")
        .arg("out")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 100/100"))
        .stdout(predicate::str::contains("2 of 2 correct"));

    // Exactly one submission file, with the verdicts persisted.
    let entries: Vec<_> = std::fs::read_dir(dir.path().join("out"))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(entries.len(), 1);
    let content = std::fs::read_to_string(entries[0].path()).unwrap();
    let submission: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(submission["student_name"], "Budi");
    assert_eq!(submission["result"]["totalScore"], 100);
    assert_eq!(submission["evaluated_by"], "offline");
}

#[test]
fn grade_offline_partial_credit() {
    let dir = TempDir::new().unwrap();
    let worksheet = r#"[worksheet]
id = "parsial"
name = "Parsial"

[[questions]]
text = "q1"
type = "numeric"
correct_answer = "1"

[[questions]]
text = "q2"
type = "numeric"
correct_answer = "2"

[[questions]]
text = "q3"
type = "numeric"
correct_answer = "3"

[[questions]]
text = "q4"
type = "numeric"
correct_answer = "4"
"#;
    std::fs::write(dir.path().join("parsial.toml"), worksheet).unwrap();
    std::fs::write(dir.path().join("jawaban.json"), r#"["1", "9", "3", "9"]"#).unwrap();

    learnscape()
        .current_dir(dir.path())
        .arg("grade")
        .arg("--worksheet")
        .arg("parsial.toml")
        .arg("--answers")
        .arg("jawaban.json")
        .arg("--offline")
        .arg("--output")
        .arg("out")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 50/100"))
        .stdout(predicate::str::contains("2 of 4 correct"));
}

#[test]
fn grade_unanswered_questions_never_score() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("uji.toml"), WORKSHEET).unwrap();
    // Shorter than the question list: the second question is unanswered.
    std::fs::write(dir.path().join("jawaban.json"), r#"["1"]"#).unwrap();

    learnscape()
        .current_dir(dir.path())
        .arg("grade")
        .arg("--worksheet")
        .arg("uji.toml")
        .arg("--answers")
        .arg("jawaban.json")
        .arg("--offline")
        .arg("--output")
        .arg("out")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 50/100"))
        .stdout(predicate::str::contains("(unanswered)"));
}

#[test]
fn grade_missing_answers_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("uji.toml"), WORKSHEET).unwrap();

    learnscape()
        .current_dir(dir.path())
        .arg("grade")
        .arg("--worksheet")
        .arg("uji.toml")
        .arg("--answers")
        .arg("hilang.json")
        .arg("--offline")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn generate_without_provider_fails() {
    let dir = TempDir::new().unwrap();

    learnscape()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("LEARNSCAPE_GEMINI_KEY")
        .env_remove("LEARNSCAPE_OPENAI_KEY")
        .arg("generate")
        .arg("--topic")
        .arg("Aljabar")
        .arg("--class-level")
        .arg("Kelas 8")
        .assert()
        .failure()
        .stderr(predicate::str::contains("provider"));
}

#[test]
fn help_output() {
    learnscape()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Digital worksheet grading engine"));
}

#[test]
fn version_output() {
    learnscape()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("learnscape"));
}
