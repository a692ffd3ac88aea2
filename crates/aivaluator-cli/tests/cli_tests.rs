//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn aivaluator() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("aivaluator").unwrap()
}

const COMPLETE_SESSION: &str = r#"
students = 2
questions = 1

[values]
student0 = "Alice"
student1 = "Bob"
question0 = "Define inertia."
gptAnswer0 = "Resistance of a body to changes in its motion."
textbookAnswer0 = "The tendency of an object to keep its state of motion."
answer0_0 = "Objects keep moving unless a force acts."
answer0_1 = "Mass resisting acceleration."
"#;

fn files_with_prefix(dir: &std::path::Path, prefix: &str) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect()
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    aivaluator()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created aivaluator.toml"))
        .stdout(predicate::str::contains("Created session.toml"));

    assert!(dir.path().join("aivaluator.toml").exists());
    assert!(dir.path().join("session.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    aivaluator().current_dir(dir.path()).arg("init").assert().success();

    aivaluator()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_session_validates() {
    let dir = TempDir::new().unwrap();
    aivaluator().current_dir(dir.path()).arg("init").assert().success();

    aivaluator()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--session")
        .arg("session.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 students x 1 questions"))
        .stdout(predicate::str::contains("Session is complete"));
}

#[test]
fn form_writes_page_and_session_skeleton() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let skeleton = dir.path().join("blank.toml");

    aivaluator()
        .arg("form")
        .arg("--students")
        .arg("3")
        .arg("--questions")
        .arg("2")
        .arg("--output")
        .arg(&out)
        .arg("--session-out")
        .arg(&skeleton)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 students x 2 questions (15 fields)"));

    let html = std::fs::read_to_string(out.join("form.html")).unwrap();
    assert_eq!(html.matches("<input type=\"text\" id=\"student").count(), 3);
    assert_eq!(html.matches("class=\"question-block\"").count(), 2);

    let text = std::fs::read_to_string(&skeleton).unwrap();
    assert!(text.contains("answer1_2"));

    // The skeleton is all blanks, so validation flags every field.
    aivaluator()
        .arg("validate")
        .arg("--session")
        .arg(&skeleton)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[student0] WARNING: value is empty"))
        .stderr(predicate::str::contains("15 warning(s) found"));
}

#[test]
fn form_rejects_invalid_counts() {
    let dir = TempDir::new().unwrap();

    aivaluator()
        .arg("form")
        .arg("--students")
        .arg("many")
        .arg("--questions")
        .arg("2")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid students count"));

    aivaluator()
        .arg("form")
        .arg("--students")
        .arg("2")
        .arg("--questions=-1")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid questions count"));
}

#[test]
fn form_rejects_oversized_counts_without_panicking() {
    let dir = TempDir::new().unwrap();

    aivaluator()
        .arg("form")
        .arg("--students")
        .arg("18446744073709551615")
        .arg("--questions")
        .arg("0")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid students count"))
        .stderr(predicate::str::contains("between 0 and 500"));

    assert!(!dir.path().join("form.html").exists());
}

#[test]
fn validate_nonexistent_file() {
    aivaluator()
        .arg("validate")
        .arg("--session")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_complete_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.toml");
    std::fs::write(&path, COMPLETE_SESSION).unwrap();

    aivaluator()
        .arg("validate")
        .arg("--session")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Session is complete"));
}

#[test]
fn render_saved_report() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.json");
    std::fs::write(
        &report,
        r#"{"Q1": {"Alice": {"GPT": 8, "TextBook": 7}, "Bob": {"GPT": 9, "TextBook": 6}}}"#,
    )
    .unwrap();
    let out = dir.path().join("out");

    aivaluator()
        .arg("render")
        .arg("--report")
        .arg(&report)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Results page"))
        .stderr(predicate::str::contains("8.00"));

    let pages = files_with_prefix(&out, "results-");
    assert_eq!(pages.len(), 1);
    let html = std::fs::read_to_string(&pages[0]).unwrap();
    assert_eq!(html.matches("<h2>Combined Grades</h2>").count(), 1);
    assert!(html.contains("<li>GPT Marks: 9.00</li>"));
    assert!(html.contains("<li>TextBook Marks: 6.00</li>"));
}

#[test]
fn render_empty_report_with_zero_questions() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.json");
    std::fs::write(&report, "{}").unwrap();

    aivaluator()
        .arg("render")
        .arg("--report")
        .arg(&report)
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("no questions were graded"));
}

#[test]
fn render_rejects_malformed_report() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.json");
    std::fs::write(&report, r#"{"Q1": ["not", "a", "mapping"]}"#).unwrap();

    aivaluator()
        .arg("render")
        .arg("--report")
        .arg(&report)
        .arg("--output")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse score report JSON"));
}

#[test]
fn help_output() {
    aivaluator()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Form generator and result renderer for answer grading",
        ));
}

#[test]
fn version_output() {
    aivaluator()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aivaluator"));
}

#[test]
fn render_twice_keeps_both_pages() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.json");
    std::fs::write(&report, r#"{"Q1": {"Alice": {"GPT": 8, "TextBook": 7}}}"#).unwrap();
    let out = dir.path().join("out");

    for _ in 0..2 {
        aivaluator()
            .arg("render")
            .arg("--report")
            .arg(&report)
            .arg("--output")
            .arg(&out)
            .assert()
            .success();
    }

    assert_eq!(files_with_prefix(&out, "results-").len(), 2);
}

#[test]
fn render_summary_rounds_ties_up() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("report.json");
    // 101 / 8 = 12.625
    std::fs::write(
        &report,
        r#"{"Q1": {"Alice": {"GPT": 17, "TextBook": 0}},
            "Q2": {"Alice": {"GPT": 84, "TextBook": 0}}}"#,
    )
    .unwrap();
    let out = dir.path().join("out");

    aivaluator()
        .arg("render")
        .arg("--report")
        .arg(&report)
        .arg("--questions")
        .arg("8")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("12.63"))
        .stderr(predicate::str::contains("12.62").not());

    let pages = files_with_prefix(&out, "results-");
    let html = std::fs::read_to_string(&pages[0]).unwrap();
    assert!(html.contains("<li>GPT Marks: 12.63</li>"));
}
