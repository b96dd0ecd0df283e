//! End-to-end lesson flow through the real binary.
//!
//! Drives `neuro-niche run` over piped stdin in an isolated working
//! directory, then checks the three completion artifacts: the score in the
//! summary, the CSV log row, and the archived certificate PNG.

use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Run the binary in `dir` with the given stdin script, return stdout.
fn run_lesson(dir: &Path, extra_args: &[&str], script: &[&str]) -> String {
    let bin = env!("CARGO_BIN_EXE_neuro-niche");
    let mut child = Command::new(bin)
        .arg("run")
        .args(extra_args)
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run neuro-niche");

    let mut stdin = child.stdin.take().unwrap();
    let input = script.join("\n") + "\n";
    stdin.write_all(input.as_bytes()).unwrap();
    drop(stdin);

    let output = child.wait_with_output().expect("binary did not exit");
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stdin script for a perfect run: entry, every answer correct, no restart.
fn perfect_script() -> Vec<&'static str> {
    vec![
        "Ada",     // name
        "a@x.com", // email
        "2",       // natural variation
        "",        // next
        "1,3,5",   // the three myths, exactly
        "",        // next
        "3",       // inclusive phrasing
        "",        // next (content-only slide)
        "",        // take the quiz
        "3",       // 15-20%
        "2",       // written instructions
        "n",       // no restart
    ]
}

#[test]
fn perfect_run_produces_all_completion_artifacts() {
    let tmp = TempDir::new().unwrap();
    let stdout = run_lesson(tmp.path(), &[], &perfect_script());

    // Summary shows the full score
    assert!(stdout.contains("Lesson complete"), "stdout: {stdout}");
    assert!(stdout.contains("Ada \u{2014} Score: 5/5"), "stdout: {stdout}");

    // One log row with the score
    let log = std::fs::read_to_string(tmp.path().join("completions.csv")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines[0], "timestamp_utc,name,email,score");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with(",Ada,a@x.com,5"), "row: {}", lines[1]);

    // One archived certificate, decodable at the fixed canvas size
    let certs: Vec<_> = std::fs::read_dir(tmp.path().join("certificates"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(certs.len(), 1);
    let name = certs[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("neuro_niche_certificate_"), "name: {name}");
    assert!(name.ends_with(".png"));

    let decoded = image::open(&certs[0]).unwrap();
    assert_eq!(decoded.width(), 1654);
    assert_eq!(decoded.height(), 2339);
}

#[test]
fn wrong_answers_are_scored_not_rejected() {
    let tmp = TempDir::new().unwrap();
    let script = vec![
        "Bea", "b@x.com", "1", "", "2", "", "1", "", "", "1", "1", "n",
    ];
    let stdout = run_lesson(tmp.path(), &[], &script);
    assert!(stdout.contains("Bea \u{2014} Score: 0/5"), "stdout: {stdout}");

    let log = std::fs::read_to_string(tmp.path().join("completions.csv")).unwrap();
    assert!(log.lines().nth(1).unwrap().ends_with(",Bea,b@x.com,0"));
}

#[test]
fn share_flag_prints_encoded_link() {
    let tmp = TempDir::new().unwrap();
    let stdout = run_lesson(
        tmp.path(),
        &["--app-url", "https://lesson.example.com/app"],
        &perfect_script(),
    );
    assert!(
        stdout.contains(
            "https://www.linkedin.com/sharing/share-offsite/\
             ?url=https%3A%2F%2Flesson.example.com%2Fapp"
        ),
        "stdout: {stdout}"
    );
}

#[test]
fn each_finished_attempt_appends_one_log_row() {
    let tmp = TempDir::new().unwrap();

    // Restart once mid-script: two finished attempts in one process
    let mut script = perfect_script();
    script.pop(); // drop the trailing "n"
    script.push("y");
    script.extend([
        "Grace", "g@x.com", "2", "", "1,3,5", "", "3", "", "", "3", "2", "n",
    ]);
    run_lesson(tmp.path(), &[], &script);

    let log = std::fs::read_to_string(tmp.path().join("completions.csv")).unwrap();
    let rows: Vec<&str> = log.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].contains(",Ada,"));
    assert!(rows[1].contains(",Grace,"));
}

#[test]
fn certificate_command_regenerates_for_name_and_score() {
    let tmp = TempDir::new().unwrap();
    let bin = env!("CARGO_BIN_EXE_neuro-niche");
    let output = Command::new(bin)
        .args(["certificate", "Ada", "4"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let certs: Vec<_> = std::fs::read_dir(tmp.path().join("certificates"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(certs.len(), 1);
    assert!(
        certs[0]
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("neuro_niche_certificate_")
    );
}

#[test]
fn certificate_command_rejects_out_of_range_score() {
    let tmp = TempDir::new().unwrap();
    let bin = env!("CARGO_BIN_EXE_neuro-niche");
    let output = Command::new(bin)
        .args(["certificate", "Ada", "99"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"), "stderr: {stderr}");
    // No certificate was written
    assert!(!tmp.path().join("certificates").exists());
}

#[test]
fn custom_lesson_toml_overrides_branding_and_deck() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("lesson.toml"),
        r#"
[course]
title = "Tiny Course"
brand = "Tiny"

[[slides]]
id = "only"
title = "The only slide"
body = "One question and done."

[[slides.questions]]
id = "q_one"
prompt = "Pick the second choice."
choices = [
    { id = "first", label = "First" },
    { id = "second", label = "Second" },
]
answer = "second"
"#,
    )
    .unwrap();

    let script = vec!["Ada", "a@x.com", "2", "n"];
    let stdout = run_lesson(tmp.path(), &[], &script);
    assert!(stdout.contains("Welcome to Tiny"), "stdout: {stdout}");
    assert!(stdout.contains("Slide 1/1: The only slide"), "stdout: {stdout}");
    assert!(stdout.contains("Ada \u{2014} Score: 1/1"), "stdout: {stdout}");
}
