//! Runs the built binary to check that stdout carries nothing but responses

use crate::common::TestProject;
use serde_json::{Value, json};
use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Feed `input` to `pyresolve` on stdin, close it and wait for exit
fn run_worker(project: &TestProject, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pyresolve"))
        .args(args)
        .current_dir(project.path())
        .env("PYRESOLVE_LOG", "debug")
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start pyresolve");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(input.as_bytes())
        .expect("Failed to write requests");

    child.wait_with_output().expect("Failed to wait for pyresolve")
}

#[test]
fn test_stdout_holds_only_responses() {
    let project = TestProject::new();
    let script = project.add_file("script.py", "open('data.txt')\n");
    let missing = project.path().join("missing.py");

    // The last request has no trailing newline
    let requests = [
        json!({ "file": script, "line": 1, "column": 1 }).to_string(),
        "not json".to_string(),
        json!({ "file": missing, "line": 1, "column": 1 }).to_string(),
        json!({ "file": 3 }).to_string(),
        json!({ "file": script, "line": 1, "column": 1, "fileText": "print(1)\n" }).to_string(),
    ];
    let output = run_worker(&project, &[], &requests.join("\n"));

    assert!(output.status.success(), "worker exited with {}", output.status);

    let stdout = String::from_utf8(output.stdout).expect("stdout is not UTF-8");
    let responses: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is not JSON"))
        .collect();
    assert_eq!(
        responses,
        vec![
            json!("builtins.open"),
            Value::Null,
            Value::Null,
            Value::Null,
            json!("builtins.print"),
        ]
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.is_empty(), "diagnostics should go to stderr");
    assert!(stderr.contains("missing.py"), "stderr: {stderr}");
}

#[test]
fn test_empty_input_exits_cleanly() {
    let project = TestProject::new();
    let output = run_worker(&project, &["serve"], "");

    assert!(output.status.success(), "worker exited with {}", output.status);
    assert!(output.stdout.is_empty());
}
