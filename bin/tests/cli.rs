use std::{
    env, fs,
    path::PathBuf,
    process::{Command, Output},
};

use pretty_assertions::assert_eq;

fn loxpr() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_loxpr"));
    // Keep a stray loxpr.conf in the working directory from affecting the tests
    command.env("LOXPR_CONFIG", env::temp_dir().join("loxpr-cli-test-no-config.conf"));
    command.env_remove("RUST_LOG");
    command
}

fn source_file(name: &str, source: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("loxpr-cli-{}-{}.loxpr", name, std::process::id()));
    fs::write(&path, source).unwrap();
    path
}

fn run(name: &str, source: &str) -> Output {
    let path = source_file(name, source);
    let output = loxpr().arg(&path).output().expect("Failed to execute loxpr");
    fs::remove_file(&path).unwrap();
    output
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn prints_value() {
    let output = run("value", "2 + 3 * 4\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "14.000000\n");
    assert_eq!(stderr(&output), "");
}

#[test]
fn renders_each_type() {
    for (name, source, expected) in [
        ("string", "\"ab\" + \"cd\"", "abcd\n"),
        ("nil", "nil", "nil\n"),
        ("true", "1 < 2", "true\n"),
        ("false", "1 == \"1\"", "false\n"),
        ("negative", "-0.5", "-0.500000\n"),
    ] {
        let output = run(name, source);
        assert!(output.status.success(), "{name} should succeed");
        assert_eq!(stdout(&output), expected);
    }
}

#[test]
fn wrong_argument_count() {
    let output = loxpr().output().expect("Failed to execute loxpr");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Usage"));
    assert_eq!(stdout(&output), "");

    let output = loxpr().args(["a.loxpr", "b.loxpr"]).output().expect("Failed to execute loxpr");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn help_flag() {
    let output = loxpr().arg("--help").output().expect("Failed to execute loxpr");
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));
}

#[test]
fn missing_file() {
    let output = loxpr()
        .arg(env::temp_dir().join("loxpr-cli-test-missing.loxpr"))
        .output()
        .expect("Failed to execute loxpr");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Could not read"));
}

#[test]
fn scan_errors_are_batched() {
    let output = run("scan-errors", "\"one\n+ \"two\n");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_eq!(
        stderr(&output),
        "[line 1] Error: Unterminated string.\n[line 2] Error: Unterminated string.\n"
    );
}

#[test]
fn parse_errors_are_batched() {
    let output = run("parse-errors", "1 + ;\n(2");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_eq!(
        stderr(&output),
        "[line 1] Error at ';': Expect expression.\n\
         [line 2] Error at end: Expect ')' after expression.\n"
    );
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    let source = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
    let output = run("deep-nesting", &source);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_eq!(stderr(&output), "[line 1] Error at '(': Expression nested too deeply.\n");
}

#[test]
fn runtime_error() {
    let output = run("runtime-error", "1 / 0");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_eq!(stderr(&output), "Division by zero.\n[line 1]\n");
}

#[test]
fn configured_log_level() {
    let path = source_file("log-level", "1 + 1");
    let config = env::temp_dir().join(format!("loxpr-cli-config-{}.conf", std::process::id()));
    fs::write(&config, "LOG_LEVEL=INFO\n").unwrap();

    let output = loxpr().env("LOXPR_CONFIG", &config).arg(&path).output().unwrap();
    fs::remove_file(&path).unwrap();
    fs::remove_file(&config).unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "2.000000\n");
    assert!(stderr(&output).contains("Evaluating"));
}
