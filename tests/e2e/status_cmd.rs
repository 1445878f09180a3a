//! E2E tests for the status command.

use serde_json::json;

use crate::common::cli::CliRunner;
use crate::common::fixtures::StatusFixture;
use crate::common::init_test_logging;

#[test]
fn status_prints_active_entries() {
    init_test_logging();
    let status = StatusFixture::with_content("mode command\ntag user.git\napp Slack\nend\n");
    CliRunner::new()
        .run(&["status", "--status-file", status.path_str()])
        .assert_success()
        .assert_stdout_contains("Modes: command")
        .assert_stdout_contains("Tags: user.git")
        .assert_stdout_contains("Apps: Slack");
}

#[test]
fn status_robot_outputs_sets() {
    init_test_logging();
    let status = StatusFixture::with_content("mode sleep\napp Slack\nend");
    CliRunner::new()
        .run_robot(&["status", "--status-file", status.path_str()])
        .assert_success()
        .assert_json_field("/modes", &json!(["sleep"]))
        .assert_json_field("/tags", &json!([]))
        .assert_json_field("/apps", &json!(["Slack"]))
        .assert_json_field("/path", &json!(status.path_str()))
        .assert_json_field_exists("/read_at");
}

#[test]
fn status_reads_from_tmpdir_by_default() {
    init_test_logging();
    let status = StatusFixture::with_content("tag user.vscode\nend\n");
    CliRunner::new()
        .with_env("TMPDIR", status.dir_str())
        .run_robot(&["status"])
        .assert_success()
        .assert_json_field("/tags", &json!(["user.vscode"]));
}

#[test]
fn status_malformed_file_fails() {
    init_test_logging();
    let status = StatusFixture::with_content("mode command\n");
    CliRunner::new()
        .run(&["status", "--status-file", status.path_str()])
        .assert_exit_code(1)
        .assert_stderr_contains("Malformed status file");
}

#[test]
fn status_missing_file_robot_error() {
    init_test_logging();
    let status = StatusFixture::new();
    let result = CliRunner::new().run_robot(&["status", "--status-file", status.path_str()]);
    result.assert_exit_code(1);

    let error = result.stderr_json();
    assert_eq!(error["error"], json!(true));
    assert_eq!(error["recoverable"], json!(true));
    assert!(
        error["message"]
            .as_str()
            .is_some_and(|m| m.contains("Unable to open status file")),
        "unexpected error: {error}"
    );
    assert!(error["suggestion"].is_string());
}
