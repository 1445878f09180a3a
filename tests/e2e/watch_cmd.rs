//! E2E tests for the watch command behavior.

use std::fs;
use std::thread;
use std::time::Duration;

use serde_json::json;

use crate::common::cli::CliRunner;
use crate::common::fixtures::StatusFixture;
use crate::common::init_test_logging;

#[test]
fn watch_timeout_exits_quietly() {
    init_test_logging();
    let status = StatusFixture::with_content("mode command\nend\n");
    let result = CliRunner::new().run_robot(&[
        "watch",
        "--timeout=1",
        "--status-file",
        status.path_str(),
    ]);

    result
        .assert_success()
        .assert_duration_under(Duration::from_secs(10));
    assert!(result.stdout.trim().is_empty(), "unexpected output: {}", result.stdout);
}

#[test]
fn watch_once_reports_replaced_file() {
    init_test_logging();
    let status = StatusFixture::with_content("mode sleep\nend\n");
    let target = status.path().to_path_buf();
    let staging = status.dir.path().join("talon-status.new");

    let writer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(1500));
        fs::write(&staging, "mode command\ntag user.git\nend\n").unwrap();
        fs::rename(&staging, &target).unwrap();
    });

    let result = CliRunner::new().run_robot(&[
        "watch",
        "--once",
        "--timeout=20",
        "--status-file",
        status.path_str(),
    ]);
    writer.join().unwrap();

    result
        .assert_success()
        .assert_json_field("/modes", &json!(["command"]))
        .assert_json_field("/tags", &json!(["user.git"]));
}

#[test]
fn watch_missing_directory_fails() {
    init_test_logging();
    let status = StatusFixture::new();
    let path = status.dir.path().join("gone").join("talon-status");
    CliRunner::new()
        .run(&["watch", "--timeout=1", "--status-file", path.to_str().unwrap()])
        .assert_exit_code(1)
        .assert_stderr_contains("Failed to watch");
}

#[test]
fn watch_names_the_watched_directory() {
    init_test_logging();
    let status = StatusFixture::with_content("mode command\nend\n");
    CliRunner::new()
        .run(&["watch", "--timeout=1", "--status-file", status.path_str()])
        .assert_success()
        .assert_stdout_contains(&format!("Watching {} for talon-status", status.dir_str()));
}
