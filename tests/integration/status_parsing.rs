//! Status file parsing through [`StatusSnapshot`] and [`Bridge::reload`].

use std::collections::BTreeSet;
use std::sync::Arc;

use talon_deck::action::mock::RecordingSink;
use talon_deck::action::{ActionDispatcher, DEFAULT_ACTION_TIMEOUT};
use talon_deck::bridge::Bridge;
use talon_deck::error::{BridgeError, StatusParseError};
use talon_deck::status::StatusSnapshot;
use talon_deck::surface::mock::MockSurface;

use crate::common::fixtures::{status_text, StatusFixture};
use crate::common::init_test_logging;

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn bridge_for(fixture: &StatusFixture) -> Bridge {
    let dispatcher = ActionDispatcher::new(Arc::new(RecordingSink::new()), DEFAULT_ACTION_TIMEOUT);
    Bridge::new(fixture.path(), MockSurface::shared(), dispatcher)
}

#[test]
fn reload_reads_example_file() {
    init_test_logging();
    let fixture = StatusFixture::with_content("mode sleep\napp Slack\nend");
    let bridge = bridge_for(&fixture);

    bridge.reload().unwrap();
    let snapshot = bridge.snapshot();
    assert_eq!(snapshot.modes, set(&["sleep"]));
    assert!(snapshot.tags.is_empty());
    assert_eq!(snapshot.apps, set(&["Slack"]));
}

#[test]
fn trailing_newline_after_terminator_is_accepted() {
    let snapshot = StatusSnapshot::parse("mode sleep\nend\n").unwrap();
    assert_eq!(snapshot.modes, set(&["sleep"]));
}

#[test]
fn blank_line_after_terminator_is_rejected() {
    assert_eq!(
        StatusSnapshot::parse("mode sleep\nend\n\n"),
        Err(StatusParseError::Unterminated {
            last_line: String::new()
        })
    );
}

#[test]
fn crlf_line_endings_are_accepted() {
    let snapshot = StatusSnapshot::parse("tag user.git\r\nend\r\n").unwrap();
    assert_eq!(snapshot.tags, set(&["user.git"]));
}

#[test]
fn terminator_only_is_an_empty_snapshot() {
    let snapshot = StatusSnapshot::parse("end").unwrap();
    assert!(snapshot.is_empty());
}

#[test]
fn missing_or_empty_terminator_is_rejected() {
    for content in ["", "\n", "mode command", "mode command\nEnd", "end\nmode command\n"] {
        assert!(
            StatusSnapshot::parse(content).is_err(),
            "expected rejection of {content:?}"
        );
    }
}

#[test]
fn one_bad_line_discards_a_thousand_good_ones() {
    init_test_logging();
    let fixture = StatusFixture::new();
    let bridge = bridge_for(&fixture);

    let good: Vec<(&str, String)> = (0..1000).map(|i| ("tag", format!("user.tag{i}"))).collect();
    let entries: Vec<(&str, &str)> = good.iter().map(|(k, v)| (*k, v.as_str())).collect();
    fixture.write(&status_text(&entries));
    assert_eq!(bridge.reload().unwrap().tags, 1000);

    let good_text = status_text(&entries);
    let body = good_text.strip_suffix("end\n").unwrap();
    for bad in ["tagnospace", " tag leading", "tag ", "bogus value"] {
        fixture.write(&format!("{body}{bad}\nend\n"));

        let err = bridge.reload().unwrap_err();
        assert!(
            matches!(err, BridgeError::StatusMalformed(_)),
            "unexpected error for {bad:?}: {err}"
        );
        assert!(bridge.snapshot().is_empty(), "snapshot kept after {bad:?}");

        fixture.write(&status_text(&entries));
        bridge.reload().unwrap();
    }
}

#[test]
fn unknown_entry_type_rejects_the_file() {
    assert_eq!(
        StatusSnapshot::parse("mode command\nwindow Terminal\nend\n"),
        Err(StatusParseError::UnknownEntryType {
            line_no: 2,
            entry_type: "window".to_string()
        })
    );
}

#[test]
fn values_keep_inner_spaces_and_duplicates_collapse() {
    let snapshot =
        StatusSnapshot::parse("app Google Chrome\napp Google Chrome\nmode  padded\nend\n").unwrap();
    assert_eq!(snapshot.apps, set(&["Google Chrome"]));
    assert_eq!(snapshot.modes, set(&[" padded"]));
}

#[test]
fn order_of_lines_does_not_matter() {
    let entries = [
        ("mode", "command"),
        ("tag", "user.vscode"),
        ("app", "Code"),
        ("mode", "dictation"),
        ("tag", "terminal"),
    ];
    let forward = StatusSnapshot::parse(&status_text(&entries)).unwrap();

    let mut reversed = entries;
    reversed.reverse();
    let backward = StatusSnapshot::parse(&status_text(&reversed)).unwrap();

    assert_eq!(forward, backward);
    assert_eq!(forward.summary().modes, 2);
}

#[test]
fn reload_is_idempotent() {
    let fixture = StatusFixture::with_entries(&[("mode", "command"), ("app", "Slack")]);
    let bridge = bridge_for(&fixture);

    bridge.reload().unwrap();
    let first = bridge.snapshot();
    bridge.reload().unwrap();
    assert_eq!(bridge.snapshot(), first);
}

#[test]
fn missing_file_clears_the_snapshot() {
    init_test_logging();
    let fixture = StatusFixture::with_entries(&[("mode", "command")]);
    let bridge = bridge_for(&fixture);
    bridge.reload().unwrap();
    assert!(!bridge.snapshot().is_empty());

    fixture.remove();
    let err = bridge.reload().unwrap_err();
    assert!(matches!(err, BridgeError::StatusUnreadable { .. }));
    assert!(err.is_user_recoverable());
    assert!(bridge.snapshot().is_empty());
}
