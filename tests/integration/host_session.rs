//! Full plugin sessions against a local stand-in for the Stream Deck
//! application.

use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

use talon_deck::config::Settings;
use talon_deck::host::{self, LaunchArgs};
use talon_deck::keys::SPEECH_STATUS_ACTION;

use crate::common::fixtures::StatusFixture;
use crate::common::init_test_logging;

type Socket = WebSocketStream<TcpStream>;

const FRAME_WAIT: Duration = Duration::from_secs(10);

async fn listen() -> (TcpListener, LaunchArgs) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let args = LaunchArgs {
        port: listener.local_addr().unwrap().port(),
        plugin_uuid: "UUID1".to_string(),
        register_event: "registerPlugin".to_string(),
        info: None,
    };
    (listener, args)
}

async fn accept(listener: &TcpListener) -> Socket {
    let (tcp, _) = timeout(FRAME_WAIT, listener.accept())
        .await
        .expect("plugin never connected")
        .unwrap();
    accept_async(tcp).await.unwrap()
}

async fn next_json(ws: &mut Socket) -> Value {
    loop {
        let frame = timeout(FRAME_WAIT, ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("plugin closed the connection")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Read frames until `expected` arrives.
async fn wait_for(ws: &mut Socket, expected: &Value) {
    let deadline = Instant::now() + FRAME_WAIT;
    loop {
        assert!(Instant::now() < deadline, "never received {expected}");
        if next_json(ws).await == *expected {
            return;
        }
    }
}

async fn send_json(ws: &mut Socket, value: &Value) {
    ws.send(Message::Text(value.to_string().into())).await.unwrap();
}

fn speech_key_appears(context: &str, settings: &Value) -> Value {
    json!({
        "event": "willAppear",
        "action": SPEECH_STATUS_ACTION,
        "context": context,
        "device": "DEV1",
        "payload": { "settings": settings, "coordinates": { "column": 0, "row": 0 } }
    })
}

fn set_state(context: &str, state: u8) -> Value {
    json!({ "event": "setState", "context": context, "payload": { "state": state } })
}

#[tokio::test]
async fn plugin_registers_and_follows_status_file() {
    init_test_logging();
    let status = StatusFixture::with_content("mode command\nend\n");
    let (listener, args) = listen().await;
    let mut settings = Settings::default();
    settings.set_status_file(status.path()).unwrap();

    let stream_deck = async {
        let mut ws = accept(&listener).await;
        assert_eq!(
            next_json(&mut ws).await,
            json!({ "event": "registerPlugin", "uuid": "UUID1" })
        );

        send_json(&mut ws, &speech_key_appears("c1", &json!({}))).await;
        assert_eq!(next_json(&mut ws).await, set_state("c1", 0));

        status.replace("mode sleep\nend\n");
        wait_for(&mut ws, &set_state("c1", 1)).await;

        ws.close(None).await.unwrap();
    };

    let (result, ()) = tokio::join!(host::run(&args, &settings), stream_deck);
    result.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn key_release_reaches_repl_stdin() {
    init_test_logging();
    let status = StatusFixture::with_content("mode command\nend\n");
    let received = status.dir.path().join("repl-input");
    let (listener, args) = listen().await;
    let mut settings = Settings::default();
    settings.set_status_file(status.path()).unwrap();
    settings.repl_path = "sh".into();
    settings.repl_args = vec![
        "-c".to_string(),
        "cat > \"$0\"".to_string(),
        received.display().to_string(),
    ];

    let stream_deck = async {
        let mut ws = accept(&listener).await;
        next_json(&mut ws).await;

        send_json(
            &mut ws,
            &speech_key_appears("c1", &json!({ "pressAction": "actions.speech.toggle()" })),
        )
        .await;
        wait_for(&mut ws, &set_state("c1", 0)).await;
        send_json(
            &mut ws,
            &json!({
                "event": "keyUp",
                "action": SPEECH_STATUS_ACTION,
                "context": "c1",
                "device": "DEV1",
                "payload": { "settings": {} }
            }),
        )
        .await;

        let deadline = Instant::now() + FRAME_WAIT;
        while std::fs::read(&received).ok().as_deref() != Some(b"actions.speech.toggle()".as_slice()) {
            assert!(Instant::now() < deadline, "REPL never received the action");
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        ws.close(None).await.unwrap();
    };

    let (result, ()) = tokio::join!(host::run(&args, &settings), stream_deck);
    result.unwrap();
}
