//! End-to-end dispatch scenarios against the simulated desktop provider.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value, json};
use stagehand::core::dispatch::{Dispatcher, LIST_TOOLS};
use stagehand::core::envelope::{CallRequest, CallResponse};
use stagehand::provider::sim::SimulatedDesktop;
use stagehand::tools;

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

struct Harness {
    dispatcher: Dispatcher,
    sim: Arc<SimulatedDesktop>,
}

impl Harness {
    fn new() -> Self {
        let sim = Arc::new(SimulatedDesktop::new());
        let dispatcher = Dispatcher::new(tools::build_registry(), sim.clone());
        Self { dispatcher, sim }
    }

    async fn call(&self, tool: &str, arguments: Value) -> CallResponse {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.dispatcher
            .dispatch(CallRequest::new(tool, arguments, json!("test")))
            .await
    }
}

fn payload(response: CallResponse) -> Value {
    assert!(response.ok, "expected success, got error: {:?}", response.error);
    response.result.expect("success payload")
}

#[tokio::test]
async fn mouse_move_then_get_position() {
    let h = Harness::new();

    let moved = payload(h.call("mouse_move", json!({"x": 100, "y": 200})).await);
    assert_eq!(moved["status"], json!("success"));
    assert_eq!(moved["message"], json!("Mouse moved to (100, 200)"));

    let position = payload(h.call("mouse_get_position", json!({})).await);
    assert_eq!(position, json!({"x": 100, "y": 200}));
}

#[tokio::test]
async fn key_tap_without_key_fails_before_the_provider() {
    let h = Harness::new();

    let response = h.call("key_tap", json!({})).await;

    assert!(!response.ok);
    let message = response.error.expect("failure message");
    assert!(message.contains("key"), "message should name the field: {message}");
    assert!(h.sim.calls().await.is_empty(), "provider must not be called");
}

#[tokio::test]
async fn screen_capture_returns_base64_png() {
    let h = Harness::new();

    let capture = payload(h.call("screen_capture", json!({})).await);
    assert_eq!(capture["format"], json!("png"));
    assert_eq!(capture["encoding"], json!("base64"));

    let bytes = BASE64
        .decode(capture["image"].as_str().expect("image string"))
        .expect("valid base64");
    assert_eq!(&bytes[..8], &PNG_SIGNATURE);
}

#[tokio::test]
async fn unknown_tool_fails_and_provider_is_untouched() {
    let h = Harness::new();

    let response = h.call("does_not_exist", json!({})).await;

    assert!(!response.ok);
    assert_eq!(response.error.as_deref(), Some("unknown tool: does_not_exist"));
    assert!(h.sim.calls().await.is_empty());
}

#[tokio::test]
async fn double_click_reaches_the_provider() {
    let h = Harness::new();

    payload(h.call("mouse_click", json!({"button": "left", "double": true})).await);

    let calls = h.sim.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "pointer_click");
    assert_eq!(calls[0].1, json!({"button": "left", "double": true}));
}

#[tokio::test]
async fn omitted_optionals_match_explicit_defaults() {
    let defaulted = Harness::new();
    let explicit = Harness::new();

    payload(defaulted.call("mouse_click", json!({})).await);
    payload(explicit.call("mouse_click", json!({"button": "left", "double": false})).await);

    assert_eq!(defaulted.sim.calls().await, explicit.sim.calls().await);
}

#[tokio::test]
async fn pure_queries_are_idempotent() {
    let h = Harness::new();

    let first = payload(h.call("mouse_get_position", json!({})).await);
    let second = payload(h.call("mouse_get_position", json!({})).await);
    assert_eq!(first, second);

    let size_a = payload(h.call("screen_get_size", json!({})).await);
    let size_b = payload(h.call("screen_get_size", json!({})).await);
    assert_eq!(size_a, size_b);
}

#[tokio::test]
async fn capture_save_writes_a_png_file() {
    let h = Harness::new();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("shot.png");
    let path_str = path.to_string_lossy().to_string();

    let saved = payload(
        h.call(
            "screen_capture_save",
            json!({"path": path_str, "x": 0, "y": 0, "width": 64, "height": 32}),
        )
        .await,
    );
    assert_eq!(saved["path"], json!(path_str));

    let bytes = std::fs::read(&path).expect("file written");
    assert_eq!(&bytes[..8], &PNG_SIGNATURE);
}

#[tokio::test]
async fn wrong_typed_optional_falls_back_silently() {
    let h = Harness::new();

    // "double" as a string is ignored, not an error.
    payload(h.call("mouse_click", json!({"double": "yes"})).await);

    let calls = h.sim.calls().await;
    assert_eq!(calls[0].1, json!({"button": "left", "double": false}));
}

#[tokio::test]
async fn provider_failures_pass_the_message_through() {
    let h = Harness::new();

    let kill = h.call("process_kill", json!({"pid": 999})).await;
    assert!(!kill.ok);
    assert_eq!(
        kill.error.as_deref(),
        Some("failed to kill process: process 999 not found")
    );

    let run = h.call("process_run", json!({"command": "ls"})).await;
    assert!(!run.ok);
    assert_eq!(
        run.error.as_deref(),
        Some("failed to run command: process execution is not available on the simulated desktop")
    );
}

#[tokio::test]
async fn window_move_and_resize_are_observable() {
    let h = Harness::new();

    payload(h.call("window_move", json!({"pid": 101, "x": 5, "y": 15})).await);
    payload(h.call("window_resize", json!({"pid": 101, "width": 320, "height": 240})).await);

    let bounds = payload(h.call("window_get_bounds", json!({"pid": 101})).await);
    assert_eq!(bounds, json!({"x": 5, "y": 15, "width": 320, "height": 240}));
}

#[tokio::test]
async fn clipboard_write_then_read() {
    let h = Harness::new();

    payload(h.call("clipboard_write", json!({"text": "copied"})).await);
    let read = payload(h.call("clipboard_read", json!({})).await);
    assert_eq!(read, json!({"text": "copied"}));
}

#[tokio::test]
async fn catalog_lists_every_tool() {
    let h = Harness::new();

    let catalog = payload(h.call(LIST_TOOLS, json!({})).await);
    assert_eq!(catalog["count"], json!(44));

    let names: Vec<&str> = catalog["tools"]
        .as_array()
        .expect("tool array")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert!(names.contains(&"mouse_move"));
    assert!(names.contains(&"screen_capture"));
    assert!(names.contains(&"alert_show"));
}

#[tokio::test]
async fn required_coordinates_accept_integer_valued_floats() {
    let h = Harness::new();

    let moved = payload(h.call("mouse_move", json!({"x": 100.0, "y": 200.0})).await);
    assert_eq!(moved["message"], json!("Mouse moved to (100, 200)"));
}
