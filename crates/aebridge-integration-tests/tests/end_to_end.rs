//! Decode, dispatch, route and reply, across every crate.

mod common;

use aebridge_core::{EventRecord, FourCharCode, Value};
use aebridge_descriptor::types::{KEY_CONTAINER, KEY_DESIRED_CLASS, KEY_KEY_DATA, KEY_KEY_FORM};
use aebridge_descriptor::{BINARY_PLACEHOLDER, MemoryDescriptor};
use aebridge_events::keywords::{KEY_DIRECT_OBJECT, KEY_JAVASCRIPT};
use aebridge_events::{CallbackStatus, DispatchError, OsStatus, ReplyValue};
use aebridge_host::{HandlerError, Router};
use aebridge_test::{
    MockEvent, RecordingDispatcher, RejectingDispatcher, code, get_url_event,
    open_documents_event, open_location_event, run_javascript_event, window_named_specifier,
};
use common::{Harness, direct_value};
use serde_json::json;

#[tokio::test]
async fn get_url_round_trip() {
    let h = Harness::new(8);
    let bridge = std::sync::Arc::clone(&h.bridge);

    let mut router = Router::new();
    router
        .on("core", "getd", |record: EventRecord| async move {
            let spec = record
                .direct_parameter()
                .and_then(Value::as_specifier)
                .ok_or_else(|| HandlerError::failed("expected an object specifier"))?;
            Ok::<_, HandlerError>(Some(json!({
                "what": spec.human_readable(),
                "target": record.target_app(),
            })))
        })
        .unwrap();
    router.install_all(&bridge).unwrap();
    let server = tokio::spawn(router.serve(h.queue));

    let status = bridge.handle_event(
        &get_url_event("com.apple.Safari"),
        Some(aebridge_test::MockReply::new()),
    );
    assert_eq!(status, CallbackStatus::ReplyLater);
    bridge.manager().wait_for_resumes(1).await;

    bridge.set_dispatcher(RejectingDispatcher(DispatchError::Closed));
    server.await.unwrap();

    let resumes = bridge.manager().resumes();
    assert_eq!(resumes.len(), 1);
    assert_eq!(resumes[0].status, OsStatus::NO_ERR);
    let Some(ReplyValue::Text(text)) = direct_value(&resumes[0]) else {
        panic!("expected a text reply");
    };
    let reply: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        reply,
        json!({ "what": "prop URL  of cTab 1", "target": "com.apple.Safari" })
    );
}

#[test]
fn record_json_shape() {
    let h = Harness::new(1);
    let recorder = RecordingDispatcher::new();
    h.bridge.set_dispatcher(recorder.clone());

    assert_eq!(h.notify(&get_url_event("com.apple.Safari")), CallbackStatus::Handled);
    let dispatches = recorder.take();
    assert_eq!(dispatches.len(), 1);
    assert!(!dispatches[0].expects_reply());

    let json = serde_json::to_value(dispatches[0].record()).unwrap();
    assert_eq!(
        json,
        json!({
            "suite": "core",
            "event": "getd",
            "targetApp": "com.apple.Safari",
            "transactionId": 1,
            "parameters": {
                "----": {
                    "type": "objectSpecifier",
                    "objectClass": "prop",
                    "keyData": "URL ",
                    "keyDataHex": "0x55524c20",
                    "container": {
                        "type": "objectSpecifier",
                        "objectClass": "cTab",
                        "keyForm": "indx",
                        "keyData": 1.0,
                        "humanReadable": "cTab 1"
                    },
                    "humanReadable": "prop URL  of cTab 1"
                }
            }
        })
    );
    let outer = &json["parameters"]["----"];
    assert!(outer.get("keyForm").is_none());
    assert!(outer["container"].get("keyDataHex").is_none());
}

#[test]
fn specifier_inside_named_window() {
    let h = Harness::new(1);
    let recorder = RecordingDispatcher::new();
    h.bridge.set_dispatcher(recorder.clone());

    let tab_of_window = MemoryDescriptor::object_specifier([
        (KEY_DESIRED_CLASS, MemoryDescriptor::type_code(code("cTab"))),
        (KEY_KEY_FORM, MemoryDescriptor::enumerated(code("indx"))),
        (KEY_KEY_DATA, MemoryDescriptor::sint32(1)),
        (KEY_CONTAINER, window_named_specifier("Downloads")),
    ]);
    let event = MockEvent::new(code("core"), code("clos"))
        .with_parameter(KEY_DIRECT_OBJECT, tab_of_window);
    h.notify(&event);

    let dispatches = recorder.take();
    let spec = dispatches[0]
        .record()
        .direct_parameter()
        .and_then(Value::as_specifier)
        .unwrap();
    assert_eq!(spec.human_readable(), Some("cTab 1 of cwin Downloads"));

    let window = spec.container().and_then(Value::as_specifier).unwrap();
    assert_eq!(window.key_form(), Some("name"));
    assert_eq!(window.key_data(), Some(&Value::from("Downloads")));
    assert_eq!(window.human_readable(), Some("cwin Downloads"));
}

#[test]
fn notification_needs_no_reply() {
    let h = Harness::new(4);
    assert_eq!(h.notify(&open_location_event("https://example.com")), CallbackStatus::Handled);
    assert!(h.manager().suspends().is_empty());

    let mut queue = h.queue;
    let dispatch = queue.try_recv().unwrap();
    assert!(!dispatch.expects_reply());
    assert_eq!(
        dispatch.record().direct_parameter(),
        Some(&Value::from("https://example.com"))
    );
}

#[test]
fn open_documents_and_script_parameters() {
    let h = Harness::new(4);
    let recorder = RecordingDispatcher::new();
    h.bridge.set_dispatcher(recorder.clone());

    h.notify(&open_documents_event(&["file:///tmp/a.txt", "file:///tmp/b.txt"]));
    h.notify(&run_javascript_event("document.title"));
    let dispatches = recorder.take();

    let files = dispatches[0].record().direct_parameter().and_then(Value::as_list).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[1].as_str(), Some("file:///tmp/b.txt"));

    let script = dispatches[1].record();
    assert_eq!(
        script.parameter(&KEY_JAVASCRIPT.to_string()),
        Some(&Value::from("document.title"))
    );
    let target = script.direct_parameter().and_then(Value::as_specifier).unwrap();
    assert_eq!(target.human_readable(), Some("cTab 1"));
}

#[test]
fn unknown_types_fall_back_to_text_or_placeholder() {
    let h = Harness::new(4);
    let recorder = RecordingDispatcher::new();
    h.bridge.set_dispatcher(recorder.clone());

    let odd = FourCharCode::from_bytes(*b"xyzw");
    h.notify(&MockEvent::new(code("misc"), code("test")).with_parameter(
        KEY_DIRECT_OBJECT,
        MemoryDescriptor::raw(odd, b"hello".to_vec()),
    ));
    h.notify(&MockEvent::new(code("misc"), code("test")).with_parameter(
        KEY_DIRECT_OBJECT,
        MemoryDescriptor::raw(odd, vec![0xff, 0xfe, 0x00]),
    ));
    h.notify(&MockEvent::new(code("misc"), code("test")).with_parameter(
        KEY_DIRECT_OBJECT,
        MemoryDescriptor::raw(odd, vec![b'a'; 4096]),
    ));

    let values: Vec<Value> = recorder
        .take()
        .iter()
        .map(|d| d.record().direct_parameter().cloned().unwrap())
        .collect();
    assert_eq!(values[0], Value::from("hello"));
    assert_eq!(values[1], Value::from(BINARY_PLACEHOLDER));
    assert_eq!(values[2], Value::from(BINARY_PLACEHOLDER));
}

#[tokio::test]
async fn handler_error_reaches_sender() {
    let h = Harness::new(4);
    let bridge = std::sync::Arc::clone(&h.bridge);
    let mut router = Router::new();
    router
        .on("GURL", "GURL", |_record: EventRecord| async move {
            Err::<Option<serde_json::Value>, _>(HandlerError::failed("scheme not supported"))
        })
        .unwrap();
    let server = tokio::spawn(router.serve(h.queue));

    bridge.handle_event(
        &open_location_event("gopher://example.com"),
        Some(aebridge_test::MockReply::new()),
    );
    bridge.manager().wait_for_resumes(1).await;
    bridge.set_dispatcher(RejectingDispatcher(DispatchError::Closed));
    server.await.unwrap();

    let resumes = bridge.manager().resumes();
    assert_eq!(resumes[0].status, OsStatus::EVENT_FAILED);
    assert_eq!(
        common::error_string(&resumes[0]).as_deref(),
        Some("scheme not supported")
    );
}

#[test]
fn closed_queue_fails_request_immediately() {
    let h = Harness::new(1);
    h.bridge.set_dispatcher(RejectingDispatcher(DispatchError::Closed));

    assert_eq!(h.request(&open_location_event("x")), CallbackStatus::ReplyLater);
    let resumes = h.resumes();
    assert_eq!(resumes.len(), 1);
    assert_eq!(resumes[0].status, OsStatus::EVENT_FAILED);
    assert_eq!(
        common::error_string(&resumes[0]).as_deref(),
        Some("event could not be dispatched: dispatch queue is closed")
    );
}
