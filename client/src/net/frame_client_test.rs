use super::*;
use std::cell::RefCell;
use std::rc::Rc;

// =============================================================
// ws_url
// =============================================================

#[test]
fn ws_url_maps_http_schemes() {
    assert_eq!(ws_url("http://localhost:8000", "p1"), "ws://localhost:8000/ws/p1");
    assert_eq!(ws_url("https://api.example.com/", "p1"), "wss://api.example.com/ws/p1");
}

#[test]
fn ws_url_keeps_path_prefix_and_ws_schemes() {
    assert_eq!(ws_url("https://example.com/backend", "p1"), "wss://example.com/backend/ws/p1");
    assert_eq!(ws_url("wss://example.com", "p1"), "wss://example.com/ws/p1");
}

#[test]
fn ws_url_defaults_bare_host_to_ws() {
    assert_eq!(ws_url("localhost:8000", "p1"), "ws://localhost:8000/ws/p1");
}

// =============================================================
// Subscriptions
// =============================================================

#[test]
fn deliver_text_routes_to_subscribed_kind() {
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&seen);
    let id = subscribe(&FrameKind::SKILL, move |frame| {
        if let Some(text) = frame.text_delta() {
            sink.borrow_mut().push(text.to_owned());
        }
    });

    assert_eq!(deliver_text(r#"{"type":"skill_token","token":"Hello "}"#).expect("frame"), 1);
    assert_eq!(deliver_text(r#"{"type":"skill_output","content":"world"}"#).expect("frame"), 1);
    assert_eq!(
        deliver_text(r#"{"type":"chat_token","message_id":"m1","token":"x"}"#).expect("frame"),
        0
    );

    assert!(unsubscribe(id));
    assert_eq!(deliver_text(r#"{"type":"skill_token","token":"late"}"#).expect("frame"), 0);
    assert_eq!(*seen.borrow(), vec!["Hello ".to_owned(), "world".to_owned()]);
}

#[test]
fn unhandled_frames_reach_fallback() {
    let tags = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&tags);
    let id = subscribe_unhandled(move |frame| sink.borrow_mut().push(frame.type_tag().to_owned()));

    deliver_text(r#"{"type":"file_created","filename":"01-job-analysis.md"}"#).expect("frame");
    deliver_text(r#"{"type":"progress","percent":10}"#).expect("frame");

    assert!(unsubscribe(id));
    assert_eq!(*tags.borrow(), vec!["file_created".to_owned(), "progress".to_owned()]);
}

#[test]
fn deliver_text_reports_decode_errors() {
    assert!(deliver_text("{not json").is_err());
    assert!(deliver_text(r#"{"no_type":true}"#).is_err());
}

// =============================================================
// DeliveryGate
// =============================================================

#[test]
fn closed_gate_drops_buffered_frames() {
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&seen);
    let id = subscribe(&[FrameKind::SkillToken], move |frame| {
        if let Some(text) = frame.text_delta() {
            sink.borrow_mut().push(text.to_owned());
        }
    });

    let old_socket = DeliveryGate::default();
    let new_socket = DeliveryGate::default();
    assert_eq!(
        old_socket.deliver_text(r#"{"type":"skill_token","token":"A1"}"#).expect("frame"),
        Some(1)
    );

    old_socket.close();
    assert!(!old_socket.is_open());
    assert_eq!(
        old_socket.deliver_text(r#"{"type":"skill_token","token":"A2"}"#).expect("frame"),
        None
    );
    assert_eq!(
        new_socket.deliver_text(r#"{"type":"skill_token","token":"B1"}"#).expect("frame"),
        Some(1)
    );

    assert!(unsubscribe(id));
    assert_eq!(*seen.borrow(), vec!["A1".to_owned(), "B1".to_owned()]);
}

#[test]
fn gate_clones_share_state() {
    let gate = DeliveryGate::default();
    let held_by_socket = gate.clone();
    gate.close();
    assert!(!held_by_socket.is_open());
    assert_eq!(held_by_socket.deliver_text("{not json").expect("closed gate skips decode"), None);
}
