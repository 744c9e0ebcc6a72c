use super::*;

fn collector() -> (Rc<RefCell<String>>, impl Fn(&str) + 'static) {
    let out = Rc::new(RefCell::new(String::new()));
    let sink_out = out.clone();
    (out, move |text: &str| sink_out.borrow_mut().push_str(text))
}

fn decode(json: &str) -> Frame {
    frames::decode_frame(json).expect("frame")
}

#[test]
fn ws_url_maps_scheme_and_project_path() {
    assert_eq!(ws_url("http://localhost:8000", "p1").unwrap(), "ws://localhost:8000/ws/p1");
    assert_eq!(ws_url("https://api.example.com/", "p2").unwrap(), "wss://api.example.com/ws/p2");
}

#[test]
fn ws_url_rejects_unknown_scheme() {
    assert!(matches!(ws_url("ftp://host", "p1"), Err(CliError::InvalidBaseUrl(_))));
}

#[test]
fn api_url_joins_without_double_slash() {
    assert_eq!(api_url("http://localhost:8000/", "/api/projects"), "http://localhost:8000/api/projects");
    assert_eq!(next_steps_path("p1"), "/suggestions/p1/next-steps");
}

#[test]
fn error_detail_reads_detail_field() {
    assert_eq!(error_detail(r#"{"detail":"Project not found"}"#).as_deref(), Some("Project not found"));
    assert_eq!(error_detail("plain text"), None);
}

#[test]
fn status_error_falls_back_to_body() {
    let CliError::ServerError { context, message } = status_error(502, " bad gateway ") else {
        panic!("expected server error");
    };
    assert_eq!(context, "HTTP 502");
    assert_eq!(message, "bad gateway");
}

#[test]
fn upload_file_name_uses_last_component() {
    assert_eq!(upload_file_name(Path::new("/tmp/posting.pdf")), "posting.pdf");
}

#[test]
fn skill_dispatcher_concatenates_output_and_records_usage() {
    let (out, sink) = collector();
    let outcome = Rc::new(RefCell::new(None));
    let dispatcher = skill_dispatcher(sink, outcome.clone());

    dispatcher.dispatch(&decode(r#"{"type":"skill_start"}"#));
    dispatcher.dispatch(&decode(r#"{"type":"skill_token","token":"Hello "}"#));
    dispatcher.dispatch(&decode(r#"{"type":"skill_output","content":"world"}"#));
    assert!(outcome.borrow().is_none());
    dispatcher.dispatch(&decode(
        r#"{"type":"skill_complete","usage":{"input_tokens":10,"output_tokens":2}}"#,
    ));

    assert_eq!(*out.borrow(), "Hello world");
    assert_eq!(
        outcome.borrow_mut().take(),
        Some(StreamOutcome::Completed(Some(Usage {
            input_tokens: 10,
            output_tokens: 2,
        })))
    );
}

#[test]
fn skill_dispatcher_records_error() {
    let (_out, sink) = collector();
    let outcome = Rc::new(RefCell::new(None));
    let dispatcher = skill_dispatcher(sink, outcome.clone());

    dispatcher.dispatch(&decode(r#"{"type":"skill_error","error":"boom"}"#));
    assert_eq!(outcome.borrow_mut().take(), Some(StreamOutcome::Failed("boom".to_owned())));
}

#[test]
fn chat_dispatcher_ignores_other_messages() {
    let (out, sink) = collector();
    let outcome = Rc::new(RefCell::new(None));
    let dispatcher = chat_dispatcher(Some("m1".to_owned()), sink, outcome.clone());

    dispatcher.dispatch(&decode(r#"{"type":"chat_token","message_id":"m2","token":"x"}"#));
    dispatcher.dispatch(&decode(r#"{"type":"chat_complete","message_id":"m2"}"#));
    assert!(outcome.borrow().is_none());

    dispatcher.dispatch(&decode(r#"{"type":"chat_token","message_id":"m1","token":"Hi"}"#));
    dispatcher.dispatch(&decode(r#"{"type":"chat_complete","message_id":"m1"}"#));
    assert_eq!(*out.borrow(), "Hi");
    assert_eq!(outcome.borrow_mut().take(), Some(StreamOutcome::Completed(None)));
}

#[test]
fn chat_dispatcher_without_id_accepts_any_message() {
    let (_out, sink) = collector();
    let outcome = Rc::new(RefCell::new(None));
    let dispatcher = chat_dispatcher(None, sink, outcome.clone());

    dispatcher.dispatch(&decode(r#"{"type":"chat_error","message_id":"m9","error":"nope"}"#));
    assert_eq!(outcome.borrow_mut().take(), Some(StreamOutcome::Failed("nope".to_owned())));
}

#[test]
fn report_outcome_maps_failure_to_error() {
    assert!(report_outcome(StreamOutcome::Completed(None)).is_ok());
    assert!(matches!(
        report_outcome(StreamOutcome::Failed("x".to_owned())),
        Err(CliError::StreamFailed(_))
    ));
}

/// Serve `payloads` as text frames to the first websocket client on a local port.
async fn serve_frames(payloads: Vec<&'static str>) -> String {
    use futures_util::SinkExt;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        for payload in payloads {
            ws.send(Message::text(payload)).await.unwrap();
        }
        // Hold the socket open until the client hangs up.
        while ws.next().await.is_some() {}
    });
    format!("ws://{addr}")
}

#[test]
fn decode_or_drop_skips_malformed_frames() {
    assert!(decode_or_drop("not json").is_none());
    assert!(decode_or_drop(r#"{"type":"file_created"}"#).is_none());
    assert!(matches!(
        decode_or_drop(r#"{"type":"skill_token","token":"x"}"#),
        Some(Frame::SkillToken { .. })
    ));
}

#[tokio::test]
async fn skill_stream_survives_malformed_frame() {
    let url = serve_frames(vec![
        "garbage",
        r#"{"type":"connection","status":"connected"}"#,
        r#"{"type":"skill_start"}"#,
        r#"{"type":"skill_token","token":"Hello "}"#,
        r#"{"type":"file_created"}"#,
        r#"{"type":"skill_token","token":"world"}"#,
        r#"{"type":"skill_complete","usage":{"input_tokens":10,"output_tokens":2}}"#,
    ])
    .await;
    let (mut stream, _) = connect_async(url).await.unwrap();
    wait_for_connected(&mut stream).await.unwrap();

    let (out, sink) = collector();
    let outcome = Rc::new(RefCell::new(None));
    let dispatcher = skill_dispatcher(sink, outcome.clone());
    let result = stream_until_done(&mut stream, Duration::from_secs(5), &dispatcher, &outcome)
        .await
        .unwrap();

    assert_eq!(*out.borrow(), "Hello world");
    assert_eq!(
        result,
        StreamOutcome::Completed(Some(Usage {
            input_tokens: 10,
            output_tokens: 2,
        }))
    );
}
