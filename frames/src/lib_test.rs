use super::*;

#[test]
fn decode_chat_token_frame() {
    let frame = decode_frame(r#"{"type":"chat_token","message_id":"m1","token":"Hel"}"#).expect("decode");
    assert_eq!(
        frame,
        Frame::ChatToken {
            message_id: "m1".to_owned(),
            token: "Hel".to_owned(),
        }
    );
    assert_eq!(frame.kind(), FrameKind::ChatToken);
    assert_eq!(frame.message_id(), Some("m1"));
    assert_eq!(frame.text_delta(), Some("Hel"));
}

#[test]
fn decode_chat_start_with_intent_ignores_extra_fields() {
    let frame = decode_frame(
        r#"{"type":"chat_start","message_id":"m1","project_id":"p1",
            "intent":{"skill":"resume-alignment","confidence":0.9,"reasoning":"asked"}}"#,
    )
    .expect("decode");
    let Frame::ChatStart { message_id, intent } = frame else {
        panic!("expected chat_start");
    };
    assert_eq!(message_id, "m1");
    let intent = intent.expect("intent");
    assert_eq!(intent.skill, "resume-alignment");
    assert_eq!(intent.confidence, Some(0.9));
    assert!(intent.runs_skill());
}

#[test]
fn conversational_intent_does_not_run_skill() {
    let intent = Intent {
        skill: Intent::CONVERSATIONAL.to_owned(),
        ..Intent::default()
    };
    assert!(!intent.runs_skill());
    assert!(!Intent::default().runs_skill());
}

#[test]
fn decode_chat_start_with_null_intent_skill() {
    let frame = decode_frame(r#"{"type":"chat_start","message_id":"m1","intent":{"skill":null,"confidence":0.4}}"#)
        .expect("decode");
    let Frame::ChatStart { intent: Some(intent), .. } = &frame else {
        panic!("expected chat_start with intent");
    };
    assert_eq!(intent.skill, "");
    assert!(!intent.runs_skill());
}

#[test]
fn decode_chat_complete_with_null_usage() {
    let frame = decode_frame(
        r#"{"type":"chat_complete","message_id":"m1","usage":null,"result":{"type":"conversational"}}"#,
    )
    .expect("decode");
    let Frame::ChatComplete { usage, result, .. } = &frame else {
        panic!("expected chat_complete");
    };
    assert_eq!(*usage, None);
    assert!(result.is_some());
    assert!(frame.is_terminal());
}

#[test]
fn decode_chat_error_defaults_missing_error_text() {
    let frame = decode_frame(r#"{"type":"chat_error","message_id":"m1"}"#).expect("decode");
    assert_eq!(
        frame,
        Frame::ChatError {
            message_id: "m1".to_owned(),
            error: "unknown error".to_owned(),
        }
    );
}

#[test]
fn decode_skill_complete_usage() {
    let frame =
        decode_frame(r#"{"type":"skill_complete","usage":{"input_tokens":10,"output_tokens":2}}"#).expect("decode");
    assert_eq!(
        frame,
        Frame::SkillComplete {
            usage: Some(Usage {
                input_tokens: 10,
                output_tokens: 2,
            }),
        }
    );
}

#[test]
fn skill_output_accepts_content_alias() {
    let frame = decode_frame(r#"{"type":"skill_output","content":"chunk"}"#).expect("decode");
    assert_eq!(frame.text_delta(), Some("chunk"));
    assert_eq!(frame.kind(), FrameKind::SkillOutput);
}

#[test]
fn skill_token_accepts_text_alias() {
    let frame = decode_frame(r#"{"type":"skill_token","text":"abc"}"#).expect("decode");
    assert_eq!(frame, Frame::SkillToken { token: "abc".to_owned() });
}

#[test]
fn decode_pong_and_connection() {
    assert_eq!(decode_frame(r#"{"type":"pong"}"#).expect("decode"), Frame::Pong);
    let frame = decode_frame(r#"{"type":"connection","status":"connected","project_id":"p1"}"#).expect("decode");
    assert_eq!(
        frame,
        Frame::Connection {
            status: "connected".to_owned(),
            project_id: Some("p1".to_owned()),
        }
    );
}

#[test]
fn decode_file_created() {
    let frame = decode_frame(
        r#"{"type":"file_created","project_id":"p1","filename":"01-job-analysis.md","path":"01-job-analysis.md","extension":".md"}"#,
    )
    .expect("decode");
    assert_eq!(frame.kind(), FrameKind::FileCreated);
    assert!(!frame.is_terminal());
    assert_eq!(frame.text_delta(), None);
}

#[test]
fn unknown_type_decodes_to_unknown_with_payload() {
    let frame = decode_frame(r#"{"type":"progress","percent":40}"#).expect("decode");
    let Frame::Unknown { kind, data } = &frame else {
        panic!("expected unknown");
    };
    assert_eq!(kind, "progress");
    assert_eq!(data["percent"], 40);
    assert_eq!(frame.kind(), FrameKind::Unknown);
    assert_eq!(frame.type_tag(), "progress");
}

#[test]
fn decode_rejects_non_json() {
    let err = decode_frame("not json").expect_err("should fail");
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn decode_rejects_missing_type() {
    let err = decode_frame(r#"{"message_id":"m1"}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::MissingType));
    let err = decode_frame(r#"{"type":7}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::MissingType));
}

#[test]
fn decode_rejects_known_type_with_wrong_shape() {
    let err = decode_frame(r#"{"type":"chat_token","message_id":"m1"}"#).expect_err("should fail");
    match err {
        CodecError::Payload { kind, .. } => assert_eq!(kind, "chat_token"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn encode_frame_writes_snake_case_type_tag() {
    let text = encode_frame(&Frame::SkillStart {
        skill_name: Some("job-description-analysis".to_owned()),
    });
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value["type"], "skill_start");
    assert_eq!(value["skill_name"], "job-description-analysis");
}

#[test]
fn encode_unknown_frame_keeps_original_tag() {
    let frame = decode_frame(r#"{"type":"progress","percent":40}"#).expect("decode");
    let text = encode_frame(&frame);
    let again = decode_frame(&text).expect("decode again");
    assert_eq!(again, frame);
}

#[test]
fn frame_kind_tags_parse_back() {
    for kind in FrameKind::CHAT.into_iter().chain(FrameKind::SKILL) {
        assert_eq!(FrameKind::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(FrameKind::parse(FrameKind::FileCreated.as_str()), Some(FrameKind::FileCreated));
    assert_eq!(FrameKind::parse("unknown"), None);
}

#[test]
fn usage_label_formats_counts() {
    let usage = Usage {
        input_tokens: 10,
        output_tokens: 2,
    };
    assert_eq!(usage.label(), "10 in / 2 out");
}
