use super::*;

fn skill_token(text: &str) -> Frame {
    Frame::SkillToken { token: text.to_owned() }
}

#[test]
fn streamed_run_accumulates_output_and_usage() {
    let mut state = SkillState::default();
    state.apply_frame(&Frame::SkillStart { skill_name: None });
    state.apply_frame(&skill_token("Hello "));
    state.apply_frame(&skill_token("world"));
    state.apply_frame(&Frame::SkillComplete {
        usage: Some(Usage {
            input_tokens: 10,
            output_tokens: 2,
        }),
    });

    assert_eq!(state.content, "Hello world");
    assert_eq!(state.usage_label().as_deref(), Some("10 in / 2 out"));
    assert!(!state.processing);
}

#[test]
fn skill_output_appends_to_same_buffer() {
    let mut state = SkillState::default();
    state.apply_frame(&Frame::SkillStart { skill_name: None });
    state.apply_frame(&skill_token("a"));
    state.apply_frame(&Frame::SkillOutput { output: "b".to_owned() });
    assert_eq!(state.content, "ab");
}

#[test]
fn start_resets_previous_run() {
    let mut state = SkillState::default();
    state.apply_frame(&skill_token("old"));
    state.apply_frame(&Frame::SkillError { error: "boom".to_owned() });
    state.usage = Some(Usage::default());

    state.apply_frame(&Frame::SkillStart {
        skill_name: Some("resume-alignment".to_owned()),
    });

    assert_eq!(state.content, "");
    assert_eq!(state.usage, None);
    assert_eq!(state.error, None);
    assert!(state.processing);
    assert_eq!(state.running.as_deref(), Some("resume-alignment"));
}

#[test]
fn complete_without_usage_keeps_none() {
    let mut state = SkillState::default();
    state.apply_frame(&Frame::SkillStart { skill_name: None });
    state.apply_frame(&Frame::SkillComplete { usage: None });
    assert_eq!(state.usage_label(), None);
    assert!(!state.processing);
}

#[test]
fn error_exits_processing_and_keeps_message() {
    let mut state = SkillState::default();
    state.begin_invoke();
    state.apply_frame(&Frame::SkillError {
        error: "skill not found".to_owned(),
    });
    assert!(!state.processing);
    assert_eq!(state.error.as_deref(), Some("skill not found"));
}

#[test]
fn chat_frames_are_not_consumed() {
    let mut state = SkillState::default();
    let frame = Frame::ChatToken {
        message_id: "m1".to_owned(),
        token: "x".to_owned(),
    };
    assert!(!state.apply_frame(&frame));
    assert_eq!(state.content, "");
}

#[test]
fn request_carries_selection_and_flags() {
    let mut state = SkillState::default();
    state.use_api = true;
    let req = state.request("p1").expect("request");
    assert_eq!(req.project_id, "p1");
    assert_eq!(req.skill_name, "job-description-analysis");
    assert!(req.stream);
    assert!(req.use_api);
}

#[test]
fn request_refused_while_processing_or_blank() {
    let mut state = SkillState::default();
    state.begin_invoke();
    assert_eq!(state.request("p1"), None);

    let mut blank = SkillState::default();
    blank.prompt = "  ".to_owned();
    assert_eq!(blank.request("p1"), None);
}

#[test]
fn invoke_failure_clears_processing() {
    let mut state = SkillState::default();
    state.begin_invoke();
    state.invoke_failed("request failed with status 404: Project not found");
    assert!(!state.processing);
    assert!(state.error.is_some());
}

#[test]
fn select_switches_prompt_to_preset_default() {
    let mut state = SkillState::default();
    state.select("cover-letter-voice");
    assert_eq!(state.skill_name, "cover-letter-voice");
    assert_eq!(state.prompt, SKILLS[2].default_prompt);

    state.prompt = "custom".to_owned();
    state.select("custom-skill");
    assert_eq!(state.prompt, "custom");
}
