use super::*;

#[test]
fn trigger_label_names_selected_skill() {
    let mut skill = SkillState::default();
    assert_eq!(trigger_label(&skill), "Analyze Job Posting");
    skill.select("cover-letter-voice");
    assert_eq!(trigger_label(&skill), "Draft Cover Letter");
}

#[test]
fn trigger_label_shows_progress_while_processing() {
    let mut skill = SkillState::default();
    skill.begin_invoke();
    assert_eq!(trigger_label(&skill), "Analyzing...");
}

#[test]
fn trigger_label_handles_unknown_skill() {
    let mut skill = SkillState::default();
    skill.select("custom-skill");
    assert_eq!(trigger_label(&skill), "Run Skill");
}

#[test]
fn format_ack_pretty_prints_object() {
    let ack = serde_json::json!({ "status": "started" });
    assert_eq!(format_ack(&ack), "{\n  \"status\": \"started\"\n}");
}
