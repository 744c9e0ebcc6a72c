use super::*;

// =============================================================
// Project
// =============================================================

#[test]
fn project_decodes_backend_state_and_ignores_extra_fields() {
    let json = serde_json::json!({
        "project_id": "acme-engineer-2024-01-01",
        "institution": "Acme",
        "position": "Engineer",
        "created_at": "2024-01-01T09:00:00",
        "updated_at": "2024-01-02T10:30:00",
        "current_stage": "created",
        "current_versions": {},
        "history": [],
        "notes": ""
    });
    let project: Project = serde_json::from_value(json).expect("project");
    assert_eq!(project.project_id, "acme-engineer-2024-01-01");
    assert_eq!(project.current_stage, "created");
    assert_eq!(project.updated_at, "2024-01-02T10:30:00");
    assert_eq!(project.title(), "Acme - Engineer");
}

#[test]
fn project_tolerates_missing_optional_fields() {
    let json = serde_json::json!({
        "project_id": "p1",
        "institution": "Acme",
        "position": "Engineer"
    });
    let project: Project = serde_json::from_value(json).expect("project");
    assert_eq!(project.current_stage, "");
    assert_eq!(project.created_at, None);
}

#[test]
fn chat_context_copies_project_fields() {
    let project = Project {
        project_id: "p1".to_owned(),
        institution: "Acme".to_owned(),
        position: "Engineer".to_owned(),
        current_stage: "analysis".to_owned(),
        updated_at: String::new(),
        created_at: None,
        notes: None,
    };
    let ctx = ChatContext::from(&project);
    assert_eq!(ctx.institution, "Acme");
    assert_eq!(ctx.position, "Engineer");
    assert_eq!(ctx.stage, "analysis");
}

// =============================================================
// Suggestions
// =============================================================

#[test]
fn suggestions_response_decodes_type_badge_and_priority() {
    let json = serde_json::json!({
        "suggestions": [
            {
                "type": "critical",
                "title": "Upload Job Description",
                "description": "Start by uploading the job posting to analyze",
                "action": "upload_file",
                "priority": 1
            },
            { "type": "shiny", "title": "Review Documents", "action": "review" }
        ]
    });
    let resp: SuggestionsResponse = serde_json::from_value(json).expect("suggestions");
    assert_eq!(resp.suggestions.len(), 2);
    assert_eq!(resp.suggestions[0].kind, SuggestionType::Critical);
    assert_eq!(resp.suggestions[0].priority, Some(1));
    assert_eq!(resp.suggestions[1].kind, SuggestionType::Optional);
    assert_eq!(resp.suggestions[1].priority, None);
    assert_eq!(resp.suggestions[1].description, "");
}

#[test]
fn suggestions_response_defaults_to_empty() {
    let resp: SuggestionsResponse = serde_json::from_str("{}").expect("suggestions");
    assert!(resp.suggestions.is_empty());
}

// =============================================================
// Requests
// =============================================================

#[test]
fn skill_invoke_request_serializes_all_fields() {
    let req = SkillInvokeRequest {
        project_id: "p1".to_owned(),
        skill_name: "job-description-analysis".to_owned(),
        prompt: "Analyze".to_owned(),
        stream: true,
        use_api: false,
    };
    let value = serde_json::to_value(&req).expect("json");
    assert_eq!(
        value,
        serde_json::json!({
            "project_id": "p1",
            "skill_name": "job-description-analysis",
            "prompt": "Analyze",
            "stream": true,
            "use_api": false
        })
    );
}

#[test]
fn chat_message_request_nests_context() {
    let req = ChatMessageRequest {
        project_id: "p1".to_owned(),
        message: "hi".to_owned(),
        context: ChatContext {
            institution: "Acme".to_owned(),
            position: "Engineer".to_owned(),
            stage: "created".to_owned(),
        },
    };
    let value = serde_json::to_value(&req).expect("json");
    assert_eq!(value["context"]["stage"], "created");
    assert_eq!(value["message"], "hi");
}

// =============================================================
// Acks
// =============================================================

#[test]
fn chat_ack_decodes_intent() {
    let json = serde_json::json!({
        "message_id": "m1",
        "intent": { "skill": "conversational", "confidence": 0.4 },
        "response_type": "conversational",
        "streaming": true
    });
    let ack: ChatAck = serde_json::from_value(json).expect("ack");
    assert_eq!(ack.message_id, "m1");
    assert!(ack.streaming);
    assert!(!ack.intent.expect("intent").runs_skill());
}

#[test]
fn history_response_decodes_empty_and_populated() {
    let empty: HistoryResponse = serde_json::from_str(r#"{"messages":[]}"#).expect("history");
    assert!(empty.messages.is_empty());

    let full: HistoryResponse =
        serde_json::from_str(r#"{"messages":[{"role":"user","content":"hi"}]}"#).expect("history");
    assert_eq!(full.messages[0].role, "user");
    assert_eq!(full.messages[0].id, None);
}

#[test]
fn health_status_accepts_healthy_and_ok() {
    let healthy: HealthStatus = serde_json::from_str(r#"{"status":"healthy"}"#).expect("health");
    assert!(healthy.is_healthy());
    let ok = HealthStatus { status: "ok".to_owned() };
    assert!(ok.is_healthy());
    assert!(!HealthStatus::default().is_healthy());
}

#[test]
fn upload_ack_decodes_size() {
    let ack: UploadAck =
        serde_json::from_str(r#"{"filename":"job.pdf","path":"apps/p1/job.pdf","size":42}"#).expect("ack");
    assert_eq!(ack.filename, "job.pdf");
    assert_eq!(ack.size, Some(42));
}
