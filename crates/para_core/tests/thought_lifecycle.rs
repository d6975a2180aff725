use chrono::{TimeZone, Utc};
use para_core::{
    CategoryHints, ModelError, ProcessingStatus, Thought, ThoughtId, TransitionError,
};

fn legal(from: ProcessingStatus, to: ProcessingStatus) -> bool {
    use ProcessingStatus::*;
    matches!(
        (from, to),
        (Pending, Processing)
            | (Pending, Skipped)
            | (Processing, Completed)
            | (Processing, Failed)
            | (Failed, Processing)
    )
}

fn thought_in(status: ProcessingStatus) -> Thought {
    Thought::restore(
        ThoughtId::generate(),
        "status probe",
        "body",
        Utc::now(),
        matches!(status, ProcessingStatus::Completed | ProcessingStatus::Skipped),
        status,
        CategoryHints::default(),
    )
    .expect("consistent restore")
}

#[test]
fn new_thought_starts_pending_and_unprocessed() {
    let thought = Thought::new("Ship v1", "finish the launch deadline").unwrap();

    assert_eq!(thought.status(), ProcessingStatus::Pending);
    assert!(!thought.processed());
    assert!(!thought.id().as_uuid().is_nil());
    assert!(!thought.has_user_tags());
}

#[test]
fn new_rejects_blank_title() {
    let err = Thought::new("   ", "body").unwrap_err();
    assert_eq!(err, ModelError::EmptyTitle);
}

#[test]
fn state_machine_is_closed_over_the_transition_table() {
    for from in ProcessingStatus::ALL {
        for to in ProcessingStatus::ALL {
            let thought = thought_in(from);
            match thought.transition(to) {
                Ok(next) => {
                    assert!(legal(from, to), "{from} -> {to} should be rejected");
                    assert_eq!(next.status(), to);
                }
                Err(err) => {
                    assert!(!legal(from, to), "{from} -> {to} should be accepted");
                    assert_eq!(err, TransitionError::Status { from, to });
                    assert_eq!(thought.status(), from);
                }
            }
        }
    }
}

#[test]
fn processed_flag_is_set_exactly_on_completed_and_skipped() {
    let pending = Thought::new("t", "c").unwrap();

    let skipped = pending.mark_skipped().unwrap();
    assert!(skipped.processed());

    let processing = pending.mark_processing().unwrap();
    assert!(!processing.processed());

    let failed = processing.mark_failed().unwrap();
    assert!(!failed.processed());

    let completed = failed
        .mark_processing()
        .unwrap()
        .mark_completed()
        .unwrap();
    assert!(completed.processed());
}

#[test]
fn reset_for_retry_only_from_failed() {
    let failed = thought_in(ProcessingStatus::Failed);
    let rearmed = failed.reset_for_retry().unwrap();
    assert_eq!(rearmed.status(), ProcessingStatus::Pending);
    assert!(!rearmed.processed());
    assert_eq!(rearmed.id(), failed.id());

    let completed = thought_in(ProcessingStatus::Completed);
    let err = completed.reset_for_retry().unwrap_err();
    assert_eq!(
        err,
        TransitionError::Status {
            from: ProcessingStatus::Completed,
            to: ProcessingStatus::Pending,
        }
    );
}

#[test]
fn restore_rejects_inconsistent_processed_flag() {
    let err = Thought::restore(
        ThoughtId::generate(),
        "title",
        "body",
        Utc::now(),
        true,
        ProcessingStatus::Failed,
        CategoryHints::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ModelError::InconsistentProcessedFlag {
            status: ProcessingStatus::Failed,
            processed: true,
        }
    );
}

#[test]
fn content_preview_truncates_for_display_only() {
    let body = "word ".repeat(100);
    let thought = Thought::new("long", body.as_str()).unwrap();

    let preview = thought.content_preview(20);
    assert_eq!(preview.chars().count(), 20);
    assert!(preview.ends_with("..."));
    assert_eq!(thought.content().as_str(), body);
}

#[test]
fn accessors_expose_captured_text_and_hints() {
    let thought = Thought::with_hints(
        "Gym",
        "stay fit",
        CategoryHints::new(Some("q3".to_string()), Some("health".to_string())),
    )
    .unwrap();

    assert_eq!(thought.title(), "Gym");
    assert_eq!(thought.content().as_str(), "stay fit");
    assert_eq!(thought.project_tag(), Some("q3"));
    assert_eq!(thought.area_tag(), Some("health"));
    assert!(thought.has_user_tags());

    let next = thought.mark_processing().unwrap();
    assert_eq!(next.title(), thought.title());
    assert_eq!(next.area_tag(), thought.area_tag());
}

#[test]
fn thought_serialization_uses_expected_wire_fields() {
    let id: ThoughtId = "11111111-2222-4333-8444-555555555555".parse().unwrap();
    let created_at = Utc.with_ymd_and_hms(2026, 2, 13, 10, 0, 0).unwrap();
    let thought = Thought::restore(
        id,
        "Gym",
        "stay fit",
        created_at,
        false,
        ProcessingStatus::Pending,
        CategoryHints::new(None, Some("health".to_string())),
    )
    .unwrap();

    let json = serde_json::to_value(&thought).unwrap();
    assert_eq!(json["id"], "11111111-2222-4333-8444-555555555555");
    assert_eq!(json["title"], "Gym");
    assert_eq!(json["content"], "stay fit");
    assert_eq!(json["processing_status"], "pending");
    assert_eq!(json["processed"], false);
    assert_eq!(json["area_tag"], "health");
    assert!(json["project_tag"].is_null());

    let decoded: Thought = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, thought);
}

#[test]
fn deserialize_rejects_blank_title() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "title": "  ",
        "content": "body",
        "created_at": "2026-02-13T10:00:00Z",
        "processed": false,
        "processing_status": "pending"
    });

    let err = serde_json::from_value::<Thought>(value).unwrap_err();
    assert!(
        err.to_string().contains("title cannot be empty"),
        "unexpected error: {err}"
    );
}
