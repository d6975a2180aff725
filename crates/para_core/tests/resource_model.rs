use chrono::{Duration, Utc};
use para_core::{
    ModelError, NewResource, ParaCategory, Resource, ResourceId, ResourceTags, ThoughtId,
    TransitionError,
};

fn resource(category: ParaCategory) -> Resource {
    Resource::create(NewResource::new("Reading list", "articles to read", category)).unwrap()
}

#[test]
fn create_sets_matching_timestamps_and_no_source() {
    let created = resource(ParaCategory::Resource);

    assert_eq!(created.created_at(), created.updated_at());
    assert!(!created.has_source_thought());
    assert!(created.deadline().is_none());
    assert!(created.tags().is_empty());
    assert!(created.is_active());
}

#[test]
fn create_rejects_blank_title() {
    let err = Resource::create(NewResource::new(" ", "body", ParaCategory::Area)).unwrap_err();
    assert_eq!(err, ModelError::EmptyTitle);
}

#[test]
fn archive_with_future_deadline_is_rejected() {
    let mut input = NewResource::new("Old launch", "done", ParaCategory::Archive);
    input.deadline = Some(Utc::now() + Duration::days(7));
    let err = Resource::create(input).unwrap_err();
    assert_eq!(err, ModelError::ArchivedWithFutureDeadline);

    let archived = resource(ParaCategory::Archive);
    let err = archived
        .with_deadline(Some(Utc::now() + Duration::days(1)))
        .unwrap_err();
    assert_eq!(err, ModelError::ArchivedWithFutureDeadline);
}

#[test]
fn archive_with_past_deadline_is_accepted() {
    let mut input = NewResource::new("Old launch", "done", ParaCategory::Archive);
    input.deadline = Some(Utc::now() - Duration::days(7));
    let archived = Resource::create(input).unwrap();
    assert!(archived.is_overdue());
    assert!(!archived.is_active());

    let updated = resource(ParaCategory::Archive)
        .with_deadline(Some(Utc::now() - Duration::hours(1)))
        .unwrap();
    assert!(updated.deadline().is_some());
}

#[test]
fn archiving_a_project_with_pending_deadline_fails() {
    let mut input = NewResource::new("Launch", "ship it", ParaCategory::Project);
    input.deadline = Some(Utc::now() + Duration::days(3));
    let project = Resource::create(input).unwrap();

    let err = project.archive().unwrap_err();
    assert_eq!(err, ModelError::ArchivedWithFutureDeadline);

    let archived = project.with_deadline(None).unwrap().archive().unwrap();
    assert_eq!(archived.category(), ParaCategory::Archive);
}

#[test]
fn category_changes_follow_transition_table() {
    let area = resource(ParaCategory::Area);
    let err = area.with_category(ParaCategory::Project).unwrap_err();
    assert_eq!(
        err,
        ModelError::Transition(TransitionError::Category {
            from: ParaCategory::Area,
            to: ParaCategory::Project,
        })
    );

    let archived = area.archive().unwrap();
    let reactivated = archived.with_category(ParaCategory::Resource).unwrap();
    assert_eq!(reactivated.category(), ParaCategory::Resource);
    assert_eq!(reactivated.id(), area.id());

    archived
        .archive()
        .expect_err("archive -> archive is not a legal transition");
}

#[test]
fn edits_return_new_instances_with_refreshed_updated_at() {
    let original = resource(ParaCategory::Resource);

    let edited = original.with_content("new body").unwrap();
    assert_eq!(edited.content().as_str(), "new body");
    assert_eq!(original.content().as_str(), "articles to read");
    assert!(edited.updated_at() >= original.updated_at());
    assert_eq!(edited.created_at(), original.created_at());

    let tagged = edited.with_tag(" Reading ").unwrap();
    assert!(tagged.tags().contains("reading"));
    let untagged = tagged.without_tag("READING").unwrap();
    assert!(untagged.tags().is_empty());

    let retagged = untagged.with_tags(["a", "b", "A"]).unwrap();
    assert_eq!(retagged.tags().to_vec(), vec!["a", "b"]);

    untagged
        .with_tag("not valid")
        .expect_err("invalid tag must be rejected");
}

#[test]
fn days_until_deadline_floors_and_goes_negative() {
    let mut input = NewResource::new("Launch", "ship it", ParaCategory::Project);
    input.deadline = Some(Utc::now() + Duration::days(3) + Duration::hours(1));
    let project = Resource::create(input).unwrap();
    assert_eq!(project.days_until_deadline(), Some(3));
    assert!(!project.is_overdue());

    let overdue = project
        .with_deadline(Some(Utc::now() - Duration::hours(12)))
        .unwrap();
    assert_eq!(overdue.days_until_deadline(), Some(-1));
    assert!(overdue.is_overdue());

    assert_eq!(resource(ParaCategory::Area).days_until_deadline(), None);
}

#[test]
fn restore_rejects_updated_before_created() {
    let now = Utc::now();
    let err = Resource::restore(
        ResourceId::generate(),
        "title",
        "body",
        ParaCategory::Area,
        ResourceTags::empty(),
        Some(ThoughtId::generate()),
        now,
        now - Duration::seconds(1),
        None,
    )
    .unwrap_err();
    assert_eq!(err, ModelError::UpdatedBeforeCreated);
}

#[test]
fn serialization_roundtrips_and_deserialize_validates() {
    let mut input = NewResource::new("Launch", "ship it", ParaCategory::Project);
    input.tags = ResourceTags::create(["work", "q3"]).unwrap();
    input.source_thought = Some(ThoughtId::generate());
    let project = Resource::create(input).unwrap();

    let json = serde_json::to_value(&project).unwrap();
    assert_eq!(json["category"], "project");
    assert_eq!(json["tags"], serde_json::json!(["q3", "work"]));
    let decoded: Resource = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(decoded, project);

    let mut archived = json;
    archived["category"] = serde_json::json!("archive");
    archived["deadline"] = serde_json::json!((Utc::now() + Duration::days(30)).to_rfc3339());
    let err = serde_json::from_value::<Resource>(archived).unwrap_err();
    assert!(
        err.to_string().contains("future deadlines"),
        "unexpected error: {err}"
    );
}
