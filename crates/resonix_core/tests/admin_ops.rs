use chrono::NaiveDate;
use resonix_core::{
    open_store, AdminService, BlogPost, Event, GalleryItem, Member, NewsArticle, Project,
    ProjectStatus, ServiceError, Topic,
};
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn service_with(events: Value, projects: Value) -> (TempDir, AdminService) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("events.json"), events.to_string()).unwrap();
    fs::write(dir.path().join("projects.json"), projects.to_string()).unwrap();
    let store = Arc::new(open_store(dir.path()).unwrap());
    (dir, AdminService::new(store))
}

fn empty_service() -> (TempDir, AdminService) {
    service_with(json!([]), json!([]))
}

#[test]
fn stats_count_upcoming_active_events_and_published_projects() {
    let (_dir, service) = service_with(
        json!([
            {"id": 1, "title": "Past", "date": "2025-01-01", "type": "workshop"},
            {"id": 2, "title": "Today", "date": "2025-06-10", "type": "seminar"},
            {"id": 3, "title": "Cancelled", "date": "2025-07-01", "type": "seminar", "status": "cancelled"},
            {"id": 4, "title": "Later", "date": "2025-08-01", "type": "competition"}
        ]),
        json!([
            {"id": 1, "title": "A", "category": "iot", "description": "d", "status": "published"},
            {"id": 2, "title": "B", "category": "iot", "description": "d"}
        ]),
    );
    let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

    let stats = service.stats(today).unwrap();
    assert_eq!(stats.total_events, 4);
    assert_eq!(stats.active_events, 2);
    assert_eq!(stats.total_projects, 2);
    assert_eq!(stats.published_projects, 1);
    assert_eq!(stats.total_members, 0);
    assert_eq!(stats.total_messages, 0);
}

#[test]
fn admin_events_always_carry_registration_count() {
    let (_dir, service) = service_with(
        json!([
            {"id": 1, "title": "A", "date": "2025-01-01", "type": "workshop", "registration_count": 17},
            {"id": 2, "title": "B", "date": "2025-01-02", "type": "workshop"}
        ]),
        json!([]),
    );
    let counts: Vec<Option<u32>> = service
        .list_events()
        .unwrap()
        .iter()
        .map(|event| event.registration_count)
        .collect();
    assert_eq!(counts, vec![Some(17), Some(0)]);
}

#[test]
fn create_ignores_client_id_and_logs_activity() {
    let (_dir, service) = empty_service();
    let event: Event = service
        .create(
            json!({
                "id": 77,
                "title": "IoT with Arduino",
                "date": "2025-09-01",
                "type": "workshop",
                "location": "Lab 2"
            }),
            "admin",
        )
        .unwrap();
    assert_eq!(event.id, 1);

    let activities = service.recent_activities();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].kind, "event");
    assert_eq!(activities[0].action, "create");
    assert_eq!(activities[0].user, "admin");
}

#[test]
fn create_reports_validation_and_shape_errors() {
    let (_dir, service) = empty_service();

    let err = service
        .create::<Event>(json!({"title": "", "date": "soon"}), "admin")
        .unwrap_err();
    match err {
        ServiceError::Validation(err) => assert_eq!(
            err.messages,
            vec![
                "Event title is required".to_string(),
                "Invalid event date format".to_string(),
                "Event type is required".to_string(),
            ]
        ),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(matches!(
        service.create::<GalleryItem>(json!({"category": "events"}), "admin"),
        Err(ServiceError::InvalidInput(_))
    ));
    assert!(matches!(
        service.create::<Member>(json!("not an object"), "admin"),
        Err(ServiceError::InvalidInput(_))
    ));
    assert!(service.recent_activities().is_empty());
}

#[test]
fn update_replaces_by_id() {
    let (_dir, service) = empty_service();
    let created: NewsArticle = service
        .create(
            json!({"title": "Draft title", "date": "2025-02-01", "type": "announcement"}),
            "admin",
        )
        .unwrap();

    let updated: NewsArticle = service
        .update(
            Some(created.id),
            json!({"title": "Final title", "date": "2025-02-02", "type": "announcement"}),
            "moderator",
        )
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Final title");
    assert_eq!(service.list_all::<NewsArticle>().unwrap().len(), 1);

    assert!(matches!(
        service.update::<NewsArticle>(None, json!({}), "admin"),
        Err(ServiceError::InvalidId(Topic::News))
    ));
    assert!(matches!(
        service.update::<NewsArticle>(
            Some(42),
            json!({"title": "x", "date": "2025-01-01"}),
            "admin"
        ),
        Err(ServiceError::NotFound { label: "News article" })
    ));
}

#[test]
fn delete_checks_id_then_existence() {
    let (_dir, service) = empty_service();
    let post: BlogPost = service
        .create(
            json!({"title": "Soldering 101", "date": "2025-02-02", "author": "Jane"}),
            "admin",
        )
        .unwrap();

    assert!(matches!(
        service.delete::<BlogPost>(Some(0), "admin"),
        Err(ServiceError::InvalidId(Topic::Blog))
    ));
    assert!(matches!(
        service.delete::<BlogPost>(Some(post.id + 1), "admin"),
        Err(ServiceError::NotFound { label: "Blog post" })
    ));

    let removed = service.delete::<BlogPost>(Some(post.id), "admin").unwrap();
    assert_eq!(removed.title, "Soldering 101");
    assert!(service.list_all::<BlogPost>().unwrap().is_empty());

    let newest = &service.recent_activities()[0];
    assert_eq!(newest.action, "delete");
    assert_eq!(newest.kind, "blog");
}

#[test]
fn approve_project_publishes_it() {
    let (_dir, service) = service_with(
        json!([]),
        json!([{"id": 5, "title": "Rover", "category": "robotics", "description": "d", "status": "pending"}]),
    );
    let approved = service.approve_project(Some(5), "admin").unwrap();
    assert_eq!(approved.status, ProjectStatus::Published);

    let stored = service.list_all::<Project>().unwrap();
    assert!(stored[0].is_published());
    assert!(matches!(
        service.approve_project(Some(6), "admin"),
        Err(ServiceError::NotFound { label: "Project" })
    ));
}

#[test]
fn save_settings_merges_and_rejects_empty_input() {
    let (dir, service) = empty_service();
    fs::write(
        dir.path().join("settings.json"),
        r#"{"site_title": "Resonix", "contact_email": "old@uni.edu"}"#,
    )
    .unwrap();

    let merged = service
        .save_settings("contact", json!({"contact_email": "info@uni.edu"}), "admin")
        .unwrap();
    assert_eq!(merged.get("site_title"), Some(&json!("Resonix")));
    assert_eq!(merged.get("contact_email"), Some(&json!("info@uni.edu")));

    for (kind, settings) in [("", json!({"a": 1})), ("general", json!({})), ("general", json!([1]))] {
        let err = service.save_settings(kind, settings, "admin").unwrap_err();
        assert_eq!(err.to_string(), "Invalid settings data");
    }
}

#[test]
fn stats_treat_unlisted_event_status_as_inactive() {
    let (_dir, service) = service_with(
        json!([
            {"id": 1, "title": "A", "date": "2099-01-01", "type": "workshop", "status": "upcoming"},
            {"id": 2, "title": "B", "date": "2099-01-02", "type": "workshop"}
        ]),
        json!([{"id": 1, "title": "P", "category": "iot", "description": "d", "status": "rejected"}]),
    );
    let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

    let stats = service.stats(today).unwrap();
    assert_eq!(stats.total_events, 2);
    assert_eq!(stats.active_events, 1);
    assert_eq!(stats.published_projects, 0);

    let deleted: Event = service.delete(Some(2), "admin").unwrap();
    assert_eq!(deleted.id, 2);
}

#[test]
fn create_ignores_blank_or_null_client_ids() {
    let (_dir, service) = empty_service();

    let event: Event = service
        .create(
            json!({"id": "", "title": "Meetup", "date": "2025-06-01", "type": "seminar"}),
            "admin",
        )
        .unwrap();
    assert_eq!(event.id, 1);

    let project: Project = service
        .create(
            json!({"id": null, "title": "Rover", "category": "robotics", "description": "d"}),
            "admin",
        )
        .unwrap();
    assert_eq!(project.id, 1);
}
