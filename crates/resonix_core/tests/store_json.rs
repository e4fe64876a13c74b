use resonix_core::{
    open_store, Event, JsonRecordRepository, RecordRepository, Settings, StoreError, Topic,
};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

#[test]
fn open_seeds_missing_files_and_keeps_existing_ones() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("events.json"), r#"[{"id": 3, "title": "Kept"}]"#).unwrap();

    let store = open_store(&data_dir).unwrap();

    for topic in Topic::ALL {
        assert!(store.path_of(topic).exists(), "{topic} should exist");
    }
    let settings = fs::read_to_string(store.path_of(Topic::Settings)).unwrap();
    assert_eq!(serde_json::from_str::<Value>(&settings).unwrap(), json!({}));
    let team = fs::read_to_string(store.path_of(Topic::Team)).unwrap();
    assert_eq!(serde_json::from_str::<Value>(&team).unwrap(), json!([]));

    let events: Vec<Value> = store.load_list(Topic::Events).unwrap();
    assert_eq!(events, vec![json!({"id": 3, "title": "Kept"})]);
}

#[test]
fn malformed_file_is_reported_not_replaced() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("projects.json"), "{not json").unwrap();

    let store = open_store(dir.path()).unwrap();
    let err = store.load_list::<Value>(Topic::Projects).unwrap_err();
    assert!(matches!(err, StoreError::Malformed { topic: Topic::Projects, .. }));
    assert_eq!(
        fs::read_to_string(dir.path().join("projects.json")).unwrap(),
        "{not json"
    );
}

#[test]
fn deleted_file_reads_as_missing() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path()).unwrap();
    fs::remove_file(store.path_of(Topic::Gallery)).unwrap();

    let err = store.load_list::<Value>(Topic::Gallery).unwrap_err();
    assert!(matches!(err, StoreError::MissingFile(Topic::Gallery)));
}

#[test]
fn writes_preserve_unknown_fields_and_unicode() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("events.json"),
        serde_json::to_string(&json!([{
            "id": 1,
            "title": "Café Robotics",
            "date": "2025-05-01",
            "type": "workshop",
            "image": "images/events/robotics.jpg",
            "speakers": ["Ana", "Raj"]
        }]))
        .unwrap(),
    )
    .unwrap();

    let store = open_store(dir.path()).unwrap();
    let repo = JsonRecordRepository::<Event>::new(&store);
    repo.modify(1, |event| event.registration_count = Some(12))
        .unwrap();

    let raw = fs::read_to_string(store.path_of(Topic::Events)).unwrap();
    assert!(raw.contains("Café Robotics"));
    assert!(raw.contains("\n    {"), "four-space indent expected: {raw}");

    let stored: Vec<Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["image"], json!("images/events/robotics.jpg"));
    assert_eq!(stored[0]["speakers"], json!(["Ana", "Raj"]));
    assert_eq!(stored[0]["registration_count"], json!(12));
}

#[test]
fn concurrent_creates_assign_distinct_ids() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path()).unwrap();

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let store = &store;
            scope.spawn(move || {
                let repo = JsonRecordRepository::<Event>::new(store);
                let event: Event = serde_json::from_value(json!({
                    "title": format!("Meetup {worker}"),
                    "date": "2025-06-01",
                    "type": "seminar"
                }))
                .unwrap();
                repo.create(event).unwrap();
            });
        }
    });

    let repo = JsonRecordRepository::<Event>::new(&store);
    let mut ids: Vec<i64> = repo.list().unwrap().iter().map(|event| event.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
}

#[test]
fn wholesale_saves_replace_file_contents() {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path()).unwrap();

    store
        .save_list(Topic::News, &[json!({"id": 4, "title": "Réunion"})])
        .unwrap();
    let mut settings = Settings::new();
    settings.insert("site_title".to_string(), json!("Resonix"));
    store.save_settings(&settings).unwrap();

    let news: Vec<Value> = store.load_list(Topic::News).unwrap();
    assert_eq!(news, vec![json!({"id": 4, "title": "Réunion"})]);
    assert_eq!(store.load_settings().unwrap(), settings);

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().map_or(true, |ext| ext != "json"))
        .collect();
    assert!(leftovers.is_empty(), "temp files must not remain");
}
