use super::ImportRepositoryImpl;
use crate::domain::{Division, DivisionTypeRule, Entry, Event, EventTemplate, NewEntry, Participant};
use crate::repository::{EventRepository, ImportRepository, RepositoryError};
use chrono::Utc;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::init_schema(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}

fn seed_event(conn: Arc<Mutex<Connection>>, event_id: &str, template: Option<EventTemplate>) {
    let events = EventRepository::from_connection(conn);
    let template_id = template.as_ref().map(|t| t.template_id.clone());
    if let Some(t) = template {
        events.upsert_template(&t).unwrap();
    }
    events
        .create_event(&Event {
            event_id: event_id.to_string(),
            name: format!("Event {}", event_id),
            template_id,
            created_at: Utc::now(),
        })
        .unwrap();
}

fn make_division(event_id: &str, code: &str) -> Division {
    Division {
        division_id: uuid::Uuid::new_v4().to_string(),
        event_id: event_id.to_string(),
        code: Some(code.to_string()),
        name: format!("Kids {}", &code[1..]),
        division_type: "Kids".to_string(),
        is_active: true,
        created_at: Utc::now(),
    }
}

fn make_entry(event_id: &str, number: i64, name: &str) -> Entry {
    NewEntry {
        event_id: event_id.to_string(),
        division_id: None,
        participant_id: None,
        name: name.to_string(),
    }
    .numbered(number)
}

#[test]
fn test_find_event() {
    let conn = setup_test_db();
    seed_event(conn.clone(), "e1", None);
    let repo = ImportRepositoryImpl::from_connection(conn);

    let event = repo.find_event("e1").unwrap().unwrap();
    assert_eq!(event.name, "Event e1");
    assert!(repo.find_event("nope").unwrap().is_none());
}

#[test]
fn test_load_division_types_from_template() {
    let conn = setup_test_db();
    seed_event(
        conn.clone(),
        "e1",
        Some(EventTemplate {
            template_id: "tpl".to_string(),
            name: "BBQ".to_string(),
            division_types: vec![
                DivisionTypeRule::new("K", "Kids"),
                DivisionTypeRule::new("P", "Pro"),
            ],
        }),
    );
    seed_event(conn.clone(), "e2", None);
    let repo = ImportRepositoryImpl::from_connection(conn);

    let table = repo.load_division_types("e1").unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[0].code, "K");
    assert_eq!(table[1].name, "Pro");

    // 无模板 → 空表
    assert!(repo.load_division_types("e2").unwrap().is_empty());
}

#[test]
fn test_division_lookup_is_scoped_to_event() {
    let conn = setup_test_db();
    seed_event(conn.clone(), "e1", None);
    seed_event(conn.clone(), "e2", None);
    let repo = ImportRepositoryImpl::from_connection(conn);

    let division = make_division("e1", "K1");
    repo.insert_division(&division).unwrap();

    let found = repo.find_division_by_code("e1", "K1").unwrap().unwrap();
    assert_eq!(found.division_id, division.division_id);
    assert_eq!(found.division_type, "Kids");
    assert!(repo.find_division_by_code("e2", "K1").unwrap().is_none());
}

#[test]
fn test_duplicate_division_code_is_unique_violation() {
    let conn = setup_test_db();
    seed_event(conn.clone(), "e1", None);
    let repo = ImportRepositoryImpl::from_connection(conn);

    repo.insert_division(&make_division("e1", "K1")).unwrap();
    let err = repo.insert_division(&make_division("e1", "K1")).unwrap_err();

    assert!(err.is_unique_violation());
}

#[test]
fn test_max_entry_number_defaults_to_zero() {
    let conn = setup_test_db();
    seed_event(conn.clone(), "e1", None);
    let repo = ImportRepositoryImpl::from_connection(conn);

    assert_eq!(repo.max_entry_number("e1").unwrap(), 0);

    repo.insert_entry(&make_entry("e1", 7, "Cake")).unwrap();
    repo.insert_entry(&make_entry("e1", 3, "Pie")).unwrap();

    assert_eq!(repo.max_entry_number("e1").unwrap(), 7);
}

#[test]
fn test_duplicate_entry_number_is_unique_violation() {
    let conn = setup_test_db();
    seed_event(conn.clone(), "e1", None);
    seed_event(conn.clone(), "e2", None);
    let repo = ImportRepositoryImpl::from_connection(conn);

    repo.insert_entry(&make_entry("e1", 1, "Cake")).unwrap();
    let err = repo.insert_entry(&make_entry("e1", 1, "Pie")).unwrap_err();
    assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));

    // 编号唯一性按赛事划分
    repo.insert_entry(&make_entry("e2", 1, "Pie")).unwrap();
}

#[test]
fn test_participants_are_not_deduplicated() {
    let conn = setup_test_db();
    seed_event(conn.clone(), "e1", None);
    let repo = ImportRepositoryImpl::from_connection(conn);

    for _ in 0..2 {
        repo.insert_participant(&Participant {
            participant_id: uuid::Uuid::new_v4().to_string(),
            event_id: "e1".to_string(),
            division_id: None,
            name: "Jane Doe".to_string(),
            is_active: true,
            created_at: Utc::now(),
        })
        .unwrap();
    }

    assert_eq!(repo.list_participants("e1").unwrap().len(), 2);
}
