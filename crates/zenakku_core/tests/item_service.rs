use chrono::{DateTime, Utc};
use uuid::Uuid;
use zenakku_core::db::{open_db, open_db_in_memory};
use zenakku_core::{ItemListQuery, ItemService, RepoError, SqliteItemRepository};

fn at(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn add_then_retime_matches_documented_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());

    let created = service.add_item(at("2025-05-31T00:00:00Z")).unwrap();
    assert_eq!(created.timestamp, at("2025-05-31T00:00:00Z"));

    let updated = service
        .set_timestamp(created.id, at("2025-06-01T12:00:00Z"))
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.timestamp, at("2025-06-01T12:00:00Z"));

    let stored = service.get_item(created.id).unwrap().unwrap();
    assert_eq!(stored.timestamp, at("2025-06-01T12:00:00Z"));
}

#[test]
fn set_timestamp_on_missing_item_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());

    let missing = Uuid::new_v4();
    let err = service.set_timestamp(missing, Utc::now()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn add_item_now_is_listed_and_counted() {
    let conn = open_db_in_memory().unwrap();
    let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());

    let before = Utc::now();
    let item = service.add_item_now().unwrap();
    assert!(item.timestamp >= before);

    assert_eq!(service.count_items().unwrap(), 1);
    let listed = service.list_items(&ItemListQuery::default()).unwrap();
    assert_eq!(listed, vec![item]);
}

#[test]
fn delete_items_removes_batch_and_stops_at_first_missing() {
    let conn = open_db_in_memory().unwrap();
    let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());

    let first = service.add_item_now().unwrap();
    let second = service.add_item_now().unwrap();
    let third = service.add_item_now().unwrap();

    assert_eq!(service.delete_items(&[first.id, second.id]).unwrap(), 2);
    assert_eq!(service.count_items().unwrap(), 1);

    let missing = Uuid::new_v4();
    let err = service.delete_items(&[missing, third.id]).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
    assert!(service.get_item(third.id).unwrap().is_some());

    service.delete_item(third.id).unwrap();
    assert_eq!(service.count_items().unwrap(), 0);
}

#[test]
fn items_persist_across_reopened_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.db");

    let created = {
        let conn = open_db(&path).unwrap();
        let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());
        service.add_item(at("2025-05-31T08:30:15.250Z")).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let service = ItemService::new(SqliteItemRepository::try_new(&conn).unwrap());
    let loaded = service.get_item(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}
