//! Behaviour every `VisitStore` backend must share. Each backend's test
//! module runs [`run_all`] against a fresh, empty store.

use crate::domain::model::{Category, NewVisit, VisitDraft};
use crate::storage::{OrderDirection, VisitStore};
use chrono::NaiveDate;
use serde_json::json;

pub(crate) fn new_visit(name: &str, date: &str, category: &str) -> NewVisit {
    VisitDraft::from_value(&json!({
        "name": name,
        "professional": "Dr. João",
        "visitDate": date,
        "category": category,
        "notes": "contract"
    }))
    .build()
    .unwrap()
}

pub(crate) async fn run_all(store: &dyn VisitStore) {
    empty_store_aggregates_to_zero(store).await;
    insert_then_find_round_trips(store).await;
    listing_is_date_descending(store).await;
    boundary_years_sort_chronologically(store).await;
    update_replaces_fields(store).await;
    remove_reports_affected_rows(store).await;
    aggregate_counts_every_category(store).await;
}

async fn empty_store_aggregates_to_zero(store: &dyn VisitStore) {
    let counts = store.aggregate_by_category().await.unwrap();
    assert_eq!(counts.total(), 0);
    assert!(store.list_all(OrderDirection::Desc).await.unwrap().is_empty());
}

async fn insert_then_find_round_trips(store: &dyn VisitStore) {
    let inserted = store
        .insert(&new_visit("Maria Silva", "2025-01-15", "Psychological"))
        .await
        .unwrap();
    assert_eq!(inserted.row_count, 1);
    let record = inserted.into_first().unwrap();
    assert!(record.id > 0);
    assert_eq!(record.name, "Maria Silva");
    assert_eq!(record.visit_date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    assert_eq!(record.category, Category::Psychological);
    assert_eq!(record.notes, "contract");

    let found = store.find_by_id(record.id).await.unwrap().into_first();
    assert_eq!(found.as_ref(), Some(&record));

    let missing = store.find_by_id(record.id + 10_000).await.unwrap();
    assert!(missing.is_empty());

    store.remove(record.id).await.unwrap();
}

async fn listing_is_date_descending(store: &dyn VisitStore) {
    let mut ids = Vec::new();
    for (name, date, category) in [
        ("Middle", "2025-02-10", "Pedagogical"),
        ("Oldest", "2024-12-31", "Psychological"),
        ("Newest", "2025-03-01", "Pedagogical"),
    ] {
        let rec = store
            .insert(&new_visit(name, date, category))
            .await
            .unwrap()
            .into_first()
            .unwrap();
        ids.push(rec.id);
    }

    let names = |rows: Vec<crate::domain::model::VisitRecord>| {
        rows.into_iter().map(|r| r.name).collect::<Vec<_>>()
    };
    let desc = store.list_all(OrderDirection::Desc).await.unwrap();
    assert_eq!(desc.row_count, 3);
    assert_eq!(names(desc.rows), vec!["Newest", "Middle", "Oldest"]);

    let asc = store.list_all(OrderDirection::Asc).await.unwrap();
    assert_eq!(names(asc.rows), vec!["Oldest", "Middle", "Newest"]);

    let pedagogical = store
        .list_by_category(Category::Pedagogical, OrderDirection::Desc)
        .await
        .unwrap();
    assert_eq!(names(pedagogical.rows), vec!["Newest", "Middle"]);

    for id in ids {
        store.remove(id).await.unwrap();
    }
}

async fn boundary_years_sort_chronologically(store: &dyn VisitStore) {
    let mut ids = Vec::new();
    for date in ["2025-01-15", "0001-01-01", "9999-12-31", "0500-01-01"] {
        let rec = store
            .insert(&new_visit("Boundary", date, "Psychological"))
            .await
            .unwrap()
            .into_first()
            .unwrap();
        ids.push(rec.id);
    }

    let dates: Vec<String> = store
        .list_all(OrderDirection::Desc)
        .await
        .unwrap()
        .rows
        .iter()
        .map(|r| r.visit_date.format("%Y-%m-%d").to_string())
        .collect();
    assert_eq!(dates, vec!["9999-12-31", "2025-01-15", "0500-01-01", "0001-01-01"]);

    for id in ids {
        store.remove(id).await.unwrap();
    }
}

async fn update_replaces_fields(store: &dyn VisitStore) {
    let original = store
        .insert(&new_visit("Pedro Santos", "2025-01-16", "Pedagogical"))
        .await
        .unwrap()
        .into_first()
        .unwrap();

    let updated = store
        .update(
            original.id,
            &new_visit("Pedro S. Santos", "2025-01-20", "SocialAssistance"),
        )
        .await
        .unwrap()
        .into_first()
        .unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.name, "Pedro S. Santos");
    assert_eq!(updated.category, Category::SocialAssistance);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at >= original.updated_at);

    let reread = store.find_by_id(original.id).await.unwrap().into_first();
    assert_eq!(reread, Some(updated));

    let missing = store
        .update(original.id + 10_000, &new_visit("Nobody", "2025-01-01", "Pedagogical"))
        .await
        .unwrap();
    assert!(missing.is_empty());

    store.remove(original.id).await.unwrap();
}

async fn remove_reports_affected_rows(store: &dyn VisitStore) {
    let rec = store
        .insert(&new_visit("Julia Costa", "2025-01-17", "SocialAssistance"))
        .await
        .unwrap()
        .into_first()
        .unwrap();
    assert_eq!(store.remove(rec.id).await.unwrap().row_count, 1);
    assert_eq!(store.remove(rec.id).await.unwrap().row_count, 0);
    assert!(store.find_by_id(rec.id).await.unwrap().is_empty());
}

async fn aggregate_counts_every_category(store: &dyn VisitStore) {
    for (name, category) in [
        ("Ana", "Pedagogical"),
        ("Bia", "Pedagogical"),
        ("Cris", "SocialAssistance"),
    ] {
        store
            .insert(&new_visit(name, "2025-01-18", category))
            .await
            .unwrap();
    }
    let counts = store.aggregate_by_category().await.unwrap();
    assert_eq!(counts.get(Category::Psychological), 0);
    assert_eq!(counts.get(Category::Pedagogical), 2);
    assert_eq!(counts.get(Category::SocialAssistance), 1);
    assert_eq!(counts.total(), 3);
}
