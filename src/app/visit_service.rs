//! The Visit Service.
//!
//! Sits between the HTTP layer and the configured [`VisitStore`]. It is
//! responsible for:
//! 1.  Re-validating every write through [`VisitDraft`] before the store is
//!     touched, so only complete, normalized records are persisted.
//! 2.  Translating store results (`StoreRows`) into records, `Option`s and
//!     booleans for callers.
//! 3.  Logging store failures with full detail.

use crate::domain::model::validator::CATEGORY_RULE;
use crate::domain::model::{
    Category, CategoryCounts, FieldMap, VisitDraft, VisitRecord, VisitStatistics,
};
use crate::error::{ServiceResult, StoreError, ValidationError};
use crate::storage::{OrderDirection, VisitStore};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Stateless orchestration over an injected store.
#[derive(Clone)]
pub struct VisitService {
    store: Arc<dyn VisitStore>,
}

fn logged(operation: &'static str) -> impl Fn(StoreError) -> StoreError {
    move |e| {
        tracing::error!(operation, error = %e, detail = ?e, "visit store failure");
        e
    }
}

impl VisitService {
    pub fn new(store: Arc<dyn VisitStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn VisitStore> {
        &self.store
    }

    pub async fn create(&self, input: &FieldMap) -> ServiceResult<VisitRecord> {
        let visit = VisitDraft::from_fields(input).build().map_err(|e| {
            tracing::warn!(errors = ?e.errors, "rejected visit create");
            e
        })?;

        let rows = self.store.insert(&visit).await.map_err(logged("insert"))?;
        let record = rows
            .into_first()
            .ok_or_else(|| StoreError::Decode("insert returned no row".to_string()))
            .map_err(logged("insert"))?;
        tracing::info!(id = record.id, category = %record.category, "visit created");
        Ok(record)
    }

    /// Full replace of an existing visit. Unknown ids return `Ok(None)`
    /// before any validation happens.
    pub async fn update(&self, id: i64, input: &FieldMap) -> ServiceResult<Option<VisitRecord>> {
        let existing = self.store.find_by_id(id).await.map_err(logged("find_by_id"))?;
        if existing.is_empty() {
            tracing::debug!(id, "update skipped, visit not found");
            return Ok(None);
        }

        let visit = VisitDraft::from_fields(input)
            .with_id(id)
            .build()
            .map_err(|e| {
                tracing::warn!(id, errors = ?e.errors, "rejected visit update");
                e
            })?;

        let updated = self
            .store
            .update(id, &visit)
            .await
            .map_err(logged("update"))?
            .into_first();
        if updated.is_some() {
            tracing::info!(id, "visit updated");
        }
        Ok(updated)
    }

    pub async fn remove(&self, id: i64) -> ServiceResult<bool> {
        let rows = self.store.remove(id).await.map_err(logged("remove"))?;
        let removed = rows.row_count > 0;
        if removed {
            tracing::info!(id, "visit removed");
        }
        Ok(removed)
    }

    /// All visits, most recent visit date first.
    pub async fn list_all(&self) -> ServiceResult<Vec<VisitRecord>> {
        self.list_ordered(OrderDirection::Desc).await
    }

    pub async fn list_ordered(&self, direction: OrderDirection) -> ServiceResult<Vec<VisitRecord>> {
        let rows = self
            .store
            .list_all(direction)
            .await
            .map_err(logged("list_all"))?;
        tracing::debug!(count = rows.row_count, "listed visits");
        Ok(rows.rows)
    }

    /// Visits of one category in the given date order. The category goes
    /// through the same membership rule as writes.
    pub async fn list_by_category(
        &self,
        category: &str,
        direction: OrderDirection,
    ) -> ServiceResult<Vec<VisitRecord>> {
        let category =
            Category::parse(category).ok_or_else(|| ValidationError::single(CATEGORY_RULE))?;
        let rows = self
            .store
            .list_by_category(category, direction)
            .await
            .map_err(logged("list_by_category"))?;
        Ok(rows.rows)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Option<VisitRecord>> {
        let rows = self
            .store
            .find_by_id(id)
            .await
            .map_err(logged("find_by_id"))?;
        Ok(rows.into_first())
    }

    pub async fn statistics(&self) -> ServiceResult<VisitStatistics> {
        let counts: CategoryCounts = self
            .store
            .aggregate_by_category()
            .await
            .map_err(logged("aggregate_by_category"))?;
        Ok(VisitStatistics::from(counts))
    }

    /// Inserts the sample visits when the store is empty. Returns how many
    /// were written.
    pub async fn seed_if_empty(&self, samples: &[JsonValue]) -> ServiceResult<usize> {
        if self.statistics().await?.total > 0 {
            return Ok(0);
        }
        let mut written = 0;
        for sample in samples {
            if let Some(fields) = sample.as_object() {
                self.create(fields).await?;
                written += 1;
            }
        }
        tracing::info!(written, "seeded sample visits");
        Ok(written)
    }

    pub async fn ping(&self) -> ServiceResult<()> {
        self.store.ping().await.map_err(logged("ping")).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::sample_visits;
    use crate::domain::model::validator::NAME_RULE;
    use crate::error::ServiceError;
    use crate::storage::{MemoryVisitStore, SqliteVisitStore};
    use serde_json::json;

    fn fields(value: JsonValue) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    fn maria() -> FieldMap {
        fields(json!({
            "name": "Maria Silva",
            "professional": "Dr. João",
            "visitDate": "2025-01-15",
            "category": "Psychological",
            "notes": "first visit"
        }))
    }

    fn memory_service() -> VisitService {
        VisitService::new(Arc::new(MemoryVisitStore::new()))
    }

    async fn sqlite_service() -> VisitService {
        let store = SqliteVisitStore::in_memory().await.unwrap();
        store.init_schema().await.unwrap();
        VisitService::new(Arc::new(store))
    }

    async fn create_assigns_id_and_counts_category(service: VisitService) {
        let created = service.create(&maria()).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.notes, "first visit");

        let stats = service.statistics().await.unwrap();
        assert_eq!(stats.by_category.psychological, 1);
        assert_eq!(stats.total, 1);

        let found = service.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn create_scenario_on_memory() {
        create_assigns_id_and_counts_category(memory_service()).await;
    }

    #[tokio::test]
    async fn create_scenario_on_sqlite() {
        create_assigns_id_and_counts_category(sqlite_service().await).await;
    }

    #[tokio::test]
    async fn short_name_is_rejected_and_nothing_is_written() {
        let service = memory_service();
        let mut input = maria();
        input.insert("name".to_string(), json!("A"));

        let err = service.create(&input).await.unwrap_err();
        match err {
            ServiceError::Validation(v) => assert!(v.errors.contains(&NAME_RULE.to_string())),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_category_never_reaches_the_store() {
        let service = sqlite_service().await;
        let mut input = maria();
        input.insert("category".to_string(), json!("Medical"));
        assert!(service.create(&input).await.unwrap_err().is_validation());

        let created = service.create(&maria()).await.unwrap();
        let err = service.update(created.id, &input).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.find_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn update_of_missing_id_is_none_even_with_invalid_input() {
        let service = memory_service();
        service.create(&maria()).await.unwrap();

        assert_eq!(service.update(9999, &maria()).await.unwrap(), None);
        let garbage = fields(json!({ "name": "A" }));
        assert_eq!(service.update(9999, &garbage).await.unwrap(), None);
        assert_eq!(service.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_revalidates_every_field() {
        let service = memory_service();
        let created = service.create(&maria()).await.unwrap();

        // A partial update is not a patch: missing fields fail validation.
        let partial = fields(json!({ "notes": "only notes" }));
        let err = service.update(created.id, &partial).await.unwrap_err();
        match err {
            ServiceError::Validation(v) => assert_eq!(v.errors.len(), 4),
            other => panic!("expected validation error, got {:?}", other),
        }

        let mut full = maria();
        full.insert("visitDate".to_string(), json!("2025-02-01T09:00:00Z"));
        full.insert("category".to_string(), json!("Pedagógico"));
        let updated = service.update(created.id, &full).await.unwrap().unwrap();
        assert_eq!(updated.visit_date.to_string(), "2025-02-01");
        assert_eq!(updated.category, Category::Pedagogical);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn remove_twice_returns_false_the_second_time() {
        let service = memory_service();
        let created = service.create(&maria()).await.unwrap();
        assert!(service.remove(created.id).await.unwrap());
        assert!(!service.remove(created.id).await.unwrap());
        assert_eq!(service.find_by_id(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn statistics_scenario_reports_zero_for_unused_categories() {
        let service = sqlite_service().await;
        for (name, category) in [
            ("Ana", "Pedagogical"),
            ("Bia", "Pedagogical"),
            ("Cris", "SocialAssistance"),
        ] {
            let mut input = maria();
            input.insert("name".to_string(), json!(name));
            input.insert("category".to_string(), json!(category));
            service.create(&input).await.unwrap();
        }
        let stats = service.statistics().await.unwrap();
        assert_eq!(
            serde_json::to_value(stats).unwrap(),
            json!({
                "total": 3,
                "byCategory": { "Psychological": 0, "Pedagogical": 2, "SocialAssistance": 1 }
            })
        );
    }

    #[tokio::test]
    async fn total_tracks_creates_and_removes() {
        let service = memory_service();
        let mut ids = Vec::new();
        for category in ["Psychological", "Pedagogical", "SocialAssistance", "Pedagogical"] {
            let mut input = maria();
            input.insert("category".to_string(), json!(category));
            ids.push(service.create(&input).await.unwrap().id);
        }
        for id in ids.iter().take(2) {
            service.remove(*id).await.unwrap();
            let stats = service.statistics().await.unwrap();
            assert_eq!(stats.total, stats.by_category.total());
        }
        assert_eq!(service.statistics().await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn list_all_is_date_descending_regardless_of_insert_order() {
        let service = sqlite_service().await;
        for date in ["2025-01-10", "2025-03-05", "2024-11-30", "2025-02-14"] {
            let mut input = maria();
            input.insert("visitDate".to_string(), json!(date));
            service.create(&input).await.unwrap();
        }
        let dates: Vec<String> = service
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.visit_date.to_string())
            .collect();
        assert_eq!(dates, vec!["2025-03-05", "2025-02-14", "2025-01-10", "2024-11-30"]);
    }

    #[tokio::test]
    async fn list_by_category_filters_and_rejects_unknown_names() {
        let service = memory_service();
        service.create(&maria()).await.unwrap();
        let mut other = maria();
        other.insert("category".to_string(), json!("Pedagogical"));
        service.create(&other).await.unwrap();

        let mut early = maria();
        early.insert("visitDate".to_string(), json!("2024-06-01"));
        service.create(&early).await.unwrap();

        let psych = service
            .list_by_category("Psicológico", OrderDirection::Desc)
            .await
            .unwrap();
        assert_eq!(psych.len(), 2);
        assert!(psych.iter().all(|r| r.category == Category::Psychological));
        assert_eq!(psych[0].visit_date.to_string(), "2025-01-15");

        let psych_asc = service
            .list_by_category("Psychological", OrderDirection::Asc)
            .await
            .unwrap();
        assert_eq!(psych_asc[0].visit_date.to_string(), "2024-06-01");

        assert!(service
            .list_by_category("Medical", OrderDirection::Desc)
            .await
            .unwrap_err()
            .is_validation());
    }

    async fn listed_dates(service: &VisitService) -> Vec<String> {
        service
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.visit_date.format("%Y-%m-%d").to_string())
            .collect()
    }

    #[tokio::test]
    async fn extreme_years_are_rejected_and_boundaries_sort_alike_on_every_store() {
        let memory = memory_service();
        let sqlite = sqlite_service().await;
        for service in [&memory, &sqlite] {
            for date in ["+10000-01-01", "-0001-06-01", "0000-12-31"] {
                let mut input = maria();
                input.insert("visitDate".to_string(), json!(date));
                assert!(service.create(&input).await.unwrap_err().is_validation(), "{}", date);
            }
            for date in ["2025-01-15", "9999-12-31", "0500-01-01", "0001-01-01"] {
                let mut input = maria();
                input.insert("visitDate".to_string(), json!(date));
                service.create(&input).await.unwrap();
            }
        }

        let expected = vec!["9999-12-31", "2025-01-15", "0500-01-01", "0001-01-01"];
        assert_eq!(listed_dates(&memory).await, expected);
        assert_eq!(listed_dates(&sqlite).await, expected);
    }

    #[tokio::test]
    async fn seeding_only_fills_an_empty_store() {
        let service = memory_service();
        assert_eq!(service.seed_if_empty(&sample_visits()).await.unwrap(), 5);
        assert_eq!(service.seed_if_empty(&sample_visits()).await.unwrap(), 0);
        let stats = service.statistics().await.unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_category.psychological, 2);
    }
}
