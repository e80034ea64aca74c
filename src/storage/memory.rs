//! In-process store backed by a `Vec`, for development and tests.

use crate::domain::model::{Category, CategoryCounts, NewVisit, VisitRecord};
use crate::error::StoreResult;
use crate::storage::{OrderDirection, StoreRows, VisitStore};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

struct MemoryState {
    next_id: i64,
    rows: Vec<VisitRecord>,
}

/// Visit store that lives and dies with the process.
pub struct MemoryVisitStore {
    state: RwLock<MemoryState>,
}

impl MemoryVisitStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                rows: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryVisitStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted(mut rows: Vec<VisitRecord>, direction: OrderDirection) -> Vec<VisitRecord> {
    rows.sort_by(|a, b| {
        let ord = a.visit_date.cmp(&b.visit_date).then(a.id.cmp(&b.id));
        match direction {
            OrderDirection::Asc => ord,
            OrderDirection::Desc => ord.reverse(),
        }
    });
    rows
}

#[async_trait]
impl VisitStore for MemoryVisitStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn init_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert(&self, visit: &NewVisit) -> StoreResult<StoreRows> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let record = VisitRecord {
            id: state.next_id,
            name: visit.name().to_string(),
            professional: visit.professional().to_string(),
            visit_date: visit.visit_date(),
            category: visit.category(),
            notes: visit.notes().to_string(),
            created_at: now,
            updated_at: now,
        };
        state.next_id += 1;
        state.rows.push(record.clone());
        Ok(StoreRows::from_rows(vec![record]))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<StoreRows> {
        let state = self.state.read().await;
        let rows = state.rows.iter().filter(|r| r.id == id).cloned().collect();
        Ok(StoreRows::from_rows(rows))
    }

    async fn list_all(&self, direction: OrderDirection) -> StoreResult<StoreRows> {
        let state = self.state.read().await;
        Ok(StoreRows::from_rows(sorted(state.rows.clone(), direction)))
    }

    async fn list_by_category(
        &self,
        category: Category,
        direction: OrderDirection,
    ) -> StoreResult<StoreRows> {
        let state = self.state.read().await;
        let rows = state
            .rows
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect();
        Ok(StoreRows::from_rows(sorted(rows, direction)))
    }

    async fn update(&self, id: i64, visit: &NewVisit) -> StoreResult<StoreRows> {
        let mut state = self.state.write().await;
        let Some(record) = state.rows.iter_mut().find(|r| r.id == id) else {
            return Ok(StoreRows::default());
        };
        record.name = visit.name().to_string();
        record.professional = visit.professional().to_string();
        record.visit_date = visit.visit_date();
        record.category = visit.category();
        record.notes = visit.notes().to_string();
        record.updated_at = Utc::now();
        Ok(StoreRows::from_rows(vec![record.clone()]))
    }

    async fn remove(&self, id: i64) -> StoreResult<StoreRows> {
        let mut state = self.state.write().await;
        let before = state.rows.len();
        state.rows.retain(|r| r.id != id);
        Ok(StoreRows::affected((before - state.rows.len()) as u64))
    }

    async fn aggregate_by_category(&self) -> StoreResult<CategoryCounts> {
        let state = self.state.read().await;
        let mut counts = CategoryCounts::default();
        for record in &state.rows {
            counts.add(record.category, 1);
        }
        Ok(counts)
    }
}
