//! Persistence adapters for visit records.
//!
//! One [`VisitStore`] trait, three backends. The backend is picked once at
//! startup by [`connect`]; nothing downstream branches on which one it got.

use crate::domain::model::{Category, CategoryCounts, NewVisit, VisitRecord};
use crate::error::{StoreError, StoreResult};
use crate::infra::config::StoreBackend;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

pub mod memory;
pub mod postgres;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod contract;

pub use memory::MemoryVisitStore;
pub use postgres::PostgresVisitStore;
pub use sqlite::SqliteVisitStore;

pub(crate) const TABLE_NAME: &str = "visits";
pub(crate) const VISIT_COLUMNS: &str =
    "id, name, professional, visit_date, category, notes, created_at, updated_at";

/// Sort direction for listings. Rows are ordered by visit date, ties by id.
#[derive(Deserialize, Serialize, Debug, ToSchema, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Asc,
    #[default]
    #[serde(other)]
    Desc,
}

impl OrderDirection {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// A `visits` row exactly as the SQL backends return it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredVisitRow {
    pub id: i64,
    pub name: String,
    pub professional: String,
    pub visit_date: NaiveDate,
    pub category: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Uniform result shape shared by every backend.
///
/// For reads and writes that return data, `row_count` equals `rows.len()`;
/// for deletes `rows` is empty and `row_count` is the number of rows removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreRows {
    pub rows: Vec<VisitRecord>,
    pub row_count: u64,
}

impl StoreRows {
    pub fn from_rows(rows: Vec<VisitRecord>) -> Self {
        let row_count = rows.len() as u64;
        Self { rows, row_count }
    }

    pub fn affected(row_count: u64) -> Self {
        Self {
            rows: Vec::new(),
            row_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn into_first(self) -> Option<VisitRecord> {
        self.rows.into_iter().next()
    }

    pub(crate) fn from_stored(rows: Vec<StoredVisitRow>) -> StoreResult<Self> {
        let records = rows
            .into_iter()
            .map(VisitRecord::from_stored_row)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Self::from_rows(records))
    }
}

/// Contract every backing store fulfils. Absence is never an error: lookups
/// and updates of unknown ids come back empty, deletes report zero rows.
#[async_trait]
pub trait VisitStore: Send + Sync {
    /// Short backend name for logs ("memory", "sqlite", "postgres").
    fn backend_name(&self) -> &'static str;

    /// Cheap round-trip to the backing store.
    async fn ping(&self) -> StoreResult<()>;

    /// Creates the `visits` table and its indexes when missing.
    async fn init_schema(&self) -> StoreResult<()>;

    /// Persists a new visit and returns the stored row with its id and timestamps.
    async fn insert(&self, visit: &NewVisit) -> StoreResult<StoreRows>;

    async fn find_by_id(&self, id: i64) -> StoreResult<StoreRows>;

    async fn list_all(&self, direction: OrderDirection) -> StoreResult<StoreRows>;

    async fn list_by_category(
        &self,
        category: Category,
        direction: OrderDirection,
    ) -> StoreResult<StoreRows>;

    /// Replaces the five editable fields and refreshes `updated_at`.
    async fn update(&self, id: i64, visit: &NewVisit) -> StoreResult<StoreRows>;

    /// Hard delete.
    async fn remove(&self, id: i64) -> StoreResult<StoreRows>;

    async fn aggregate_by_category(&self) -> StoreResult<CategoryCounts>;
}

/// Opens the configured backend. The schema is not touched here; callers run
/// [`VisitStore::init_schema`] when they want it.
pub async fn connect(backend: &StoreBackend) -> StoreResult<Arc<dyn VisitStore>> {
    let store: Arc<dyn VisitStore> = match backend {
        StoreBackend::Memory => Arc::new(MemoryVisitStore::new()),
        StoreBackend::Sqlite {
            path,
            max_connections,
        } => Arc::new(SqliteVisitStore::open(path, *max_connections).await?),
        StoreBackend::Postgres {
            url,
            max_connections,
        } => Arc::new(PostgresVisitStore::connect(url, *max_connections).await?),
    };
    tracing::info!(backend = store.backend_name(), "visit store connected");
    Ok(store)
}

/// Folds `(category, count)` rows from a GROUP BY into counts.
pub(crate) fn counts_from_groups(groups: Vec<(String, i64)>) -> StoreResult<CategoryCounts> {
    let mut counts = CategoryCounts::default();
    for (name, total) in groups {
        let category = Category::parse(&name).ok_or_else(|| {
            StoreError::Decode(format!("unknown category '{}' in aggregate", name))
        })?;
        counts.add(category, total);
    }
    Ok(counts)
}

/// Turns CHECK failures into [`StoreError::Constraint`]; everything else
/// stays a database error.
pub(crate) fn map_db_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.kind(), sqlx::error::ErrorKind::CheckViolation)
            || db.message().contains("CHECK constraint")
        {
            return StoreError::Constraint(db.message().to_string());
        }
    }
    StoreError::Database(err)
}
