//! Embedded SQLite store (single file, or `:memory:`).

use crate::domain::model::{Category, CategoryCounts, NewVisit};
use crate::error::{StoreError, StoreResult};
use crate::storage::{
    counts_from_groups, map_db_error, OrderDirection, StoreRows, StoredVisitRow, VisitStore,
    TABLE_NAME, VISIT_COLUMNS,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

pub struct SqliteVisitStore {
    pool: SqlitePool,
}

impl SqliteVisitStore {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Opens (creating if needed) the database file at `path`. `:memory:`
    /// gives a private in-memory database.
    pub async fn open(path: &str, max_connections: u32) -> StoreResult<Self> {
        if path == ":memory:" {
            return Self::in_memory().await;
        }

        if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Every connection to `:memory:` is its own database, so the pool is
    /// pinned to a single connection that never expires.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl VisitStore for SqliteVisitStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn init_schema(&self) -> StoreResult<()> {
        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                professional TEXT NOT NULL,
                visit_date TEXT NOT NULL,
                category TEXT NOT NULL CHECK (category IN ({categories})),
                notes TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            table = TABLE_NAME,
            categories = Category::sql_check_list()
        );
        sqlx::query(&create_table).execute(&self.pool).await?;

        for column in ["visit_date", "category", "professional"] {
            let sql = format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table}({column})",
                table = TABLE_NAME,
                column = column
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        tracing::debug!(table = TABLE_NAME, "sqlite schema ready");
        Ok(())
    }

    async fn insert(&self, visit: &NewVisit) -> StoreResult<StoreRows> {
        let sql = format!(
            "INSERT INTO {} (name, professional, visit_date, category, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {}",
            TABLE_NAME, VISIT_COLUMNS
        );
        let now = Utc::now();
        let row: StoredVisitRow = sqlx::query_as(&sql)
            .bind(visit.name())
            .bind(visit.professional())
            .bind(visit.visit_date())
            .bind(visit.category().as_str())
            .bind(visit.notes())
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        StoreRows::from_stored(vec![row])
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<StoreRows> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?", VISIT_COLUMNS, TABLE_NAME);
        let rows: Vec<StoredVisitRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        StoreRows::from_stored(rows)
    }

    async fn list_all(&self, direction: OrderDirection) -> StoreResult<StoreRows> {
        let sql = format!(
            "SELECT {cols} FROM {table} ORDER BY visit_date {dir}, id {dir}",
            cols = VISIT_COLUMNS,
            table = TABLE_NAME,
            dir = direction.as_sql()
        );
        let rows: Vec<StoredVisitRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        StoreRows::from_stored(rows)
    }

    async fn list_by_category(
        &self,
        category: Category,
        direction: OrderDirection,
    ) -> StoreResult<StoreRows> {
        let sql = format!(
            "SELECT {cols} FROM {table} WHERE category = ? ORDER BY visit_date {dir}, id {dir}",
            cols = VISIT_COLUMNS,
            table = TABLE_NAME,
            dir = direction.as_sql()
        );
        let rows: Vec<StoredVisitRow> = sqlx::query_as(&sql)
            .bind(category.as_str())
            .fetch_all(&self.pool)
            .await?;
        StoreRows::from_stored(rows)
    }

    async fn update(&self, id: i64, visit: &NewVisit) -> StoreResult<StoreRows> {
        let sql = format!(
            "UPDATE {} SET name = ?, professional = ?, visit_date = ?, category = ?, notes = ?, updated_at = ?
             WHERE id = ?
             RETURNING {}",
            TABLE_NAME, VISIT_COLUMNS
        );
        let row: Option<StoredVisitRow> = sqlx::query_as(&sql)
            .bind(visit.name())
            .bind(visit.professional())
            .bind(visit.visit_date())
            .bind(visit.category().as_str())
            .bind(visit.notes())
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        StoreRows::from_stored(row.into_iter().collect())
    }

    async fn remove(&self, id: i64) -> StoreResult<StoreRows> {
        let sql = format!("DELETE FROM {} WHERE id = ?", TABLE_NAME);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(StoreRows::affected(result.rows_affected()))
    }

    async fn aggregate_by_category(&self) -> StoreResult<CategoryCounts> {
        let sql = format!(
            "SELECT category, COUNT(*) AS total FROM {} GROUP BY category",
            TABLE_NAME
        );
        let groups: Vec<(String, i64)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        counts_from_groups(groups)
    }
}
