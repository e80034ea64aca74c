//! Visit store using a PostgreSQL connection pool.

use crate::domain::model::{Category, CategoryCounts, NewVisit};
use crate::error::StoreResult;
use crate::storage::{
    counts_from_groups, map_db_error, OrderDirection, StoreRows, StoredVisitRow, VisitStore,
    TABLE_NAME, VISIT_COLUMNS,
};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PostgresVisitStore {
    pool: PgPool,
}

impl PostgresVisitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl VisitStore for PostgresVisitStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn init_schema(&self) -> StoreResult<()> {
        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                professional TEXT NOT NULL,
                visit_date DATE NOT NULL,
                category TEXT NOT NULL CHECK (category IN ({categories})),
                notes TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
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
        tracing::debug!(table = TABLE_NAME, "postgres schema ready");
        Ok(())
    }

    async fn insert(&self, visit: &NewVisit) -> StoreResult<StoreRows> {
        let sql = format!(
            "INSERT INTO {} (name, professional, visit_date, category, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            TABLE_NAME, VISIT_COLUMNS
        );
        let row: StoredVisitRow = sqlx::query_as(&sql)
            .bind(visit.name())
            .bind(visit.professional())
            .bind(visit.visit_date())
            .bind(visit.category().as_str())
            .bind(visit.notes())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        StoreRows::from_stored(vec![row])
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<StoreRows> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", VISIT_COLUMNS, TABLE_NAME);
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
            "SELECT {cols} FROM {table} WHERE category = $1 ORDER BY visit_date {dir}, id {dir}",
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
            "UPDATE {} SET name = $1, professional = $2, visit_date = $3, category = $4, notes = $5, updated_at = now()
             WHERE id = $6
             RETURNING {}",
            TABLE_NAME, VISIT_COLUMNS
        );
        let row: Option<StoredVisitRow> = sqlx::query_as(&sql)
            .bind(visit.name())
            .bind(visit.professional())
            .bind(visit.visit_date())
            .bind(visit.category().as_str())
            .bind(visit.notes())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        StoreRows::from_stored(row.into_iter().collect())
    }

    async fn remove(&self, id: i64) -> StoreResult<StoreRows> {
        let sql = format!("DELETE FROM {} WHERE id = $1", TABLE_NAME);
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
