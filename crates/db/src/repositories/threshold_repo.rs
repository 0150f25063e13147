//! Repository for the `thresholds` table.

use sqlx::PgPool;

use crate::models::threshold::ThresholdRow;

/// Column list for `thresholds` queries.
const COLUMNS: &str = "key, limit_value";

/// Provides the key-value operations the threshold store is built on.
pub struct ThresholdRepo;

impl ThresholdRepo {
    /// Insert or replace the limit stored under `key`.
    pub async fn upsert(pool: &PgPool, key: &str, limit: f64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO thresholds (key, limit_value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET \
                limit_value = EXCLUDED.limit_value, \
                updated_at = NOW()",
        )
        .bind(key)
        .bind(limit)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete the row under `key`. Returns whether a row existed.
    pub async fn delete(pool: &PgPool, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM thresholds WHERE key = $1")
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Look up the limit stored under `key`.
    pub async fn find_limit(pool: &PgPool, key: &str) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar::<_, f64>("SELECT limit_value FROM thresholds WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// All rows whose key starts with `prefix`, ordered by key.
    pub async fn list_with_prefix(
        pool: &PgPool,
        prefix: &str,
    ) -> Result<Vec<ThresholdRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM thresholds \
             WHERE starts_with(key, $1) \
             ORDER BY key"
        );
        sqlx::query_as::<_, ThresholdRow>(&query)
            .bind(prefix)
            .fetch_all(pool)
            .await
    }
}
