use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use thiserror::Error;

use crate::currency::Currency;

#[derive(Debug, Error)]
#[error("database error: {0}")]
pub struct StoreError(#[from] pub sqlx::Error);

#[async_trait]
pub trait RateStore: Send + Sync {
    /// Persists each record as a new row. No dedup: re-ingesting a date
    /// appends another set of rows.
    async fn save(&self, records: &[Currency]) -> Result<(), StoreError>;

    /// All rows for `date`, narrowed by currency code when one is given.
    /// No matches is an empty vec, not an error.
    async fn query(
        &self,
        date: NaiveDate,
        code: Option<&str>,
    ) -> Result<Vec<Currency>, StoreError>;
}

pub struct PgRateStore {
    pool: PgPool,
}

impl PgRateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateStore for PgRateStore {
    async fn save(&self, records: &[Currency]) -> Result<(), StoreError> {
        // Inserts are not wrapped in a transaction: a failure aborts the
        // batch but rows already inserted stay.
        for record in records {
            sqlx::query(
                "INSERT INTO r_currency (title, code, value, a_date) VALUES ($1, $2, $3, $4)",
            )
            .bind(&record.title)
            .bind(&record.code)
            .bind(record.value)
            .bind(record.a_date)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn query(
        &self,
        date: NaiveDate,
        code: Option<&str>,
    ) -> Result<Vec<Currency>, StoreError> {
        let records = match code.filter(|code| !code.is_empty()) {
            Some(code) => {
                sqlx::query_as::<_, Currency>(
                    "SELECT title, code, value, a_date FROM r_currency \
                     WHERE a_date = $1 AND code = $2",
                )
                .bind(date)
                .bind(code)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Currency>(
                    "SELECT title, code, value, a_date FROM r_currency WHERE a_date = $1",
                )
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records)
    }
}
