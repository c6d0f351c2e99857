use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::currency::Currency;
use crate::national_bank::{FetchError, RateFeed};
use crate::store::{RateStore, StoreError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("rates feed unavailable: {0}")]
    UpstreamUnavailable(#[from] FetchError),
    #[error("rates store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// Orchestrates the fetch-then-persist pipeline and the read path.
#[derive(Clone)]
pub struct CurrencyService {
    feed: Arc<dyn RateFeed>,
    store: Arc<dyn RateStore>,
}

impl CurrencyService {
    pub fn new(feed: Arc<dyn RateFeed>, store: Arc<dyn RateStore>) -> Self {
        Self { feed, store }
    }

    /// Fetches the feed for `date` and hands the records to the store in a
    /// detached task. The ack only covers the fetch: a save failure is
    /// logged and lost, and the caller cannot observe it.
    pub async fn ingest(&self, date: NaiveDate) -> Result<(), IngestError> {
        let records = self.feed.fetch_rates(date).await?;
        let count = records.len();
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            match store.save(&records).await {
                Ok(()) => log::info!("saved {count} rates for {date}"),
                Err(err) => log::error!("saving rates for {date} failed: {err}"),
            }
        });

        Ok(())
    }

    /// Reads persisted rates for `date`; an empty `code` means every
    /// currency.
    pub async fn query(&self, date: NaiveDate, code: &str) -> Result<Vec<Currency>, IngestError> {
        let code = (!code.is_empty()).then_some(code);
        Ok(self.store.query(date, code).await?)
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use tokio::sync::Notify;
    use tokio::time::timeout;

    use super::testing::{MemoryStore, StaticFeed, sample_rate};
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn usd() -> Currency {
        sample_rate("US Dollar", "USD", "450.5", date())
    }

    async fn wait_for_save(store: &MemoryStore) {
        timeout(Duration::from_secs(1), store.saved.notified())
            .await
            .expect("background save did not finish");
    }

    #[tokio::test]
    async fn ingest_acks_before_persistence_completes() {
        let gate = Arc::new(Notify::new());
        let store = Arc::new(MemoryStore {
            gate: Some(Arc::clone(&gate)),
            ..MemoryStore::default()
        });
        let feed = Arc::new(StaticFeed {
            outcome: Ok(vec![usd()]),
        });
        let service = CurrencyService::new(feed, Arc::clone(&store) as Arc<dyn RateStore>);

        service.ingest(date()).await.unwrap();

        // Acked while the save is still parked behind the gate.
        assert!(store.rows.lock().unwrap().is_empty());

        gate.notify_one();
        wait_for_save(&store).await;
        assert_eq!(*store.rows.lock().unwrap(), vec![usd()]);
    }

    #[tokio::test]
    async fn ingest_fetch_failure_never_touches_the_store() {
        let store = Arc::new(MemoryStore::default());
        let feed = Arc::new(StaticFeed {
            outcome: Err("boom".to_string()),
        });
        let service = CurrencyService::new(feed, Arc::clone(&store) as Arc<dyn RateStore>);

        let err = service.ingest(date()).await.unwrap_err();

        assert!(matches!(err, IngestError::UpstreamUnavailable(_)));
        assert_eq!(store.save_calls.load(Ordering::SeqCst), 0);
        assert!(store.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ingest_acks_even_when_the_background_save_fails() {
        let store = Arc::new(MemoryStore {
            fail_save: true,
            ..MemoryStore::default()
        });
        let feed = Arc::new(StaticFeed {
            outcome: Ok(vec![usd()]),
        });
        let service = CurrencyService::new(feed, Arc::clone(&store) as Arc<dyn RateStore>);

        service.ingest(date()).await.unwrap();

        wait_for_save(&store).await;
        assert!(store.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_filters_by_code_and_empty_code_means_all() {
        let store = Arc::new(MemoryStore::default());
        store.rows.lock().unwrap().extend([
            usd(),
            sample_rate("Euro", "EUR", "488.2", date()),
        ]);
        let feed = Arc::new(StaticFeed {
            outcome: Ok(Vec::new()),
        });
        let service = CurrencyService::new(feed, Arc::clone(&store) as Arc<dyn RateStore>);

        let only_usd = service.query(date(), "USD").await.unwrap();
        assert_eq!(only_usd, vec![usd()]);

        let all = service.query(date(), "").await.unwrap();
        assert_eq!(all.len(), 2);

        let other_day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert!(service.query(other_day, "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_store_failure_surfaces() {
        let store = Arc::new(MemoryStore {
            fail_query: true,
            ..MemoryStore::default()
        });
        let feed = Arc::new(StaticFeed {
            outcome: Ok(Vec::new()),
        });
        let service = CurrencyService::new(feed, store);

        let err = service.query(date(), "USD").await.unwrap_err();
        assert!(matches!(err, IngestError::StoreUnavailable(_)));
    }
}
