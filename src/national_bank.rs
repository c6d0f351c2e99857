use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::currency::Currency;
use crate::rates::Rates;

/// Date format used by the feed URL, the feed body and the HTTP path
/// parameters, e.g. `01.06.2024`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("feed request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("feed decode failed: {0}")]
    Decode(String),
}

#[async_trait]
pub trait RateFeed: Send + Sync {
    async fn fetch_rates(&self, date: NaiveDate) -> Result<Vec<Currency>, FetchError>;
}

/// Client for the national bank's daily rates endpoint.
pub struct NationalBankClient {
    http: Client,
    base_url: String,
}

impl NationalBankClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn rates_url(&self, date: NaiveDate) -> String {
        format!("{}?fdate={}", self.base_url, date.format(DATE_FORMAT))
    }
}

#[async_trait]
impl RateFeed for NationalBankClient {
    async fn fetch_rates(&self, date: NaiveDate) -> Result<Vec<Currency>, FetchError> {
        let resp = self
            .http
            .get(self.rates_url(date))
            .send()
            .await?
            .error_for_status()?;
        let body = resp.text().await?;

        let rates: Rates = quick_xml::de::from_str(&body)
            .map_err(|e| FetchError::Decode(format!("malformed rates XML: {e}")))?;

        convert(rates)
    }
}

/// Converts one decoded feed into rate records. Any bad item fails the whole
/// feed, so nothing partial ever reaches the store.
fn convert(rates: Rates) -> Result<Vec<Currency>, FetchError> {
    if rates.items.is_empty() {
        return Ok(Vec::new());
    }

    let raw_date = rates
        .date
        .as_deref()
        .ok_or_else(|| FetchError::Decode("feed date is missing".to_string()))?;
    let a_date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
        .map_err(|e| FetchError::Decode(format!("bad feed date {raw_date:?}: {e}")))?;

    let mut records = Vec::with_capacity(rates.items.len());

    for item in rates.items {
        let value = Decimal::from_str(&normalize_decimal_string(&item.description)).map_err(
            |e| {
                FetchError::Decode(format!(
                    "bad rate value {:?} for {}: {e}",
                    item.description, item.title
                ))
            },
        )?;
        if value.is_sign_negative() {
            return Err(FetchError::Decode(format!(
                "negative rate value {value} for {}",
                item.title
            )));
        }

        records.push(Currency {
            title: item.fullname,
            code: item.title,
            value,
            a_date,
        });
    }

    Ok(records)
}

fn normalize_decimal_string(s: &str) -> String {
    s.trim().replace(',', ".")
}
