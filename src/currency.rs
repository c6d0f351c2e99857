use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One currency's observed rate for one date, as served to clients and
/// stored in `r_currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Currency {
    pub title: String,
    pub code: String,
    pub value: Decimal,
    #[serde(with = "wire_date")]
    pub a_date: NaiveDate,
}

/// `a_date` goes over the wire as RFC 3339 midnight UTC, e.g.
/// `2024-06-01T00:00:00Z`.
mod wire_date {
    use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let midnight =
            DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc);
        serializer.serialize_str(&midnight.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.date_naive())
            .map_err(de::Error::custom)
    }
}
