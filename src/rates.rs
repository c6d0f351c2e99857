use serde::Deserialize;
use serde::Serialize;

/// The national bank's daily rates feed. Channel metadata the service does
/// not need (generator, link, copyright) is left out and ignored by serde.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Rates {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "item", default)]
    pub items: Vec<RateItem>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct RateItem {
    pub fullname: String,
    pub title: String,
    pub description: String,
}
