use std::env;

use anyhow::Context;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_RATES_FEED_URL: &str = "https://nationalbank.kz/rss/get_rates.cfm";

/// Process configuration, read once at startup from the environment
/// (a `.env` file is honored via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub rates_feed_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let listen_addr =
            env::var("LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
        let rates_feed_url =
            env::var("RATES_FEED_URL").unwrap_or_else(|_| DEFAULT_RATES_FEED_URL.to_string());

        Ok(Self {
            database_url,
            listen_addr,
            rates_feed_url,
        })
    }
}
