use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::national_bank::NationalBankClient;
use crate::service::CurrencyService;
use crate::store::PgRateStore;

mod config;
mod currency;
mod handlers;
mod national_bank;
mod rates;
mod service;
mod store;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("can't connect to the database")?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("can't run database migrations")?;

    let service = web::Data::new(CurrencyService::new(
        Arc::new(NationalBankClient::new(config.rates_feed_url.clone())),
        Arc::new(PgRateStore::new(pool)),
    ));

    log::info!("listening on {}", config.listen_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .service(handlers::save_currency)
            .service(handlers::get_currency)
    })
    .bind(&config.listen_addr)?
    .run()
    .await?;

    Ok(())
}
