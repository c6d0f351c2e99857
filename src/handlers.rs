use actix_web::{HttpResponse, Responder, get, web};
use chrono::NaiveDate;
use serde::Serialize;

use crate::national_bank::DATE_FORMAT;
use crate::service::CurrencyService;

#[derive(Serialize)]
struct SaveResponse {
    success: bool,
}

// Every failure collapses to a generic 500, matching the public contract.
fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("Internal Server Error")
}

#[get("/currency/save/{date}")]
pub async fn save_currency(
    service: web::Data<CurrencyService>,
    path: web::Path<String>,
) -> impl Responder {
    let raw_date = path.into_inner();
    let date = match NaiveDate::parse_from_str(&raw_date, DATE_FORMAT) {
        Ok(date) => date,
        Err(err) => {
            log::warn!("rejecting save for bad date {raw_date:?}: {err}");
            return internal_error();
        }
    };

    match service.ingest(date).await {
        Ok(()) => HttpResponse::Ok().json(SaveResponse { success: true }),
        Err(err) => {
            log::error!("ingest for {date} failed: {err}");
            internal_error()
        }
    }
}

#[get("/currency/{date}/{code}")]
pub async fn get_currency(
    service: web::Data<CurrencyService>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (raw_date, code) = path.into_inner();
    let date = match NaiveDate::parse_from_str(&raw_date, DATE_FORMAT) {
        Ok(date) => date,
        Err(err) => {
            log::warn!("rejecting query for bad date {raw_date:?}: {err}");
            return internal_error();
        }
    };

    match service.query(date, &code).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(err) => {
            log::error!("query for {date}/{code} failed: {err}");
            internal_error()
        }
    }
}
