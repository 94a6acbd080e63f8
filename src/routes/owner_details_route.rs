use std::panic::AssertUnwindSafe;

use actix_web::{post, web, HttpResponse};
use futures::FutureExt;
use serde_json::{json, Value};

use crate::{domain::company::CompanyRecord, services::BatchOrchestrator};

pub const INVALID_REQUEST_FORMAT: &str =
    "Invalid request format. Expected {'companies': [...]}.";

#[post("/owner_details")]
async fn get_owner_details(
    orchestrator: web::Data<BatchOrchestrator>,
    body: web::Bytes,
) -> HttpResponse {
    let records = match parse_companies(&body) {
        Some(records) => records,
        None => {
            log::warn!("Rejected owner details request with malformed body");
            return HttpResponse::BadRequest().json(json!({ "error": INVALID_REQUEST_FORMAT }));
        }
    };

    match AssertUnwindSafe(orchestrator.analyze_batch(records))
        .catch_unwind()
        .await
    {
        Ok(data) => HttpResponse::Ok().json(json!({ "success": true, "data": data })),
        Err(_) => {
            log::error!("Owner details batch panicked");
            HttpResponse::InternalServerError().json(json!({ "error": "Internal server error" }))
        }
    }
}

fn parse_companies(body: &[u8]) -> Option<Vec<CompanyRecord>> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    let companies = payload.get("companies")?.as_array()?;

    Some(companies.iter().map(CompanyRecord::from).collect())
}
