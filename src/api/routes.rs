//! HTTP surface: batch generation and report kickoff.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::api::health::HealthService;
use crate::errors::BannerlinkerError;
use crate::report::{ReportTask, TimeRange};
use crate::services::BatchProcessor;

#[derive(Debug, Deserialize)]
pub struct BannerLinksQuery {
    /// JSON array of uploaded records.
    pub file: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportStartRequest {
    pub from_date: String,
    pub to_date: String,
}

fn error_response(err: &BannerlinkerError) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(json!({
        "error_code": err.code(),
        "error": err.client_error(),
        "error_reason": err.message(),
    }))
}

/// POST /bannerLinksMedia
///
/// Runs the whole batch synchronously and answers with the uploaded
/// records, each carrying its generated link.
pub async fn banner_links_media(
    query: web::Query<BannerLinksQuery>,
    processor: web::Data<Arc<BatchProcessor>>,
) -> impl Responder {
    match processor.process(&query.file, false).await {
        Ok(outcome) => HttpResponse::Ok().json(json!({ "file": outcome.records })),
        Err(e) => {
            error!("{}: {}", e.error_type(), e.message());
            error_response(&e)
        }
    }
}

/// POST /bannerLinksMediaReport
///
/// Kicks off report generation in the background and answers with the
/// ticket right away.
pub async fn banner_links_media_report(
    body: web::Json<ReportStartRequest>,
    task: web::Data<Arc<ReportTask>>,
) -> impl Responder {
    let range = match TimeRange::from_report_dates(&body.from_date, &body.to_date) {
        Ok(range) => range,
        Err(e) => {
            error!("{}: {}", e.error_type(), e.message());
            return error_response(&e);
        }
    };

    let ticket = Uuid::new_v4();
    let task = task.get_ref().clone();
    tokio::spawn(async move {
        match task.run(ticket, range).await {
            Ok(path) => info!("Report {} ready at {}", ticket, path),
            Err(e) => error!("Report {} failed: {}", ticket, e),
        }
    });

    HttpResponse::Ok().json(json!({ "ticket": ticket }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/bannerLinksMedia", web::post().to(banner_links_media))
        .route(
            "/bannerLinksMediaReport",
            web::post().to(banner_links_media_report),
        )
        .route("/health", web::get().to(HealthService::health_check))
        .route("/health/live", web::get().to(HealthService::liveness_check));
}
