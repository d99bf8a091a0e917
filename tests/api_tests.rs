//! HTTP surface tests with in-memory collaborators.

use std::sync::Arc;

use actix_web::{App, test, web};
use async_trait::async_trait;
use uuid::Uuid;

use bannerlinker::api::configure_routes;
use bannerlinker::client::{BannerApi, CreatedBanner};
use bannerlinker::domain::BannerLinkType;
use bannerlinker::errors::Result;
use bannerlinker::report::{FsObjectStorage, FunnelRow, ReportTask, TimeRange};
use bannerlinker::report::task::QueryEngine;
use bannerlinker::services::{BatchProcessor, LinkGenerator, UrlShortener};
use bannerlinker::storage::{BannerLinkRecord, BannerLinkSink, RunTracker};

struct FakeApi;

#[async_trait]
impl BannerApi for FakeApi {
    async fn create_banner(
        &self,
        link: &str,
        _link_type: BannerLinkType,
        _description: &str,
    ) -> Result<CreatedBanner> {
        Ok(CreatedBanner {
            banner_id: 1,
            banner_link: format!("https://banners.example/1?to={}", link),
        })
    }
}

struct NoShortener;

#[async_trait]
impl UrlShortener for NoShortener {
    async fn shorten(&self, _long_link: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

struct NoopSink;

#[async_trait]
impl BannerLinkSink for NoopSink {
    async fn insert(&self, _record: BannerLinkRecord) -> Result<()> {
        Ok(())
    }
}

struct NoopTracker;

#[async_trait]
impl RunTracker for NoopTracker {
    async fn register_running(&self, _skill_name: &str, _payload: &str) -> Result<Uuid> {
        Ok(Uuid::new_v4())
    }

    async fn register_failed(&self, _run_id: Uuid, _reason: &str) -> Result<()> {
        Ok(())
    }

    async fn register_succeeded(&self, _run_id: Uuid, _result: &str) -> Result<()> {
        Ok(())
    }
}

struct EmptyEngine;

#[async_trait]
impl QueryEngine for EmptyEngine {
    async fn funnel_rows(&self, _tr: &TimeRange) -> Result<Vec<FunnelRow>> {
        Ok(Vec::new())
    }

    async fn funnel_totals(&self, _tr: &TimeRange) -> Result<FunnelRow> {
        Ok(FunnelRow {
            id: "Итог".to_string(),
            ..Default::default()
        })
    }
}

fn make_processor() -> Arc<BatchProcessor> {
    let generator = LinkGenerator::new(Arc::new(FakeApi), Arc::new(NoShortener));
    Arc::new(BatchProcessor::new(
        generator,
        Arc::new(NoopSink),
        Arc::new(NoopTracker),
    ))
}

fn make_report_task(root: &std::path::Path) -> Arc<ReportTask> {
    Arc::new(ReportTask::new(
        Arc::new(EmptyEngine),
        Arc::new(FsObjectStorage::new(root)),
        "results",
    ))
}

#[actix_web::test]
async fn test_banner_links_media_ok() {
    let root = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(make_processor()))
            .app_data(web::Data::new(make_report_task(root.path())))
            .configure(configure_routes),
    )
    .await;

    let payload = serde_json::json!([{
        "link": "https://example.com/course",
        "channel": "Сайт",
        "partner": "Сириус",
        "publication_type": "пост",
        "partner_type": "",
    }])
    .to_string();

    let req = test::TestRequest::post()
        .uri(&format!(
            "/bannerLinksMedia?file={}",
            urlencoding(&payload)
        ))
        .to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let records = resp["file"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert!(
        records[0]["banner_links"]
            .as_str()
            .unwrap()
            .starts_with("https://banners.example/")
    );
}

#[actix_web::test]
async fn test_banner_links_media_unknown_channel_is_404() {
    let root = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(make_processor()))
            .app_data(web::Data::new(make_report_task(root.path())))
            .configure(configure_routes),
    )
    .await;

    let payload = serde_json::json!([{
        "link": "https://example.com/course",
        "channel": "Фейсбук",
        "partner": "Сириус",
        "publication_type": "пост",
        "partner_type": "",
    }])
    .to_string();

    let req = test::TestRequest::post()
        .uri(&format!(
            "/bannerLinksMedia?file={}",
            urlencoding(&payload)
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error_code"], "E003");
    assert_eq!(body["error"], "Invalid values");
}

#[actix_web::test]
async fn test_report_endpoint_returns_ticket() {
    let root = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(make_processor()))
            .app_data(web::Data::new(make_report_task(root.path())))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/bannerLinksMediaReport")
        .set_json(serde_json::json!({
            "from_date": "01.02.2024",
            "to_date": "29.02.2024",
        }))
        .to_request();
    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(Uuid::parse_str(resp["ticket"].as_str().unwrap()).is_ok());
}

#[actix_web::test]
async fn test_report_endpoint_rejects_bad_dates() {
    let root = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(make_processor()))
            .app_data(web::Data::new(make_report_task(root.path())))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/bannerLinksMediaReport")
        .set_json(serde_json::json!({
            "from_date": "2024-02-01",
            "to_date": "29.02.2024",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);
}

/// percent-encode the query value
fn urlencoding(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
