//! End-to-end pipeline tests: uploaded CSV through batch generation, and
//! queried funnel rows through report export.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tempfile::NamedTempFile;
use uuid::Uuid;

use bannerlinker::client::{BannerApi, CreatedBanner};
use bannerlinker::domain::BannerLinkType;
use bannerlinker::errors::Result;
use bannerlinker::report::task::{FsObjectStorage, QueryEngine, ReportTask};
use bannerlinker::report::{FunnelRow, TimeRange};
use bannerlinker::services::{BatchProcessor, LinkGenerator, UrlShortener};
use bannerlinker::storage::{BannerLinkRecord, BannerLinkSink, RunTracker};
use bannerlinker::utils::csv_handler;

struct FakeApi {
    calls: AtomicUsize,
}

#[async_trait]
impl BannerApi for FakeApi {
    async fn create_banner(
        &self,
        link: &str,
        _link_type: BannerLinkType,
        _description: &str,
    ) -> Result<CreatedBanner> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CreatedBanner {
            banner_id: n as i64,
            banner_link: format!("https://banners.example/{}?to={}", n, link),
        })
    }
}

struct FakeShortener;

#[async_trait]
impl UrlShortener for FakeShortener {
    async fn shorten(&self, long_link: &str) -> Result<Option<String>> {
        Ok(Some(format!("https://s.example/{}", long_link.len())))
    }
}

#[derive(Default)]
struct MemorySink {
    inserted: Mutex<Vec<BannerLinkRecord>>,
}

#[async_trait]
impl BannerLinkSink for MemorySink {
    async fn insert(&self, record: BannerLinkRecord) -> Result<()> {
        self.inserted.lock().unwrap().push(record);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryTracker {
    statuses: Mutex<Vec<String>>,
}

#[async_trait]
impl RunTracker for MemoryTracker {
    async fn register_running(&self, _skill_name: &str, _payload: &str) -> Result<Uuid> {
        self.statuses.lock().unwrap().push("running".to_string());
        Ok(Uuid::new_v4())
    }

    async fn register_failed(&self, _run_id: Uuid, _reason: &str) -> Result<()> {
        self.statuses.lock().unwrap().push("failed".to_string());
        Ok(())
    }

    async fn register_succeeded(&self, _run_id: Uuid, _result: &str) -> Result<()> {
        self.statuses.lock().unwrap().push("succeeded".to_string());
        Ok(())
    }
}

fn write_upload_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Ссылка,Канал,Партнёр,Тип публикации,Название публикации,Тип партнёра,Техническая ссылка"
    )
    .unwrap();
    writeln!(
        file,
        "https://example.com/course/1,ВК,Сириус,пост,Анонс курса,,нет"
    )
    .unwrap();
    writeln!(
        file,
        "https://example.com/course/2,Сайт,Сириус.Курсы,новость,Лендинг,,"
    )
    .unwrap();
    writeln!(
        file,
        "https://example.com/course/3,Телеграм,Внешняя студия,ссылка,Подборка,+,да"
    )
    .unwrap();
    file
}

#[tokio::test]
async fn test_csv_upload_through_batch() {
    let upload = write_upload_csv();
    let records = csv_handler::read_input_csv(upload.path()).unwrap();
    assert_eq!(records.len(), 3);

    let payload = serde_json::to_string(&records).unwrap();

    let generator = LinkGenerator::new(
        Arc::new(FakeApi {
            calls: AtomicUsize::new(0),
        }),
        Arc::new(FakeShortener),
    );
    let sink = Arc::new(MemorySink::default());
    let tracker = Arc::new(MemoryTracker::default());
    let processor = BatchProcessor::new(generator, sink.clone(), tracker.clone());

    let outcome = processor.process(&payload, false).await.unwrap();

    assert_eq!(outcome.banner_links.len(), 3);
    // ВК 和 Телеграм 换短链接，Сайт 保留长链接
    assert!(outcome.banner_links[0].starts_with("https://s.example/"));
    assert!(outcome.banner_links[1].starts_with("https://banners.example/"));
    assert!(outcome.banner_links[2].starts_with("https://s.example/"));

    let inserted = sink.inserted.lock().unwrap();
    assert_eq!(inserted.len(), 3);
    assert_eq!(inserted[0].channel, "ВК");
    assert!(!inserted[0].is_outer);
    assert!(!inserted[0].is_deleted);
    assert!(inserted[2].is_outer);
    assert!(inserted[2].is_technical);
    assert_eq!(inserted[1].publication_type, "новость");

    assert_eq!(
        outcome.records[0]["banner_links"],
        outcome.banner_links[0]
    );
    assert_eq!(
        *tracker.statuses.lock().unwrap(),
        vec!["running".to_string(), "succeeded".to_string()]
    );
}

#[tokio::test]
async fn test_batch_rejects_unknown_partner_without_marker() {
    let payload = serde_json::json!([{
        "link": "https://example.com/course",
        "channel": "ВК",
        "partner": "Внешняя студия",
        "publication_type": "пост",
        "partner_type": "",
    }])
    .to_string();

    let generator = LinkGenerator::new(
        Arc::new(FakeApi {
            calls: AtomicUsize::new(0),
        }),
        Arc::new(FakeShortener),
    );
    let sink = Arc::new(MemorySink::default());
    let tracker = Arc::new(MemoryTracker::default());
    let processor = BatchProcessor::new(generator, sink.clone(), tracker.clone());

    let err = processor.process(&payload, false).await.unwrap_err();
    assert_eq!(err.code(), "E004");
    assert!(sink.inserted.lock().unwrap().is_empty());
    assert_eq!(
        *tracker.statuses.lock().unwrap(),
        vec!["running".to_string(), "failed".to_string()]
    );
}

struct FakeEngine;

#[async_trait]
impl QueryEngine for FakeEngine {
    async fn funnel_rows(&self, _tr: &TimeRange) -> Result<Vec<FunnelRow>> {
        Ok(vec![
            FunnelRow {
                id: "11".to_string(),
                link: "https://example.com/11".to_string(),
                channel: "ВК".to_string(),
                partner: "Сириус".to_string(),
                partner_type: "внутренний".to_string(),
                publication_type: "пост".to_string(),
                fact_publication_date: Some(
                    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
                ),
                title: "Анонс".to_string(),
                clicks: 120,
                regs: 30,
                active: 6,
            },
            FunnelRow {
                id: "12".to_string(),
                link: "https://example.com/12".to_string(),
                fact_publication_date: None,
                title: "Соцсеть: Дзен. Паблик/профиль: Грамота.ру. Тип публикации: статья. \
                        Дата публикации: 2024-01-05. Название публикации: Разбор."
                    .to_string(),
                clicks: 40,
                regs: 0,
                active: 0,
                ..Default::default()
            },
        ])
    }

    async fn funnel_totals(&self, _tr: &TimeRange) -> Result<FunnelRow> {
        Ok(FunnelRow {
            id: "Итог".to_string(),
            clicks: 160,
            regs: 30,
            active: 6,
            ..Default::default()
        })
    }
}

#[tokio::test]
async fn test_report_task_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    let task = ReportTask::new(
        Arc::new(FakeEngine),
        Arc::new(FsObjectStorage::new(root.path())),
        "results",
    );

    let ticket = Uuid::new_v4();
    let range = TimeRange::from_report_dates("01.01.2024", "31.03.2024").unwrap();
    let public_path = task.run(ticket, range).await.unwrap();

    let content = std::fs::read_to_string(Path::new(root.path()).join(&public_path)).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);

    // 没有日期的老横幅排在最前面，汇总行收尾
    assert!(lines[1].starts_with("12,"));
    assert!(lines[1].contains("Дзен"));
    assert!(lines[1].contains("внутренний"));
    assert!(lines[2].starts_with("11,"));
    assert!(lines[2].contains("01.03.2024"));
    assert!(lines[3].starts_with("Итог,"));
    // 120 次点击 30 次注册 → 25%
    assert!(lines[2].ends_with("25,20"));
    assert!(lines[3].ends_with("19,20"));
}
