//! Batch orchestration: parse the uploaded payload, validate it, generate
//! a banner link per row, persist each link and track the run.
//!
//! Rows are processed strictly in upload order. The first failing row
//! aborts the batch; links persisted before the failure stay persisted.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::{BannerlinkerError, Result};
use crate::services::generation::LinkGenerator;
use crate::services::row::{BannerLinkRequestRow, Record};
use crate::services::validation;
use crate::storage::{BannerLinkRecord, BannerLinkSink, RunTracker};

/// 执行记录里的技能名
pub const SKILL_NAME: &str = "BannerLinksMedia";

/// Everything a finished batch hands back to the caller.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Uploaded records with the generated link appended to each.
    pub records: Vec<Record>,
    /// Generated links, in upload order.
    pub banner_links: Vec<String>,
}

/// Parse the uploaded payload (a JSON array of objects) into records.
///
/// Non-string values are stringified; records with every value empty are
/// dropped.
pub fn parse_records(payload: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| BannerlinkerError::cant_parse_file(e.to_string()))?;

    let Some(items) = value.as_array() else {
        return Err(BannerlinkerError::cant_parse_file(
            "payload is not a JSON array",
        ));
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let Some(object) = item.as_object() else {
            return Err(BannerlinkerError::cant_parse_file(
                "payload entry is not a JSON object",
            ));
        };

        let record: Record = object
            .iter()
            .map(|(key, value)| {
                let cell = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key.clone(), cell)
            })
            .collect();

        if record.values().all(String::is_empty) {
            continue;
        }
        records.push(record);
    }

    Ok(records)
}

pub struct BatchProcessor {
    generator: LinkGenerator,
    sink: Arc<dyn BannerLinkSink>,
    tracker: Arc<dyn RunTracker>,
}

impl BatchProcessor {
    pub fn new(
        generator: LinkGenerator,
        sink: Arc<dyn BannerLinkSink>,
        tracker: Arc<dyn RunTracker>,
    ) -> Self {
        Self {
            generator,
            sink,
            tracker,
        }
    }

    /// Run the whole batch for one uploaded payload.
    pub async fn process(&self, payload: &str, is_test: bool) -> Result<BatchOutcome> {
        let mut records = parse_records(payload)?;

        let run_id = self.tracker.register_running(SKILL_NAME, payload).await?;
        info!("Run {} started with {} records", run_id, records.len());

        if let Err(e) = validation::validate(&records) {
            self.fail_run(run_id, &e).await;
            return Err(e);
        }

        let mut banner_links = Vec::with_capacity(records.len());
        for record in records.iter_mut() {
            let row = BannerLinkRequestRow::from_record(record);

            let result = match self.generator.generate(&row, is_test).await {
                Ok(result) => result,
                Err(e) => {
                    self.fail_run(run_id, &e).await;
                    return Err(e);
                }
            };

            // 落库存上传表里的原始值（去掉首尾空白），报表直接展示这些列
            let link_record = BannerLinkRecord {
                banner_id: result.banner_id,
                banner_link: result.banner_link.clone(),
                title: row.description.trim().to_string(),
                link: row.link.trim().to_string(),
                publication_type: row.publication_type.trim().to_string(),
                is_outer: row.is_outer(),
                channel: row.channel.trim().to_string(),
                is_technical: row.is_technical_flag(),
                partner: row.partner.trim().to_string(),
                is_deleted: is_test,
                time_created: Utc::now(),
            };

            if let Err(e) = self.sink.insert(link_record).await {
                self.fail_run(run_id, &e).await;
                return Err(e);
            }

            record.insert("banner_links".to_string(), result.banner_link.clone());
            banner_links.push(result.banner_link);
        }

        if let Err(e) = self
            .tracker
            .register_succeeded(run_id, &banner_links.join("\n"))
            .await
        {
            // 结果已经生成，只记录跟踪失败
            error!("Failed to mark run {} as succeeded: {}", run_id, e);
        }

        info!("Run {} finished, {} links generated", run_id, banner_links.len());
        Ok(BatchOutcome {
            records,
            banner_links,
        })
    }

    async fn fail_run(&self, run_id: Uuid, cause: &BannerlinkerError) {
        if let Err(e) = self.tracker.register_failed(run_id, &cause.to_string()).await {
            error!("Failed to mark run {} as failed: {}", run_id, e);
        }
    }
}
