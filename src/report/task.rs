//! Report task: query, lay out, export, upload.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::{BannerlinkerError, Result};
use crate::report::aggregate::{FunnelRow, build_report};
use crate::report::repo::TimeRange;
use crate::utils::csv_handler;

/// 结果存储里报表的固定前缀
pub const REPORT_PREFIX: &str = "rob-analytics/reports/banner_links_media";

/// Read side of the report pipeline.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn funnel_rows(&self, tr: &TimeRange) -> Result<Vec<FunnelRow>>;
    async fn funnel_totals(&self, tr: &TimeRange) -> Result<FunnelRow>;
}

/// Result storage for finished report files.
///
/// Returns `(bucket_path, result_path)`; the public link is the two parts
/// joined with `/`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn save(
        &self,
        bucket: &str,
        result_id: Uuid,
        local_path: &Path,
        prefix: &str,
    ) -> Result<(String, String)>;
}

/// Filesystem-backed result storage. Mirrors the bucket/prefix layout of
/// an object store under a local root directory.
pub struct FsObjectStorage {
    root: std::path::PathBuf,
}

impl FsObjectStorage {
    pub fn new<P: Into<std::path::PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStorage for FsObjectStorage {
    async fn save(
        &self,
        bucket: &str,
        result_id: Uuid,
        local_path: &Path,
        prefix: &str,
    ) -> Result<(String, String)> {
        let file_name = local_path
            .file_name()
            .ok_or_else(|| BannerlinkerError::report_upload("result file has no name"))?
            .to_string_lossy()
            .to_string();

        let result_path = format!("{}/{}/{}", prefix, result_id, file_name);
        let target = self.root.join(bucket).join(&result_path);

        let parent = target
            .parent()
            .ok_or_else(|| BannerlinkerError::report_upload("result path has no parent"))?;
        fs::create_dir_all(parent)
            .map_err(|e| BannerlinkerError::report_upload(format!("mkdir failed: {}", e)))?;
        fs::copy(local_path, &target)
            .map_err(|e| BannerlinkerError::report_upload(format!("copy failed: {}", e)))?;

        Ok((bucket.to_string(), result_path))
    }
}

pub struct ReportTask {
    engine: Arc<dyn QueryEngine>,
    storage: Arc<dyn ObjectStorage>,
    bucket_name: String,
}

impl ReportTask {
    pub fn new(
        engine: Arc<dyn QueryEngine>,
        storage: Arc<dyn ObjectStorage>,
        bucket_name: &str,
    ) -> Self {
        Self {
            engine,
            storage,
            bucket_name: bucket_name.to_string(),
        }
    }

    /// Build and upload one report. Returns the public path of the CSV.
    pub async fn run(&self, ticket: Uuid, range: TimeRange) -> Result<String> {
        let rows = self.engine.funnel_rows(&range).await?;
        let total = self.engine.funnel_totals(&range).await?;
        info!("Report {}: {} funnel rows", ticket, rows.len());

        let table = build_report(rows, total);

        let tempdir = tempfile::Builder::new()
            .suffix(&ticket.to_string())
            .tempdir()
            .map_err(|e| BannerlinkerError::report_upload(format!("tempdir failed: {}", e)))?;
        let report_file = tempdir.path().join(format!("report_{}.csv", ticket));
        csv_handler::write_table(&table, &report_file)?;

        let (bucket_path, result_path) = self
            .storage
            .save(&self.bucket_name, ticket, &report_file, REPORT_PREFIX)
            .await
            .inspect_err(|e| error!("Report {} upload failed: {}", ticket, e))?;

        Ok(format!("{}/{}", bucket_path, result_path))
    }
}
