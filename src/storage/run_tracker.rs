//! SeaORM-backed run tracker.
//!
//! Every batch run gets one row in `skill_executions`; status moves from
//! `running` to `failed` or `succeeded`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::debug;
use uuid::Uuid;

use migration::entities::skill_execution;

use crate::errors::{BannerlinkerError, Result};
use crate::storage::RunTracker;

const STATUS_RUNNING: &str = "running";
const STATUS_FAILED: &str = "failed";
const STATUS_SUCCEEDED: &str = "succeeded";

pub struct SeaOrmRunTracker {
    db: DatabaseConnection,
}

impl SeaOrmRunTracker {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn update_status(&self, run_id: Uuid, status: &str, result: &str) -> Result<()> {
        let model = skill_execution::ActiveModel {
            id: Set(run_id.to_string()),
            status: Set(status.to_string()),
            result: Set(Some(result.to_string())),
            time_updated: Set(Some(Utc::now())),
            ..Default::default()
        };

        model.update(&self.db).await.map_err(|e| {
            BannerlinkerError::run_tracker(format!(
                "Failed to move run {} to {}: {}",
                run_id, status, e
            ))
        })?;

        debug!("Run {} moved to {}", run_id, status);
        Ok(())
    }
}

#[async_trait]
impl RunTracker for SeaOrmRunTracker {
    async fn register_running(&self, skill_name: &str, payload: &str) -> Result<Uuid> {
        let run_id = Uuid::new_v4();
        let model = skill_execution::ActiveModel {
            id: Set(run_id.to_string()),
            skill_name: Set(skill_name.to_string()),
            payload: Set(payload.to_string()),
            status: Set(STATUS_RUNNING.to_string()),
            result: Set(None),
            time_created: Set(Utc::now()),
            time_updated: Set(None),
        };

        model.insert(&self.db).await.map_err(|e| {
            BannerlinkerError::run_tracker(format!("Failed to register run: {}", e))
        })?;

        debug!("Run {} registered as running", run_id);
        Ok(run_id)
    }

    async fn register_failed(&self, run_id: Uuid, reason: &str) -> Result<()> {
        self.update_status(run_id, STATUS_FAILED, reason).await
    }

    async fn register_succeeded(&self, run_id: Uuid, result: &str) -> Result<()> {
        self.update_status(run_id, STATUS_SUCCEEDED, result).await
    }
}
