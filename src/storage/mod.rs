//! Persistence seams for generated links and run tracking.

pub mod banner_store;
pub mod models;
pub mod run_tracker;

pub use banner_store::SeaOrmBannerStore;
pub use models::BannerLinkRecord;
pub use run_tracker::SeaOrmRunTracker;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::Result;

/// Persistence sink for generated banner links.
#[async_trait]
pub trait BannerLinkSink: Send + Sync {
    async fn insert(&self, record: BannerLinkRecord) -> Result<()>;
}

/// Run-status tracking for one batch execution.
#[async_trait]
pub trait RunTracker: Send + Sync {
    /// Register a new run and return its identifier.
    async fn register_running(&self, skill_name: &str, payload: &str) -> Result<Uuid>;
    async fn register_failed(&self, run_id: Uuid, reason: &str) -> Result<()>;
    async fn register_succeeded(&self, run_id: Uuid, result: &str) -> Result<()>;
}
