//! SeaORM-backed banner link store.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, SqlErr};
use tracing::{debug, warn};

use migration::entities::banner_link_media;

use crate::errors::{BannerlinkerError, Result};
use crate::storage::{BannerLinkRecord, BannerLinkSink};

pub struct SeaOrmBannerStore {
    db: DatabaseConnection,
}

impl SeaOrmBannerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BannerLinkSink for SeaOrmBannerStore {
    async fn insert(&self, record: BannerLinkRecord) -> Result<()> {
        let banner_id = record.banner_id;
        let model = banner_link_media::ActiveModel {
            banner_id: Set(record.banner_id),
            banner_link: Set(record.banner_link),
            title: Set(record.title),
            link: Set(record.link),
            publication_type: Set(record.publication_type),
            is_outer: Set(record.is_outer),
            channel: Set(record.channel),
            is_technical: Set(record.is_technical),
            partner: Set(record.partner),
            is_deleted: Set(record.is_deleted),
            time_created: Set(record.time_created),
        };

        match model.insert(&self.db).await {
            Ok(_) => {
                debug!("Banner link {} persisted", banner_id);
                Ok(())
            }
            // 重复的 banner_id 视为已经保存过，不中断批次
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                warn!("Banner link {} already persisted, skipping", banner_id);
                Ok(())
            }
            Err(e) => Err(BannerlinkerError::db_update_failed(format!(
                "Failed to insert banner link {}: {}",
                banner_id, e
            ))),
        }
    }
}
