//! 存储层的数据模型

use chrono::{DateTime, Utc};

/// One generated banner link as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerLinkRecord {
    pub banner_id: i64,
    pub banner_link: String,
    pub title: String,
    pub link: String,
    pub publication_type: String,
    pub is_outer: bool,
    pub channel: String,
    pub is_technical: bool,
    pub partner: String,
    /// 仅 dry-run 生成的记录为 true
    pub is_deleted: bool,
    pub time_created: DateTime<Utc>,
}
