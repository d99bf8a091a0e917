use std::collections::BTreeMap;
use std::str::FromStr;

use crate::domain::{BannerLinkType, Channel};
use crate::errors::Result;

/// One uploaded table row, column name → raw cell value.
pub type Record = BTreeMap<String, String>;

/// 外部合作方标记（partner_type 列）
pub const EXTERNAL_PARTNER_MARKER: &str = "+";

/// is_technical 列的肯定值
const TECHNICAL_MARKER: &str = "да";

/// One input record of the generation batch. Raw strings as uploaded;
/// typed accessors parse on demand.
#[derive(Debug, Clone, Default)]
pub struct BannerLinkRequestRow {
    pub link: String,
    pub channel: String,
    pub partner: String,
    pub publication_type: String,
    pub description: String,
    pub partner_type: String,
    pub is_technical: String,
}

impl BannerLinkRequestRow {
    pub fn from_record(record: &Record) -> Self {
        let field = |name: &str| record.get(name).cloned().unwrap_or_default();
        Self {
            link: field("link"),
            channel: field("channel"),
            partner: field("partner"),
            publication_type: field("publication_type"),
            description: field("description"),
            partner_type: field("partner_type"),
            is_technical: field("is_technical"),
        }
    }

    pub fn channel(&self) -> Result<Channel> {
        Channel::from_str(&self.channel)
    }

    pub fn link_type(&self) -> Result<BannerLinkType> {
        BannerLinkType::from_str(&self.publication_type)
    }

    /// Partner explicitly marked external via the `"+"` override.
    pub fn is_outer(&self) -> bool {
        self.partner_type.trim() == EXTERNAL_PARTNER_MARKER
    }

    pub fn is_technical_flag(&self) -> bool {
        self.is_technical.trim().to_lowercase() == TECHNICAL_MARKER
    }
}
