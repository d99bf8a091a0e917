//! Banner-link generation for one validated row.
//!
//! Builds the tracking caption, mints the banner link through the external
//! API and, for channels that need it, swaps in a shortened link.

use std::sync::Arc;

use tracing::{debug, info};

use crate::client::BannerApi;
use crate::errors::{BannerlinkerError, Result};
use crate::services::row::BannerLinkRequestRow;
use crate::services::shortener::UrlShortener;
use crate::utils::time::generation_date;

/// One generated banner link, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerLinkResult {
    pub banner_id: i64,
    pub banner_link: String,
}

pub struct LinkGenerator {
    api: Arc<dyn BannerApi>,
    shortener: Arc<dyn UrlShortener>,
}

impl LinkGenerator {
    pub fn new(api: Arc<dyn BannerApi>, shortener: Arc<dyn UrlShortener>) -> Self {
        Self { api, shortener }
    }

    /// Caption attached to the minted banner. Cell values go in raw, only
    /// the generation date is computed (Moscow time).
    pub fn build_caption(row: &BannerLinkRequestRow) -> String {
        format!(
            "Канал: {}.\nПартнёр: {}.\nНазвание публикации: {}.\nДата генерации: {}.",
            row.channel,
            row.partner,
            row.description,
            generation_date()
        )
    }

    /// Generate the tracked link for one row.
    ///
    /// `is_test` skips the shortening step so dry runs never spend short
    /// links.
    pub async fn generate(
        &self,
        row: &BannerLinkRequestRow,
        is_test: bool,
    ) -> Result<BannerLinkResult> {
        let link_type = row.link_type()?;
        let channel = row.channel()?;
        let caption = Self::build_caption(row);

        let created = self
            .api
            .create_banner(&row.link, link_type, &caption)
            .await
            .map_err(|e| match e {
                err @ BannerlinkerError::BannerGeneration(_) => err,
                other => BannerlinkerError::banner_generation(other.to_string()),
            })?;

        let mut banner_link = created.banner_link;

        if channel.requires_short_link() && !is_test {
            if let Some(short) = self.shortener.shorten(&banner_link).await? {
                debug!("Replaced long link with short one: {}", short);
                banner_link = short;
            }
        }

        info!(
            "Generated banner link id={} for \"{}\"",
            created.banner_id, row.link
        );

        Ok(BannerLinkResult {
            banner_id: created.banner_id,
            banner_link,
        })
    }
}
