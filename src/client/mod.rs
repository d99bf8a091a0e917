//! Banner-creation service client.
//!
//! The tracked banner link itself is minted by an external service; this
//! module holds the trait seam plus the HTTP implementation.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{trace, warn};
use ureq::Agent;

use crate::domain::BannerLinkType;
use crate::errors::{BannerlinkerError, Result};

/// HTTP 请求超时时间
const HTTP_TIMEOUT_SECS: u64 = 30;

/// 全局 HTTP Agent（ureq 的 Agent 是 Send + Sync）
static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

/// Result of minting one tracked banner link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedBanner {
    pub banner_id: i64,
    pub banner_link: String,
}

/// Link-creation collaborator.
///
/// Mints a tracked banner link + identifier for a destination URL. Any
/// failure surfaces as `BannerGeneration`.
#[async_trait]
pub trait BannerApi: Send + Sync {
    async fn create_banner(
        &self,
        link: &str,
        link_type: BannerLinkType,
        description: &str,
    ) -> Result<CreatedBanner>;
}

/// HTTP implementation of [`BannerApi`].
pub struct HttpBannerApi {
    endpoint: String,
}

impl HttpBannerApi {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }

    /// 同步请求，在 spawn_blocking 中调用
    fn create_sync(
        endpoint: String,
        link: String,
        link_type: BannerLinkType,
        description: String,
    ) -> Result<CreatedBanner> {
        let agent = get_agent();

        let body = serde_json::json!({
            "link": link,
            "type": link_type.code(),
            "description": description,
        });

        let resp = agent
            .post(&endpoint)
            .header("accept", "application/json;charset=utf-8")
            .send_json(&body)
            .map_err(|e| {
                warn!("Banner API request to \"{}\" failed: {}", endpoint, e);
                BannerlinkerError::banner_generation(e.to_string())
            })?;

        let json: serde_json::Value = resp.into_body().read_json().map_err(|e| {
            BannerlinkerError::banner_generation(format!("malformed response: {}", e))
        })?;

        let banner_link = json["link"]
            .as_str()
            .ok_or_else(|| {
                BannerlinkerError::banner_generation("response is missing `link` field")
            })?
            .to_string();
        let banner_id = json["id"].as_i64().ok_or_else(|| {
            BannerlinkerError::banner_generation("response is missing `id` field")
        })?;

        trace!("Banner API minted id={} for {}", banner_id, link);
        Ok(CreatedBanner {
            banner_id,
            banner_link,
        })
    }
}

#[async_trait]
impl BannerApi for HttpBannerApi {
    async fn create_banner(
        &self,
        link: &str,
        link_type: BannerLinkType,
        description: &str,
    ) -> Result<CreatedBanner> {
        let endpoint = self.endpoint.clone();
        let link = link.to_string();
        let description = description.to_string();

        // 使用 spawn_blocking 在线程池中执行同步 HTTP 请求
        tokio::task::spawn_blocking(move || {
            Self::create_sync(endpoint, link, link_type, description)
        })
        .await
        .unwrap_or_else(|e| {
            Err(BannerlinkerError::banner_generation(format!(
                "spawn_blocking failed: {}",
                e
            )))
        })
    }
}
