//! Short-link client for the external shortening service.
//!
//! The service takes a long tracked link and answers with
//! `{"success": {"newShortLink": ...}}`. The auth secret is injected at
//! construction; a missing secret is a functional error raised before any
//! network call.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{trace, warn};
use ureq::Agent;

use crate::errors::{BannerlinkerError, Result};

/// 短链接请求超时时间
const SHORTEN_TIMEOUT_SECS: u64 = 10;

static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(SHORTEN_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

/// Shortening collaborator.
///
/// `Ok(Some(short))` replaces the long link, `Ok(None)` keeps it (the
/// service answered without the expected field).
#[async_trait]
pub trait UrlShortener: Send + Sync {
    async fn shorten(&self, long_link: &str) -> Result<Option<String>>;
}

/// HTTP implementation of [`UrlShortener`].
pub struct HttpUrlShortener {
    endpoint: String,
    secret_key: Option<String>,
}

impl HttpUrlShortener {
    pub fn new(endpoint: &str, secret_key: Option<String>) -> Self {
        // 把空串视为未配置
        let secret_key = secret_key.filter(|k| !k.is_empty());
        Self {
            endpoint: endpoint.to_string(),
            secret_key,
        }
    }

    /// 同步请求，在 spawn_blocking 中调用
    fn shorten_sync(endpoint: String, key: String, long_link: String) -> Result<Option<String>> {
        let agent = get_agent();

        let body = serde_json::json!({ "longLink": long_link });

        let resp = agent
            .post(&endpoint)
            .header("accept", "application/json;charset=utf-8")
            .header("Authorization", &key)
            .send_json(&body)
            .map_err(|e| {
                warn!("Shorten request to \"{}\" failed: {}", endpoint, e);
                BannerlinkerError::short_url_generation_failed(e.to_string())
            })?;

        let json: serde_json::Value = resp.into_body().read_json().map_err(|e| {
            BannerlinkerError::short_url_generation_failed(format!("malformed response: {}", e))
        })?;

        let Some(success) = json.get("success") else {
            return Err(BannerlinkerError::short_url_generation_failed(
                "response has no success payload",
            ));
        };

        // success 里没有 newShortLink 时保留长链接，不算错误
        match success.get("newShortLink").and_then(|v| v.as_str()) {
            Some(short) => {
                trace!("Shortened link: {} -> {}", long_link, short);
                Ok(Some(short.to_string()))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UrlShortener for HttpUrlShortener {
    async fn shorten(&self, long_link: &str) -> Result<Option<String>> {
        // 没有密钥就不发请求
        let Some(key) = self.secret_key.clone() else {
            return Err(BannerlinkerError::ShortUrlKeyMissing);
        };

        let endpoint = self.endpoint.clone();
        let long_link = long_link.to_string();

        tokio::task::spawn_blocking(move || Self::shorten_sync(endpoint, key, long_link))
            .await
            .unwrap_or_else(|e| {
                Err(BannerlinkerError::short_url_generation_failed(format!(
                    "spawn_blocking failed: {}",
                    e
                )))
            })
    }
}
