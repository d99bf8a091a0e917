//! 静态配置（从 TOML 加载，启动时使用）
//!
//! 优先级：ENV > config.toml > 默认值
//! ENV 前缀：BL，分隔符：__
//! 示例：BL__SERVER__PORT=9999

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Get the global configuration instance.
pub fn get_config() -> &'static AppConfig {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
}

/// Initialize the global configuration from "config.toml" and the
/// environment. Missing file falls back to defaults.
pub fn init_config() {
    CONFIG.get_or_init(AppConfig::load);
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub banner_api: BannerApiConfig,
    #[serde(default)]
    pub short_url: ShortUrlConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path = "config.toml";

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("BL")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<AppConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
}

/// Banner 创建服务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerApiConfig {
    #[serde(default = "default_banner_api_endpoint")]
    pub endpoint: String,
}

/// 短链接服务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortUrlConfig {
    #[serde(default = "default_short_url_endpoint")]
    pub endpoint: String,
    /// 未配置时生成 VK/Telegram 链接会报错
    #[serde(default)]
    pub secret_key: Option<String>,
}

/// 报表结果存储
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_bucket")]
    pub bucket_name: String,
    #[serde(default = "default_report_results_dir")]
    pub results_dir: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "postgres://localhost/bannerlinker".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_banner_api_endpoint() -> String {
    "http://localhost:8090/banners".to_string()
}

fn default_short_url_endpoint() -> String {
    "https://lab.sirius.online/lab-noo/developer/shorten-link".to_string()
}

fn default_report_bucket() -> String {
    "results".to_string()
}

fn default_report_results_dir() -> String {
    "./report-results".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
        }
    }
}

impl Default for BannerApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_banner_api_endpoint(),
        }
    }
}

impl Default for ShortUrlConfig {
    fn default() -> Self {
        Self {
            endpoint: default_short_url_endpoint(),
            secret_key: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            bucket_name: default_report_bucket(),
            results_dir: default_report_results_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
