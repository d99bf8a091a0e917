use std::fmt;

/// Crate-wide error type.
///
/// Every failure path in the batch pipeline and the report task resolves to
/// exactly one variant. Each variant carries a stable code, a human-readable
/// detail, a short client-facing label and an HTTP-equivalent severity class
/// (400 = bad input, 404 = unknown reference value, 500 = downstream/system).
#[derive(Debug, Clone)]
pub enum BannerlinkerError {
    ColumnMismatch(String),
    UnknownLinkType(String),
    UnknownChannel(String),
    UnknownPartner(String),
    BannerGeneration(String),
    CantParseFile(String),
    ShortUrlKeyMissing,
    ShortUrlGenerationFailed(String),
    DbUpdateFailed(String),
    RunTracker(String),
    ReportQuery(String),
    ReportUpload(String),
    DatabaseConfig(String),
    FileOperation(String),
    Serialization(String),
}

impl BannerlinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            BannerlinkerError::ColumnMismatch(_) => "E001",
            BannerlinkerError::UnknownLinkType(_) => "E002",
            BannerlinkerError::UnknownChannel(_) => "E003",
            BannerlinkerError::UnknownPartner(_) => "E004",
            BannerlinkerError::BannerGeneration(_) => "E005",
            BannerlinkerError::CantParseFile(_) => "E006",
            BannerlinkerError::ShortUrlKeyMissing => "E007",
            BannerlinkerError::ShortUrlGenerationFailed(_) => "E008",
            BannerlinkerError::DbUpdateFailed(_) => "E009",
            BannerlinkerError::RunTracker(_) => "E010",
            BannerlinkerError::ReportQuery(_) => "E011",
            BannerlinkerError::ReportUpload(_) => "E012",
            BannerlinkerError::DatabaseConfig(_) => "E013",
            BannerlinkerError::FileOperation(_) => "E014",
            BannerlinkerError::Serialization(_) => "E015",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            BannerlinkerError::ColumnMismatch(_) => "Column Mismatch",
            BannerlinkerError::UnknownLinkType(_) => "Unknown Link Type",
            BannerlinkerError::UnknownChannel(_) => "Unknown Channel",
            BannerlinkerError::UnknownPartner(_) => "Unknown Partner",
            BannerlinkerError::BannerGeneration(_) => "Banner Generation Error",
            BannerlinkerError::CantParseFile(_) => "File Parse Error",
            BannerlinkerError::ShortUrlKeyMissing => "Short URL Key Missing",
            BannerlinkerError::ShortUrlGenerationFailed(_) => "Short URL Generation Error",
            BannerlinkerError::DbUpdateFailed(_) => "Database Update Error",
            BannerlinkerError::RunTracker(_) => "Run Tracker Error",
            BannerlinkerError::ReportQuery(_) => "Report Query Error",
            BannerlinkerError::ReportUpload(_) => "Report Upload Error",
            BannerlinkerError::DatabaseConfig(_) => "Database Configuration Error",
            BannerlinkerError::FileOperation(_) => "File Operation Error",
            BannerlinkerError::Serialization(_) => "Serialization Error",
        }
    }

    /// 面向调用方的简短提示（JSON 响应里的 `error` 字段）
    pub fn client_error(&self) -> &'static str {
        match self {
            BannerlinkerError::ColumnMismatch(_) => "Invalid columns format",
            BannerlinkerError::UnknownLinkType(_)
            | BannerlinkerError::UnknownChannel(_)
            | BannerlinkerError::UnknownPartner(_) => "Invalid values",
            BannerlinkerError::BannerGeneration(_) => "Failed to generate banner link",
            BannerlinkerError::CantParseFile(_) => "Can't parse file",
            BannerlinkerError::ShortUrlKeyMissing => "Server configuration error",
            BannerlinkerError::ShortUrlGenerationFailed(_) => "Failed to generate short URL",
            BannerlinkerError::DbUpdateFailed(_) => "Failed to update banner link",
            BannerlinkerError::RunTracker(_) => "Failed to register skill run",
            BannerlinkerError::ReportQuery(_) => "Failed to calculate report",
            BannerlinkerError::ReportUpload(_) => "Failed to upload report",
            BannerlinkerError::DatabaseConfig(_)
            | BannerlinkerError::FileOperation(_)
            | BannerlinkerError::Serialization(_) => "Internal error",
        }
    }

    /// HTTP-equivalent severity class of the error.
    ///
    /// 400 rejects bad input before any side effect, 404 marks unknown
    /// reference values, 500 covers downstream/system failures.
    pub fn http_status(&self) -> u16 {
        match self {
            BannerlinkerError::ColumnMismatch(_) => 400,
            BannerlinkerError::UnknownLinkType(_)
            | BannerlinkerError::UnknownChannel(_)
            | BannerlinkerError::UnknownPartner(_) => 404,
            _ => 500,
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> String {
        match self {
            BannerlinkerError::ColumnMismatch(missing) => format!(
                "Table columns don't match required columns, missing: {}",
                missing
            ),
            BannerlinkerError::UnknownLinkType(value) => format!("Unknown link type: {}", value),
            BannerlinkerError::UnknownChannel(value) => format!("Unknown channel: {}", value),
            BannerlinkerError::UnknownPartner(value) => format!("Unknown partner: {}", value),
            BannerlinkerError::BannerGeneration(detail) => {
                format!("Failed to generate banner link: {}", detail)
            }
            BannerlinkerError::CantParseFile(detail) => format!("Can't parse file: {}", detail),
            BannerlinkerError::ShortUrlKeyMissing => {
                "Short URL secret key is missing".to_string()
            }
            BannerlinkerError::ShortUrlGenerationFailed(detail) => {
                format!("Short URL generation failed: {}", detail)
            }
            BannerlinkerError::DbUpdateFailed(detail) => {
                format!("Failed to update banner record in DB: {}", detail)
            }
            BannerlinkerError::RunTracker(detail) => {
                format!("Failed to update skill run record: {}", detail)
            }
            BannerlinkerError::ReportQuery(detail) => {
                format!("Failed to calculate report data: {}", detail)
            }
            BannerlinkerError::ReportUpload(detail) => {
                format!("Failed to upload report result: {}", detail)
            }
            BannerlinkerError::DatabaseConfig(detail) => detail.clone(),
            BannerlinkerError::FileOperation(detail) => detail.clone(),
            BannerlinkerError::Serialization(detail) => detail.clone(),
        }
    }

    /// 格式化为简洁输出（日志用）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BannerlinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BannerlinkerError {}

// 便捷的构造函数
impl BannerlinkerError {
    pub fn column_mismatch<T: Into<String>>(missing: T) -> Self {
        BannerlinkerError::ColumnMismatch(missing.into())
    }

    pub fn unknown_link_type<T: Into<String>>(value: T) -> Self {
        BannerlinkerError::UnknownLinkType(value.into())
    }

    pub fn unknown_channel<T: Into<String>>(value: T) -> Self {
        BannerlinkerError::UnknownChannel(value.into())
    }

    pub fn unknown_partner<T: Into<String>>(value: T) -> Self {
        BannerlinkerError::UnknownPartner(value.into())
    }

    pub fn banner_generation<T: Into<String>>(detail: T) -> Self {
        BannerlinkerError::BannerGeneration(detail.into())
    }

    pub fn cant_parse_file<T: Into<String>>(detail: T) -> Self {
        BannerlinkerError::CantParseFile(detail.into())
    }

    pub fn short_url_generation_failed<T: Into<String>>(detail: T) -> Self {
        BannerlinkerError::ShortUrlGenerationFailed(detail.into())
    }

    pub fn db_update_failed<T: Into<String>>(detail: T) -> Self {
        BannerlinkerError::DbUpdateFailed(detail.into())
    }

    pub fn run_tracker<T: Into<String>>(detail: T) -> Self {
        BannerlinkerError::RunTracker(detail.into())
    }

    pub fn report_query<T: Into<String>>(detail: T) -> Self {
        BannerlinkerError::ReportQuery(detail.into())
    }

    pub fn report_upload<T: Into<String>>(detail: T) -> Self {
        BannerlinkerError::ReportUpload(detail.into())
    }

    pub fn database_config<T: Into<String>>(detail: T) -> Self {
        BannerlinkerError::DatabaseConfig(detail.into())
    }

    pub fn file_operation<T: Into<String>>(detail: T) -> Self {
        BannerlinkerError::FileOperation(detail.into())
    }

    pub fn serialization<T: Into<String>>(detail: T) -> Self {
        BannerlinkerError::Serialization(detail.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for BannerlinkerError {
    fn from(err: sea_orm::DbErr) -> Self {
        BannerlinkerError::DbUpdateFailed(err.to_string())
    }
}

impl From<std::io::Error> for BannerlinkerError {
    fn from(err: std::io::Error) -> Self {
        BannerlinkerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for BannerlinkerError {
    fn from(err: serde_json::Error) -> Self {
        BannerlinkerError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for BannerlinkerError {
    fn from(err: csv::Error) -> Self {
        BannerlinkerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BannerlinkerError>;
