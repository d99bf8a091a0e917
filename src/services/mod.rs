pub mod batch;
pub mod generation;
pub mod row;
pub mod shortener;
pub mod validation;

pub use batch::{BatchOutcome, BatchProcessor};
pub use generation::{BannerLinkResult, LinkGenerator};
pub use row::{BannerLinkRequestRow, Record};
pub use shortener::{HttpUrlShortener, UrlShortener};
