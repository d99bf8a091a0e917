//! Civil-time helpers.
//!
//! Captions and report dates use Moscow time regardless of where the
//! service runs; storage keeps UTC.

use chrono::{DateTime, FixedOffset, Utc};

const MSK_OFFSET_SECS: i32 = 3 * 3600;

pub fn msk_offset() -> FixedOffset {
    // 固定偏移，永远有效
    FixedOffset::east_opt(MSK_OFFSET_SECS).unwrap()
}

pub fn now_msk() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&msk_offset())
}

/// Caption date, `YYYY-MM-DD`.
pub fn generation_date() -> String {
    now_msk().format("%Y-%m-%d").to_string()
}

/// Report display date, `DD.MM.YYYY` in Moscow time.
pub fn format_report_date(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&msk_offset()).format("%d.%m.%Y").to_string()
}
