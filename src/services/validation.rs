//! Upload validation for the banner-links batch.
//!
//! Runs before any external call: first the column check over the whole
//! upload, then per-row reference checks. Any failure aborts the batch.

use std::collections::BTreeSet;
use std::str::FromStr;

use tracing::debug;

use crate::domain::{BannerLinkType, Channel, Partner};
use crate::errors::{BannerlinkerError, Result};
use crate::services::row::{EXTERNAL_PARTNER_MARKER, Record};

/// 必填列
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "link",
    "channel",
    "partner",
    "publication_type",
    "partner_type",
];

/// Every required column must appear in at least one record.
pub fn validate_columns(records: &[Record]) -> Result<()> {
    let present: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !present.contains(column))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(BannerlinkerError::column_mismatch(missing.join(", ")))
    }
}

/// Per-row reference checks: channel, partner, publication type.
///
/// A partner cell is valid when it names a known partner or carries the
/// external `"+"` marker in `partner_type`.
pub fn validate_rows(records: &[Record]) -> Result<()> {
    for record in records {
        let cell = |name: &str| record.get(name).map(String::as_str).unwrap_or_default();

        Channel::from_str(cell("channel"))?;

        let partner = cell("partner");
        let is_outer = cell("partner_type").trim() == EXTERNAL_PARTNER_MARKER;
        if !is_outer && !Partner::is_known(partner) {
            return Err(BannerlinkerError::unknown_partner(partner.trim()));
        }

        BannerLinkType::from_str(cell("publication_type"))?;
    }
    Ok(())
}

pub fn validate(records: &[Record]) -> Result<()> {
    validate_columns(records)?;
    validate_rows(records)?;
    debug!("Validated {} uploaded records", records.len());
    Ok(())
}
