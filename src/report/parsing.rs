//! Legacy caption parsing.
//!
//! Old banners carry their metadata only inside a free-form caption
//! (`Соцсеть: ... Паблик/профиль: ...`). When the caption matches, the
//! parsed fields overwrite the row; otherwise the row stays as queried.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::Partner;
use crate::report::aggregate::FunnelRow;

const INTERNAL_PARTNER: &str = "внутренний";
const EXTERNAL_PARTNER: &str = "внешний";

static CAPTION_RE: OnceLock<Regex> = OnceLock::new();

fn caption_re() -> &'static Regex {
    CAPTION_RE.get_or_init(|| {
        Regex::new(
            r"Соцсеть:\s*(.*?)\.\s*(?:Паблик/профиль|Профиль):\s*(.*?)\.\s*Тип публикации:\s*(.*?)\.\s*Дата публикации:\s*(.*?)\.\s*Название публикации:\s*(.*?)\.",
        )
        .expect("caption regex is valid")
    })
}

/// Fields recovered from a legacy caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleParts {
    pub channel: String,
    pub partner: String,
    pub partner_type: String,
    pub publication_type: String,
    pub title: String,
}

/// Parse one caption. `None` when it is not in the legacy format.
pub fn parse_title(title: &str) -> Option<TitleParts> {
    let captures = caption_re().captures(title)?;

    let group = |idx: usize| captures.get(idx).map_or("", |m| m.as_str()).trim();

    let partner = group(2);
    let partner_type = if Partner::is_known(partner) {
        INTERNAL_PARTNER
    } else {
        EXTERNAL_PARTNER
    };

    // 第 4 组（发布日期）被捕获但不使用，日期取自点击统计
    Some(TitleParts {
        channel: group(1).to_string(),
        partner: partner.to_string(),
        partner_type: partner_type.to_string(),
        publication_type: group(3).to_string(),
        title: group(5).to_string(),
    })
}

/// Overwrite a funnel row with caption fields when the caption matches.
pub fn apply(row: &mut FunnelRow) {
    if let Some(parts) = parse_title(&row.title) {
        row.channel = parts.channel;
        row.partner = parts.partner;
        row.partner_type = parts.partner_type;
        row.publication_type = parts.publication_type;
        row.title = parts.title;
    }
}
