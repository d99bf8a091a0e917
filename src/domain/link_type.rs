use std::str::FromStr;

use crate::errors::BannerlinkerError;

/// Link type code sent to the banner-creation service. Parsed from the
/// free-text `publication_type` column of the upload table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BannerLinkType {
    Post,
    News,
    Banner,
    Presentation,
    Posm,
    Link,
    Card,
    Button,
    Qr,
}

/// publication_type → link type, 9 entries
const LINK_TYPE_TRANSLATION: [(&str, BannerLinkType); 9] = [
    ("пост", BannerLinkType::Post),
    ("новость", BannerLinkType::News),
    ("баннер", BannerLinkType::Banner),
    ("презентация", BannerLinkType::Presentation),
    ("посм", BannerLinkType::Posm),
    ("ссылка", BannerLinkType::Link),
    ("карточка", BannerLinkType::Card),
    ("кнопка", BannerLinkType::Button),
    ("кьюар", BannerLinkType::Qr),
];

impl BannerLinkType {
    /// Wire code expected by the banner-creation service.
    pub fn code(&self) -> &'static str {
        match self {
            BannerLinkType::Post => "post",
            BannerLinkType::News => "news",
            BannerLinkType::Banner => "banner",
            BannerLinkType::Presentation => "presentation",
            BannerLinkType::Posm => "posm",
            BannerLinkType::Link => "link",
            BannerLinkType::Card => "card",
            BannerLinkType::Button => "button",
            BannerLinkType::Qr => "qr",
        }
    }
}

impl FromStr for BannerLinkType {
    type Err = BannerlinkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        LINK_TYPE_TRANSLATION
            .iter()
            .find(|(label, _)| *label == trimmed)
            .map(|(_, ty)| *ty)
            .ok_or_else(|| BannerlinkerError::unknown_link_type(trimmed))
    }
}
