use std::str::FromStr;

use crate::errors::BannerlinkerError;

/// Distribution channel of a placement. Wire strings are the labels the
/// marketing team puts into the upload table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Vk,
    Telegram,
    Site,
    Dzen,
    Offline,
    Mail,
    Youtube,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::Vk,
        Channel::Telegram,
        Channel::Site,
        Channel::Dzen,
        Channel::Offline,
        Channel::Mail,
        Channel::Youtube,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Vk => "ВК",
            Channel::Telegram => "Телеграм",
            Channel::Site => "Сайт",
            Channel::Dzen => "Дзен",
            Channel::Offline => "Офлайн мероприятие/размещение",
            Channel::Mail => "Почта",
            Channel::Youtube => "Ютуб",
        }
    }

    /// Links published to VK and Telegram get shortened; the other channels
    /// carry the long tracked link as-is.
    pub fn requires_short_link(&self) -> bool {
        matches!(self, Channel::Vk | Channel::Telegram)
    }
}

impl FromStr for Channel {
    type Err = BannerlinkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Channel::ALL
            .iter()
            .find(|c| c.as_str() == trimmed)
            .copied()
            .ok_or_else(|| BannerlinkerError::unknown_channel(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_channels() {
        assert_eq!("ВК".parse::<Channel>().unwrap(), Channel::Vk);
        assert_eq!("Телеграм".parse::<Channel>().unwrap(), Channel::Telegram);
        assert_eq!(
            "Офлайн мероприятие/размещение".parse::<Channel>().unwrap(),
            Channel::Offline
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!("  Ютуб ".parse::<Channel>().unwrap(), Channel::Youtube);
    }

    #[test]
    fn test_parse_unknown_carries_trimmed_value() {
        let err = " Фейсбук ".parse::<Channel>().unwrap_err();
        match err {
            BannerlinkerError::UnknownChannel(v) => assert_eq!(v, "Фейсбук"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_link_subset() {
        assert!(Channel::Vk.requires_short_link());
        assert!(Channel::Telegram.requires_short_link());
        for c in [Channel::Site, Channel::Dzen, Channel::Offline, Channel::Mail, Channel::Youtube] {
            assert!(!c.requires_short_link());
        }
    }
}
