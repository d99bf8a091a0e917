//! Closed reference vocabularies for banner link generation.
//!
//! Channels, partners and publication types are fixed sets. Parsing is by
//! exact trimmed string match; an unmatched value is a typed error, never a
//! silent pass-through.

mod channel;
mod link_type;
mod partner;

pub use channel::Channel;
pub use link_type::BannerLinkType;
pub use partner::Partner;
