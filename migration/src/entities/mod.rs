pub mod banner_link_media;
pub mod skill_execution;
