//! Bannerlinker - tracked banner links for media placements
//!
//! This library provides the core functionality of the bannerlinker
//! service: batch generation of tracked banner links from uploaded
//! tables and click/registration/activation funnel reports over them.
//!
//! # Architecture
//! - `domain`: reference vocabulary (channels, partners, publication types)
//! - `services`: validation, link generation and batch orchestration
//! - `client`: outbound HTTP clients (banner API)
//! - `storage`: SeaORM persistence for links and run tracking
//! - `report`: funnel queries, caption parsing and CSV export
//! - `api`: HTTP services
//! - `config`: configuration management

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod errors;
pub mod report;
pub mod services;
pub mod storage;
pub mod utils;
