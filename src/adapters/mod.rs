//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP clients, third-party notification APIs).
//!
//! Adapter categories:
//! - `explorer`: Esplora block explorer REST client
//! - `notify`: Webhook, chat and push notification endpoints

pub mod explorer;
pub mod notify;
