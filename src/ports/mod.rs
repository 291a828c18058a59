//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the monitor use case
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `BalanceSource`: Confirmed balance lookup for one address
//! - `NotificationEndpoint`: Delivery of one message to one destination
//! - `EndpointFactory`: Endpoint construction from configuration strings

pub mod balance_source;
pub mod notifier;

pub use balance_source::BalanceSource;
pub use notifier::{EndpointFactory, NotificationEndpoint};
