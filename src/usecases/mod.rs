//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the monitor's workflows.
//!
//! Use cases:
//! - `AddressMonitor`: Poll-compare-notify loop over all addresses
//! - `NotificationDispatcher`: Best-effort fan-out to every endpoint

pub mod dispatcher;
pub mod monitor;

pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use monitor::{AddressMonitor, AddressOutcome, MonitorSettings, RoundSummary};
