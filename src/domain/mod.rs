//! Domain layer - Balances, address state and alert content.
//!
//! Pure types with no I/O. The monitor use case combines them with the
//! balance source and notifier ports.

pub mod address;
pub mod alert;
pub mod balance;
pub mod state;

pub use address::AddressDescriptor;
pub use alert::{Alert, AlertKind};
pub use balance::{Balance, BalanceChange};
pub use state::AddressState;
