//! Address Monitor - Poll, Compare, Notify
//!
//! The main use case:
//! 1. Fetches each configured address's balance via `BalanceSource`
//! 2. Classifies it against the last observed balance
//! 3. Notifies on increase or decrease (and optionally on fetch errors)
//! 4. Records the new balance
//!
//! Addresses are checked strictly one after another, then the monitor
//! sleeps for the configured interval. It runs until the process is
//! terminated.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument, warn};

use crate::config::MonitorConfig;
use crate::domain::{AddressDescriptor, AddressState, Alert, Balance, BalanceChange};
use crate::domain::balance::DISPLAY_UNIT;
use crate::error::{ConfigError, FetchError};
use crate::ports::BalanceSource;

use super::dispatcher::NotificationDispatcher;

/// Loop parameters taken from the configuration.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
  /// Addresses to watch, in polling order.
  pub addresses: Vec<AddressDescriptor>,
  /// Sleep between rounds.
  pub interval: Duration,
  /// Notify on fetch failures too.
  pub notify_errors: bool,
}

impl From<&MonitorConfig> for MonitorSettings {
  fn from(config: &MonitorConfig) -> Self {
    Self {
      addresses: config.addresses.clone(),
      interval: config.interval(),
      notify_errors: config.notify_errors,
    }
  }
}

/// Result of checking one address.
#[derive(Debug)]
pub enum AddressOutcome {
  /// Balance fetched and recorded.
  Observed {
    balance: Balance,
    change: BalanceChange,
  },
  /// Balance could not be fetched; state untouched.
  Failed(FetchError),
}

/// Totals for one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundSummary {
  /// Addresses checked.
  pub checked: usize,
  /// Addresses whose fetch failed.
  pub failed: usize,
  /// Alerts raised (change and error alerts).
  pub notifications: usize,
}

/// Periodically checks every configured address for balance changes.
pub struct AddressMonitor<S: BalanceSource> {
  /// Balance lookups.
  source: Arc<S>,
  /// Notification fan-out.
  dispatcher: NotificationDispatcher,
  /// Watched addresses.
  addresses: Arc<[AddressDescriptor]>,
  /// Last observed balances.
  state: AddressState,
  /// Sleep between rounds.
  interval: Duration,
  /// Notify on fetch failures.
  notify_errors: bool,
  /// Rounds completed.
  rounds: u64,
}

impl<S: BalanceSource> AddressMonitor<S> {
  /// Create a monitor ready to run.
  ///
  /// # Errors
  /// `ConfigError::NoAddresses` if there is nothing to watch.
  pub fn new(
    source: Arc<S>,
    dispatcher: NotificationDispatcher,
    settings: MonitorSettings,
  ) -> Result<Self, ConfigError> {
    if settings.addresses.is_empty() {
      return Err(ConfigError::NoAddresses);
    }

    let state = AddressState::new(&settings.addresses);

    info!(
      addresses = settings.addresses.len(),
      interval_secs = settings.interval.as_secs_f64(),
      notify_errors = settings.notify_errors,
      endpoints = dispatcher.len(),
      "Address monitor initialized"
    );

    Ok(Self {
      source,
      dispatcher,
      addresses: settings.addresses.into(),
      state,
      interval: settings.interval,
      notify_errors: settings.notify_errors,
      rounds: 0,
    })
  }

  /// Last observed balances.
  pub fn state(&self) -> &AddressState {
    &self.state
  }

  /// Rounds completed so far.
  pub fn rounds(&self) -> u64 {
    self.rounds
  }

  /// Run rounds forever, sleeping `interval` after each one.
  pub async fn run(&mut self) {
    info!(
      addresses = self.addresses.len(),
      interval_secs = self.interval.as_secs_f64(),
      "Starting monitoring loop"
    );

    loop {
      self.run_round().await;
      tokio::time::sleep(self.interval).await;
    }
  }

  /// Check every address once, in configured order.
  ///
  /// A failure on one address never stops the round.
  #[instrument(skip(self))]
  pub async fn run_round(&mut self) -> RoundSummary {
    let mut summary = RoundSummary::default();
    let addresses = Arc::clone(&self.addresses);

    for item in addresses.iter() {
      summary.checked += 1;
      let (outcome, notified) = self.check_address(item).await;
      if matches!(outcome, AddressOutcome::Failed(_)) {
        summary.failed += 1;
      }
      if notified {
        summary.notifications += 1;
      }
    }

    self.rounds += 1;
    info!(
      round = self.rounds,
      checked = summary.checked,
      failed = summary.failed,
      notifications = summary.notifications,
      "Round complete"
    );

    summary
  }

  /// Fetch, classify, notify and record one address.
  ///
  /// Returns the outcome and whether an alert was raised.
  #[instrument(skip(self, item), fields(address = %item.address, title = item.label()))]
  pub async fn check_address(&mut self, item: &AddressDescriptor) -> (AddressOutcome, bool) {
    let balance = match self.source.get_balance(&item.address).await {
      Ok(balance) => balance,
      Err(e) => {
        error!(error = %e, "Error fetching balance");
        let notified = if self.notify_errors {
          self
            .dispatcher
            .send_alert(&Alert::monitor_error(item, &e))
            .await;
          true
        } else {
          false
        };
        return (AddressOutcome::Failed(e), notified);
      }
    };

    let change = BalanceChange::classify(self.state.get(&item.address), balance);

    let alert = match change {
      BalanceChange::Baseline => {
        info!(balance = %balance, unit = DISPLAY_UNIT, "Starting balance");
        None
      }
      BalanceChange::Increased { previous } => {
        let alert = Alert::funds_received(item, previous, balance);
        info!(previous = %previous, balance = %balance, "{}", alert.body);
        Some(alert)
      }
      BalanceChange::Decreased { previous } => {
        let alert = Alert::balance_decreased(item, previous, balance);
        warn!(previous = %previous, balance = %balance, "{}", alert.body);
        Some(alert)
      }
      BalanceChange::Unchanged => None,
    };

    let notified = match alert {
      Some(alert) => {
        self.dispatcher.send_alert(&alert).await;
        true
      }
      None => false,
    };

    self.state.set(&item.address, balance);

    (AddressOutcome::Observed { balance, change }, notified)
  }
}
