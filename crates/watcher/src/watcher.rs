//! The polling loop.
//!
//! Each cycle fetches everything that changed since the cursor, validates the
//! response, and relays one message per homework whose status text differs from
//! the last one sent. Failures are reported to the chat once per distinct error
//! and retried on the next cycle; a failing chat ends the loop, since there is
//! nowhere left to report to.

use std::time::Duration;

use herald_common::error::WatchError;
use herald_notifier::Notifier;

use crate::cache::{DedupKey, NotificationCache};
use crate::client::StatusSource;
use crate::formatter;
use crate::validator;

/// Result of a cycle that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Homeworks were processed; poll again after the retry period.
    Continue,
    /// The API reported no homeworks.
    NoItems,
}

/// Why the watch loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No homeworks left to watch.
    NoItems,
    /// The notification channel failed; further errors cannot be reported.
    NotifierBroken,
}

/// Polls a [`StatusSource`] on a fixed period and relays changes to a [`Notifier`].
pub struct Watcher<S, N> {
    source: S,
    notifier: N,
    cache: NotificationCache,
    cursor: i64,
    retry_period: Duration,
}

impl<S: StatusSource, N: Notifier> Watcher<S, N> {
    /// `start_cursor` is the first `from_date` requested, usually the current time.
    pub fn new(source: S, notifier: N, start_cursor: i64, retry_period: Duration) -> Self {
        Self {
            source,
            notifier,
            cache: NotificationCache::new(),
            cursor: start_cursor,
            retry_period,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn cache(&self) -> &NotificationCache {
        &self.cache
    }

    /// Run cycles until a stop condition is reached.
    ///
    /// The retry period is slept after every cycle, successful or not, except
    /// the one that stops the loop: there is no next cycle to pace.
    pub async fn run(&mut self) -> StopReason {
        tracing::info!(
            cursor = self.cursor,
            retry_period_secs = self.retry_period.as_secs(),
            "Homework watcher started"
        );

        loop {
            if let Some(reason) = self.step().await {
                tracing::info!(?reason, cursor = self.cursor, "Homework watcher stopped");
                return reason;
            }
            tokio::time::sleep(self.retry_period).await;
        }
    }

    /// Run one cycle and apply the recovery policy to its outcome.
    ///
    /// Returns `Some` when the loop must stop.
    pub async fn step(&mut self) -> Option<StopReason> {
        match self.run_cycle().await {
            Ok(CycleOutcome::Continue) => None,
            Ok(CycleOutcome::NoItems) => Some(StopReason::NoItems),
            Err(e) => self.recover(e).await,
        }
    }

    /// Fetch, validate and relay one batch of homework statuses.
    ///
    /// The cursor only moves when every homework in the batch went through.
    /// A clean cycle also clears the error slot, so a failure that comes back
    /// after a recovery is reported again rather than suppressed for the
    /// lifetime of the process.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, WatchError> {
        let payload = self.source.fetch(self.cursor).await?;
        let page = validator::check_response(&payload)?;

        if page.homeworks.is_empty() {
            tracing::info!(cursor = self.cursor, "No homeworks reported, nothing left to watch");
            return Ok(CycleOutcome::NoItems);
        }

        for entry in &page.homeworks {
            let item = formatter::parse_status(entry)?;
            let message = item.message();
            let key = DedupKey::Item(item.name.clone());

            if !self.cache.is_new(&key, &message) {
                tracing::debug!(homework = %item.name, status = %item.status, "Status unchanged, skipping");
                continue;
            }

            self.notifier.send(&message).await?;
            tracing::info!(homework = %item.name, status = %item.status, "Status change relayed");
            self.cache.record(key, message);
        }

        match page.current_date {
            Some(current_date) => {
                tracing::debug!(from = self.cursor, to = current_date, "Cursor advanced");
                self.cursor = current_date;
            }
            None => tracing::warn!(cursor = self.cursor, "Response has no current_date, cursor kept"),
        }
        // A clean cycle ends the current failure streak.
        self.cache.clear(&DedupKey::Error);

        Ok(CycleOutcome::Continue)
    }

    async fn recover(&mut self, error: WatchError) -> Option<StopReason> {
        tracing::error!(error = %error, cursor = self.cursor, "Polling cycle failed");

        if error.is_fatal() {
            return Some(StopReason::NotifierBroken);
        }

        let message = format!("Program failure: {error}");
        if !self.cache.is_new(&DedupKey::Error, &message) {
            tracing::debug!("Same failure already reported, not notifying again");
            return None;
        }

        if let Err(e) = self.notifier.send(&message).await {
            tracing::error!(error = %e, "Could not report failure to chat");
            return Some(StopReason::NotifierBroken);
        }
        self.cache.record(DedupKey::Error, message);
        None
    }
}
