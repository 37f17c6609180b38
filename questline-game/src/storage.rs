//! Persistence boundary. Engine state is authoritative: flushing an outbox
//! never rolls anything back, failed writes are only logged and reported.
use serde::Serialize;

use crate::event::WriteIntent;

/// Store that applies write-intents to durable records.
/// Platform-specific implementations should provide this.
pub trait QuestStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Apply one write-intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    fn apply(&mut self, intent: &WriteIntent) -> Result<(), Self::Error>;
}

/// One rejected write-intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlushFailure {
    pub index: usize,
    pub op: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    pub applied: usize,
    pub failures: Vec<FlushFailure>,
}

impl FlushReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record<E: std::fmt::Display>(
        &mut self,
        index: usize,
        intent: &WriteIntent,
        result: Result<(), E>,
    ) {
        match result {
            Ok(()) => self.applied += 1,
            Err(err) => {
                log::warn!("persisting {} (#{index}) failed: {err}", intent.label());
                self.failures.push(FlushFailure {
                    index,
                    op: intent.label(),
                    message: err.to_string(),
                });
            }
        }
    }
}

/// Apply every intent in order, continuing past failures.
pub fn flush_outbox<S: QuestStorage + ?Sized>(
    storage: &mut S,
    outbox: &[WriteIntent],
) -> FlushReport {
    let mut report = FlushReport::default();
    for (index, intent) in outbox.iter().enumerate() {
        let result = storage.apply(intent);
        report.record(index, intent, result);
    }
    report
}

#[cfg(feature = "async")]
mod non_blocking {
    use std::future::Future;

    use super::FlushReport;
    use crate::event::WriteIntent;

    /// Asynchronous counterpart of [`super::QuestStorage`].
    pub trait AsyncQuestStorage {
        type Error: std::error::Error + Send + Sync + 'static;

        /// Apply one write-intent.
        ///
        /// # Errors
        ///
        /// Resolves to an error if the store rejects the write.
        fn apply(
            &mut self,
            intent: &WriteIntent,
        ) -> impl Future<Output = Result<(), Self::Error>>;
    }

    /// Apply every intent in order, awaiting each write before the next.
    pub async fn flush_outbox_async<S: AsyncQuestStorage>(
        storage: &mut S,
        outbox: &[WriteIntent],
    ) -> FlushReport {
        let mut report = FlushReport::default();
        for (index, intent) in outbox.iter().enumerate() {
            let result = storage.apply(intent).await;
            report.record(index, intent, result);
        }
        report
    }
}

#[cfg(feature = "async")]
pub use non_blocking::{AsyncQuestStorage, flush_outbox_async};
