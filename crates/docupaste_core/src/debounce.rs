//! Deferred, coalesced statistics recomputation.
//!
//! # Responsibility
//! - Provide a single-shot cancellable timer driven by the caller's clock.
//! - Coalesce editor content changes into one `analyze` run per idle window.
//!
//! # Invariants
//! - At most one task is pending; scheduling supersedes the previous one.
//! - A task fires at most once, and only after its due instant.

use crate::analytics::stats::{analyze, DocumentStats};
use crate::config::DebounceConfig;
use log::trace;
use std::time::{Duration, Instant};

/// Single-shot timer holding one pending payload.
///
/// The owner polls with the current instant from its event loop; no
/// background thread is involved.
#[derive(Debug)]
pub struct DeferredTask<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
    generation: u64,
}

#[derive(Debug)]
struct Pending<T> {
    payload: T,
    due: Instant,
}

impl<T> DeferredTask<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            generation: 0,
        }
    }

    /// Schedules `payload` to fire `delay` after `now`, cancelling any
    /// pending payload. Returns the generation of the new task.
    pub fn schedule(&mut self, payload: T, now: Instant) -> u64 {
        self.generation += 1;
        self.pending = Some(Pending {
            payload,
            due: now + self.delay,
        });
        self.generation
    }

    /// Drops the pending payload. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Takes the payload when its due instant has been reached.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref()?.due > now {
            return None;
        }
        self.pending.take().map(|pending| pending.payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Due instant of the pending payload, for sleeping until it is ready.
    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    /// Generation of the most recently scheduled task.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Recomputes [`DocumentStats`] for the latest content after an idle window.
#[derive(Debug)]
pub struct StatsDebouncer {
    task: DeferredTask<String>,
    latest: DocumentStats,
}

impl StatsDebouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            task: DeferredTask::new(config.window),
            latest: DocumentStats::default(),
        }
    }

    /// Computes stats immediately and cancels pending work.
    ///
    /// Used when the editor switches documents.
    pub fn reset(&mut self, content: &str) -> DocumentStats {
        self.task.cancel();
        self.latest = analyze(content);
        self.latest
    }

    /// Records a content change; supersedes any pending recomputation.
    pub fn content_changed(&mut self, content: impl Into<String>, now: Instant) {
        let generation = self.task.schedule(content.into(), now);
        trace!("event=stats_debounce module=debounce status=scheduled generation={generation}");
    }

    /// Runs the surviving recomputation once its window has elapsed.
    ///
    /// Returns the fresh stats when a recomputation ran during this call.
    pub fn poll(&mut self, now: Instant) -> Option<DocumentStats> {
        let content = self.task.poll(now)?;
        self.latest = analyze(&content);
        trace!(
            "event=stats_debounce module=debounce status=fired generation={} words={}",
            self.task.generation(),
            self.latest.word_count
        );
        Some(self.latest)
    }

    pub fn cancel(&mut self) -> bool {
        self.task.cancel()
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_pending()
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.task.due_at()
    }

    /// Stats from the last recomputation.
    pub fn latest(&self) -> DocumentStats {
        self.latest
    }
}

impl Default for StatsDebouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{DeferredTask, StatsDebouncer};
    use crate::config::DebounceConfig;
    use std::time::{Duration, Instant};

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn deferred_task_fires_once_after_delay() {
        let start = Instant::now();
        let mut task = DeferredTask::new(WINDOW);
        task.schedule("a", start);

        assert_eq!(task.poll(start + Duration::from_millis(499)), None);
        assert_eq!(task.poll(start + WINDOW), Some("a"));
        assert_eq!(task.poll(start + WINDOW * 2), None);
        assert!(!task.is_pending());
    }

    #[test]
    fn rescheduling_supersedes_and_restarts_window() {
        let start = Instant::now();
        let mut task = DeferredTask::new(WINDOW);
        task.schedule("first", start);
        task.schedule("second", start + Duration::from_millis(300));

        assert_eq!(task.poll(start + WINDOW), None);
        assert_eq!(
            task.poll(start + Duration::from_millis(800)),
            Some("second")
        );
        assert_eq!(task.generation(), 2);
    }

    #[test]
    fn cancel_discards_pending_payload() {
        let start = Instant::now();
        let mut task = DeferredTask::new(WINDOW);
        task.schedule(1, start);
        assert!(task.cancel());
        assert!(!task.cancel());
        assert_eq!(task.poll(start + WINDOW), None);
    }

    #[test]
    fn debouncer_analyzes_only_latest_content() {
        let start = Instant::now();
        let mut debouncer = StatsDebouncer::new(DebounceConfig { window: WINDOW });
        debouncer.content_changed("one", start);
        debouncer.content_changed("one two", start + Duration::from_millis(100));
        debouncer.content_changed("one two three", start + Duration::from_millis(200));

        assert_eq!(debouncer.poll(start + Duration::from_millis(600)), None);
        let stats = debouncer
            .poll(start + Duration::from_millis(700))
            .expect("latest content should be analyzed");
        assert_eq!(stats.word_count, 3);
        assert_eq!(debouncer.latest().word_count, 3);
        assert!(debouncer.poll(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn reset_cancels_pending_and_computes_now() {
        let start = Instant::now();
        let mut debouncer = StatsDebouncer::default();
        debouncer.content_changed("stale words here", start);
        let stats = debouncer.reset("fresh");
        assert_eq!(stats.word_count, 1);
        assert!(!debouncer.is_pending());
        assert!(debouncer.poll(start + Duration::from_secs(1)).is_none());
    }
}
