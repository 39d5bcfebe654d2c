//! Listening-time ledger.
//!
//! Converts audio time-update events into credited wall-clock seconds.
//! Intervals at or above the configured gap are dropped, which keeps tab
//! suspension and clock jumps from inflating the total.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Result of feeding one time-update sample to the ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// First sample since a bind or resume; only the timestamp was recorded.
    Started,
    /// The interval was added to the accumulated total.
    Credited(f64),
    /// The interval was too long (or not positive) and was dropped.
    Discarded(f64),
}

/// Accumulated-but-unflushed listening seconds for the bound track.
#[derive(Debug, Clone)]
pub struct ListeningLedger {
    accumulated_secs: f64,
    last_sample: Option<DateTime<Utc>>,
    max_gap: Duration,
}

impl ListeningLedger {
    pub fn new(max_gap: Duration) -> Self {
        Self {
            accumulated_secs: 0.0,
            last_sample: None,
            max_gap,
        }
    }

    /// Record a time-update observed at `now`.
    pub fn record_sample(&mut self, now: DateTime<Utc>) -> SampleOutcome {
        let previous = self.last_sample.replace(now);
        let Some(previous) = previous else {
            return SampleOutcome::Started;
        };

        let delta_secs = now.signed_duration_since(previous).num_milliseconds() as f64 / 1000.0;
        if delta_secs > 0.0 && delta_secs < self.max_gap.as_secs_f64() {
            self.accumulated_secs += delta_secs;
            SampleOutcome::Credited(delta_secs)
        } else {
            SampleOutcome::Discarded(delta_secs)
        }
    }

    pub fn accumulated_secs(&self) -> f64 {
        self.accumulated_secs
    }

    pub fn last_sample(&self) -> Option<DateTime<Utc>> {
        self.last_sample
    }

    /// Whether the periodic timer should flush.
    pub fn reached(&self, threshold_secs: f64) -> bool {
        self.accumulated_secs >= threshold_secs
    }

    /// Drain the ledger, returning the whole seconds to report.
    ///
    /// The fractional remainder is dropped and the sample baseline moves to
    /// `now`, so the next interval is measured from the flush.
    pub fn take_flush(&mut self, now: DateTime<Utc>) -> u64 {
        let whole = self.accumulated_secs.floor().max(0.0) as u64;
        self.accumulated_secs = 0.0;
        self.last_sample = Some(now);
        whole
    }

    /// Forget the sample baseline; used on resume so paused time is not credited.
    pub fn clear_sample(&mut self) {
        self.last_sample = None;
    }

    /// Drop everything; used when a new track is bound.
    pub fn reset(&mut self) {
        self.accumulated_secs = 0.0;
        self.last_sample = None;
    }
}
