//! Live throughput reporting.
//!
//! A ticker task samples two atomic counters once per interval and renders
//! `TPS | Pending` through the [`StatusSink`]. The dispatch path only touches
//! the atomics, so reporting never gates or slows a request.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::effects::sink::{StatusSink, Tone};

/// Counters shared between the dispatch path and the ticker.
#[derive(Debug)]
pub struct ProgressCounters {
    completed:      AtomicU64,
    pending:        AtomicU64,
    /// Milliseconds since `epoch` at the previous sample.
    last_sample_ms: AtomicU64,
    epoch:          Instant,
}

/// One throughput reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Files completed per second since the previous sample.
    pub throughput: f64,
    pub pending:    u64,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TPS: {:.2} | Pending: {}", self.throughput, self.pending)
    }
}

impl Default for ProgressCounters {
    fn default() -> Self { Self::new() }
}

impl ProgressCounters {
    pub fn new() -> Self {
        Self {
            completed:      AtomicU64::new(0),
            pending:        AtomicU64::new(0),
            last_sample_ms: AtomicU64::new(0),
            epoch:          Instant::now(),
        }
    }

    pub fn increment_completed(&self) { self.completed.fetch_add(1, Ordering::Relaxed); }

    pub fn set_pending(&self, n: u64) { self.pending.store(n, Ordering::Relaxed); }

    pub fn pending(&self) -> u64 { self.pending.load(Ordering::Relaxed) }

    /// Swap the completed count to zero and turn it into a rate.
    ///
    /// When no time has passed the count is left for the next sample.
    pub fn sample(&self) -> Sample {
        let now = self.epoch.elapsed().as_millis() as u64;
        let last = self.last_sample_ms.load(Ordering::Acquire);
        let elapsed_ms = now.saturating_sub(last);
        let pending = self.pending();

        if elapsed_ms == 0 {
            return Sample {
                throughput: 0.0,
                pending,
            };
        }

        self.last_sample_ms.store(now, Ordering::Release);
        let done = self.completed.swap(0, Ordering::AcqRel);
        Sample {
            throughput: done as f64 * 1000.0 / elapsed_ms as f64,
            pending,
        }
    }
}

/// Cheap handle the dispatch path uses to report progress and print lines.
#[derive(Clone)]
pub struct ProgressHandle {
    counters: Arc<ProgressCounters>,
    sink:     Arc<dyn StatusSink>,
}

impl ProgressHandle {
    pub fn increment_completed(&self) { self.counters.increment_completed(); }

    pub fn set_pending(&self, n: u64) { self.counters.set_pending(n); }

    pub fn clear_line(&self) { self.sink.clear_line(); }

    /// Clear any status line, then print `line`, atomically with respect to
    /// the ticker.
    pub fn println(&self, tone: Tone, line: &str) { self.sink.print_line(tone, line); }

    pub fn counters(&self) -> &ProgressCounters { &self.counters }
}

struct Ticker {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Background reporter; [`start`](Self::start) spawns it onto the current
/// tokio runtime and [`stop`](Self::stop) shuts it down cooperatively.
pub struct ProgressMonitor {
    handle:   ProgressHandle,
    interval: Duration,
    ticker:   Option<Ticker>,
}

impl ProgressMonitor {
    pub fn new(sink: Arc<dyn StatusSink>) -> Self { Self::with_interval(sink, Duration::from_secs(1)) }

    pub fn with_interval(sink: Arc<dyn StatusSink>, interval: Duration) -> Self {
        Self {
            handle: ProgressHandle {
                counters: Arc::new(ProgressCounters::new()),
                sink,
            },
            interval,
            ticker: None,
        }
    }

    pub fn handle(&self) -> ProgressHandle { self.handle.clone() }

    pub fn increment_completed(&self) { self.handle.increment_completed(); }

    pub fn set_pending(&self, n: u64) { self.handle.set_pending(n); }

    pub fn clear_line(&self) { self.handle.clear_line(); }

    pub fn is_running(&self) -> bool { self.ticker.as_ref().is_some_and(|t| !t.task.is_finished()) }

    /// Spawn the reporting loop. Calling it twice has no effect.
    pub fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }
        let (stop, mut stopped) = watch::channel(false);
        let counters = Arc::clone(&self.handle.counters);
        let sink = Arc::clone(&self.handle.sink);
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        if *stopped.borrow() {
                            break;
                        }
                        sink.write_status(&counters.sample().to_string());
                    }
                    _ = stopped.changed() => break,
                }
            }
        });
        self.ticker = Some(Ticker { stop, task });
    }

    /// Signal the loop, wait for it to exit, and erase the status line.
    ///
    /// A panic inside the loop is logged, never propagated.
    pub async fn stop(&mut self) {
        let Some(ticker) = self.ticker.take() else {
            return;
        };
        let _ = ticker.stop.send(true);
        if let Err(e) = ticker.task.await {
            tracing::warn!(error = %e, "progress ticker ended abnormally");
        }
        self.handle.clear_line();
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            let _ = ticker.stop.send(true);
            ticker.task.abort();
        }
    }
}
