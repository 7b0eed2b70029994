//! Poll ticker: a dedicated thread producing the resize-check interval.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Thread that wakes the event loop at a fixed interval.
///
/// Each tick carries the instant it fired.
pub struct PollTicker {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    tick_rx: Receiver<Instant>,
    interval: Duration,
}

impl PollTicker {
    /// Spawn a ticker with the given interval.
    pub fn spawn(interval: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        // Small buffer: ticks must not queue up behind a slow consumer.
        let (tick_tx, tick_rx) = bounded(2);

        let handle = thread::Builder::new()
            .name("casement-ticker".to_string())
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_clone, interval);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
            interval,
        })
    }

    /// Tick receiver, for use with `select!`.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Instant> {
        &self.tick_rx
    }

    /// Configured interval.
    #[inline]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Signal the ticker to shut down.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    fn run_loop(tick_tx: &Sender<Instant>, shutdown: &AtomicBool, interval: Duration) {
        let mut next_tick = Instant::now() + interval;

        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < next_tick {
                // Short sleeps keep shutdown responsive.
                thread::sleep((next_tick - now).min(Duration::from_millis(5)));
                continue;
            }
            // A full channel means the consumer has a wake-up pending already.
            let _ = tick_tx.try_send(now);
            next_tick = (next_tick + interval).max(now + interval / 2);
        }
    }
}

impl Drop for PollTicker {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_basic() {
        let started = Instant::now();
        let ticker = PollTicker::spawn(Duration::from_millis(10)).unwrap();

        let first = ticker.receiver().recv_timeout(Duration::from_millis(500)).unwrap();
        assert!(first >= started + Duration::from_millis(10));

        let second = ticker.receiver().recv_timeout(Duration::from_millis(500)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_ticker_does_not_queue() {
        let ticker = PollTicker::spawn(Duration::from_millis(2)).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert!(ticker.receiver().len() <= 2);
    }

    #[test]
    fn test_ticker_drop_joins() {
        let ticker = PollTicker::spawn(Duration::from_millis(100)).unwrap();
        assert_eq!(ticker.interval(), Duration::from_millis(100));
        drop(ticker);
    }
}
