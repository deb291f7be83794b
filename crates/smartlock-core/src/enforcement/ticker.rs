use std::time::Duration;
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Cancellable sequence of fixed-period tick events.
///
/// The first tick fires immediately. A tick that is consumed late pushes the
/// schedule back instead of bursting to catch up.
pub struct Ticker {
    interval: Interval,
    cancel: CancellationToken,
}

impl Ticker {
    /// # Panics
    ///
    /// Panics if `period` is zero; config validation rejects that earlier.
    #[must_use]
    pub fn new(period: Duration, cancel: CancellationToken) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, cancel }
    }

    /// Next tick, or `None` once cancelled
    pub async fn next(&mut self) -> Option<Instant> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            at = self.interval.tick() => Some(at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_fixed_period() {
        let cancel = CancellationToken::new();
        let mut ticker = Ticker::new(Duration::from_millis(1000), cancel.clone());

        let first = ticker.next().await.unwrap();
        let second = ticker.next().await.unwrap();
        let third = ticker.next().await.unwrap();

        assert_eq!(second - first, Duration::from_millis(1000));
        assert_eq!(third - second, Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_ends_sequence() {
        let cancel = CancellationToken::new();
        let mut ticker = Ticker::new(Duration::from_millis(1000), cancel.clone());

        assert!(ticker.next().await.is_some());
        cancel.cancel();
        assert!(ticker.next().await.is_none());
        assert!(ticker.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_wakes_pending_tick() {
        let cancel = CancellationToken::new();
        let mut ticker = Ticker::new(Duration::from_secs(3600), cancel.clone());
        assert!(ticker.next().await.is_some());

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        assert!(ticker.next().await.is_none());
        assert!(start.elapsed() < Duration::from_secs(3600));
    }
}
