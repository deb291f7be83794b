use crate::model::{Sample, UsageRecord};
use crate::monitor::UsageSource;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default trailing window for "recently active"
pub const DEFAULT_LOOKBACK: Duration = Duration::from_secs(60);

/// Samples the foreground application from a usage source
///
/// The same lookback window is used for enforcement and for one-off
/// "what is active now" queries.
pub struct ForegroundAppProbe {
    source: Arc<dyn UsageSource>,
    lookback: chrono::Duration,
    unavailable: AtomicBool,
}

impl ForegroundAppProbe {
    #[must_use]
    pub fn new(source: Arc<dyn UsageSource>, lookback: Duration) -> Self {
        Self {
            source,
            lookback: chrono::Duration::from_std(lookback).unwrap_or(chrono::Duration::MAX),
            unavailable: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn source(&self) -> &Arc<dyn UsageSource> {
        &self.source
    }

    /// Never fails: an unavailable facility is reported as `Unknown`
    pub async fn sample(&self) -> Sample {
        let window_end = Utc::now();
        // Saturates at the earliest representable instant
        let window_start = window_end
            .checked_sub_signed(self.lookback)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        match self
            .source
            .query_recent_foreground_app(window_start, window_end)
            .await
        {
            Ok(records) => {
                if self.unavailable.swap(false, Ordering::Relaxed) {
                    log::info!("Usage data available again");
                }
                most_recent(&records, window_start)
            }
            Err(e) => {
                if self.unavailable.swap(true, Ordering::Relaxed) {
                    log::debug!("Usage data still unavailable: {e}");
                } else {
                    log::warn!("Usage data unavailable, treating samples as unknown: {e}");
                }
                Sample::Unknown
            }
        }
    }
}

/// Pick the entry with the latest `last_used` at or after `window_start`.
///
/// Ties keep the first entry in iteration order.
#[must_use]
pub fn most_recent(records: &[UsageRecord], window_start: DateTime<Utc>) -> Sample {
    records
        .iter()
        .filter(|r| r.last_used >= window_start)
        .fold(None, |best: Option<&UsageRecord>, r| match best {
            Some(b) if r.last_used <= b.last_used => Some(b),
            _ => Some(r),
        })
        .map_or(Sample::Unknown, |r| Sample::Active(r.app_id.clone()))
}
