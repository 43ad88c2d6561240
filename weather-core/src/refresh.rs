use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::{WeatherError, model::PlaceSpec, store::WeatherStore};

/// Background task that re-fetches the shown place on a fixed period.
///
/// Ticks are skipped while a fetch is in flight. Manual fetches are not
/// coordinated with it; the store keeps only the newest result. The task
/// stops when this handle is dropped.
#[derive(Debug)]
pub struct AutoRefresh {
    handle: JoinHandle<()>,
}

impl AutoRefresh {
    pub fn spawn(store: Arc<WeatherStore>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                if store.is_loading() {
                    debug!("auto refresh skipped: fetch in flight");
                    continue;
                }

                match store.refresh_weather().await {
                    Ok(true) => debug!("auto refresh done"),
                    Ok(false) => debug!("auto refresh skipped: no place shown"),
                    Err(err) => warn!(error = %err, "auto refresh failed"),
                }
            }
        });

        Self { handle }
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Load `place` unless the store already shows something, trying up to
/// `max_attempts` times. `0` makes no attempt and leaves the store as is.
/// Returns the last error if every attempt failed.
pub async fn ensure_loaded(
    store: &WeatherStore,
    place: &str,
    max_attempts: u32,
) -> Result<(), WeatherError> {
    let mut attempt = 0;
    loop {
        if store.has_report() || max_attempts == 0 {
            return Ok(());
        }

        attempt += 1;
        match store.fetch(PlaceSpec::name(place)).await {
            Ok(()) => return Ok(()),
            Err(err) if attempt >= max_attempts => return Err(err),
            Err(err) => warn!(attempt, max_attempts, error = %err, "initial load failed, retrying"),
        }
    }
}
