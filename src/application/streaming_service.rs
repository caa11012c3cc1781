// Streaming service - Live feed of simulated samples for chunked responses
use crate::application::live_simulator::start_data_stream;
use crate::domain::operations::OpsDataPoint;
use crate::infrastructure::config::LiveSettings;
use futures::Stream;
use std::time::Duration;
use tokio::sync::mpsc;

const FEED_BUFFER: usize = 16;

#[derive(Clone)]
pub struct LiveFeedService {
    settings: LiveSettings,
}

impl LiveFeedService {
    pub fn new(settings: LiveSettings) -> Self {
        Self { settings }
    }

    /// Requested interval clamped to the configured floor, or the default.
    pub fn interval(&self, requested_ms: Option<u64>) -> Duration {
        let ms = requested_ms
            .unwrap_or(self.settings.default_interval_ms)
            .max(self.settings.min_interval_ms);
        Duration::from_millis(ms)
    }

    /// Open-ended feed; the underlying timer stops when the stream is dropped.
    pub fn live_feed(&self, interval: Duration) -> impl Stream<Item = OpsDataPoint> + Send + 'static {
        let (tx, mut rx) = mpsc::channel(FEED_BUFFER);

        let handle = start_data_stream(
            move |point| {
                // a slow client just misses samples
                if let Err(mpsc::error::TrySendError::Full(point)) = tx.try_send(point) {
                    tracing::debug!(id = %point.id, "live feed buffer full, dropping sample");
                }
            },
            interval,
        );

        async_stream::stream! {
            let _handle = handle;
            while let Some(point) = rx.recv().await {
                yield point;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn service() -> LiveFeedService {
        LiveFeedService::new(LiveSettings {
            default_interval_ms: 1_000,
            min_interval_ms: 100,
        })
    }

    #[test]
    fn test_interval_clamped() {
        let service = service();
        assert_eq!(service.interval(None), Duration::from_millis(1_000));
        assert_eq!(service.interval(Some(10)), Duration::from_millis(100));
        assert_eq!(service.interval(Some(500)), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_feed_yields_points() {
        let feed = service().live_feed(Duration::from_millis(100));
        let points: Vec<OpsDataPoint> = feed.take(3).collect().await;
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.id.starts_with("live-")));
    }
}
