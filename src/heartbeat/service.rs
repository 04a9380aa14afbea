//! Heartbeat service implementation.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::sink::{HeartbeatEvent, HeartbeatSink};
use crate::config::MAX_HEARTBEAT_INTERVAL_SECS;

const MIN_INTERVAL: Duration = Duration::from_millis(1);
const MAX_INTERVAL: Duration = Duration::from_secs(MAX_HEARTBEAT_INTERVAL_SECS);

/// Long-running liveness loop.
///
/// Announces start and readiness, then emits one `Running` event per
/// interval for as long as the future is polled.
pub struct HeartbeatService {
    interval: Duration,
    sink: Arc<dyn HeartbeatSink>,
}

impl HeartbeatService {
    /// Create a new heartbeat service writing to `sink`.
    ///
    /// The interval is clamped to between one millisecond and one year: the
    /// loop always yields between beats and the first deadline always fits
    /// in an `Instant`.
    pub fn new(interval: Duration, sink: Arc<dyn HeartbeatSink>) -> Self {
        Self {
            interval: interval.clamp(MIN_INTERVAL, MAX_INTERVAL),
            sink,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the heartbeat forever. Never returns.
    pub async fn start(&self) -> Infallible {
        let mut beats = 0;
        self.beat(&mut beats).await
    }

    /// Run the heartbeat until `shutdown` resolves.
    ///
    /// Emits `Stopped` last and returns the number of periodic beats.
    pub async fn run_until<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let mut beats = 0;
        {
            let heartbeat = self.beat(&mut beats);
            tokio::pin!(heartbeat);
            tokio::pin!(shutdown);

            // biased: the start/ready pair goes out even if shutdown is already pending
            tokio::select! {
                biased;
                never = &mut heartbeat => match never {},
                () = &mut shutdown => {}
            }
        }

        self.sink.emit(&HeartbeatEvent::Stopped { beats });
        beats
    }

    async fn beat(&self, beats: &mut u64) -> Infallible {
        self.sink.emit(&HeartbeatEvent::Starting);
        self.sink.emit(&HeartbeatEvent::Ready);

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            *beats += 1;
            self.sink.emit(&HeartbeatEvent::Running { beat: *beats });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heartbeat::sink::{MockHeartbeatSink, RecordingSink};
    use mockall::Sequence;

    const INTERVAL: Duration = Duration::from_secs(60);

    #[test]
    fn test_zero_interval_is_clamped() {
        let service = HeartbeatService::new(Duration::ZERO, Arc::new(RecordingSink::new()));
        assert_eq!(service.interval(), Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_interval_is_clamped_and_does_not_panic() {
        let sink = Arc::new(RecordingSink::new());
        let service = HeartbeatService::new(Duration::MAX, sink.clone());
        assert_eq!(
            service.interval(),
            Duration::from_secs(MAX_HEARTBEAT_INTERVAL_SECS)
        );

        let beats = service
            .run_until(tokio::time::sleep(Duration::from_secs(1)))
            .await;

        assert_eq!(beats, 0);
        assert_eq!(
            sink.events(),
            vec![
                HeartbeatEvent::Starting,
                HeartbeatEvent::Ready,
                HeartbeatEvent::Stopped { beats: 0 },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_emits_starting_then_ready_before_first_beat() {
        let sink = Arc::new(RecordingSink::new());
        let service = HeartbeatService::new(INTERVAL, sink.clone());

        let result = tokio::time::timeout(INTERVAL - Duration::from_secs(1), service.start()).await;
        assert!(result.is_err());
        assert_eq!(
            sink.events(),
            vec![HeartbeatEvent::Starting, HeartbeatEvent::Ready]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_running_line_per_interval() {
        let sink = Arc::new(RecordingSink::new());
        let service = Arc::new(HeartbeatService::new(INTERVAL, sink.clone()));

        let task = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.start().await })
        };

        // Sample halfway between deadlines so the check never races a tick.
        tokio::time::sleep(INTERVAL / 2).await;
        for n in 1..=4u64 {
            tokio::time::sleep(INTERVAL).await;
            assert_eq!(sink.len() as u64, 2 + n);
            assert_eq!(
                sink.events().last(),
                Some(&HeartbeatEvent::Running { beat: n })
            );
        }

        assert!(!task.is_finished());
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_returns_beat_count_and_emits_stopped_last() {
        let sink = Arc::new(RecordingSink::new());
        let service = HeartbeatService::new(INTERVAL, sink.clone());

        let shutdown = tokio::time::sleep(INTERVAL * 2 + Duration::from_secs(30));
        let beats = service.run_until(shutdown).await;

        assert_eq!(beats, 2);
        assert_eq!(
            sink.events(),
            vec![
                HeartbeatEvent::Starting,
                HeartbeatEvent::Ready,
                HeartbeatEvent::Running { beat: 1 },
                HeartbeatEvent::Running { beat: 2 },
                HeartbeatEvent::Stopped { beats: 2 },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_with_immediate_shutdown_still_announces() {
        let sink = Arc::new(RecordingSink::new());
        let service = HeartbeatService::new(INTERVAL, sink.clone());

        let beats = service.run_until(std::future::ready(())).await;

        assert_eq!(beats, 0);
        assert_eq!(
            sink.events(),
            vec![
                HeartbeatEvent::Starting,
                HeartbeatEvent::Ready,
                HeartbeatEvent::Stopped { beats: 0 },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_receives_events_in_sequence() {
        let mut sink = MockHeartbeatSink::new();
        let mut seq = Sequence::new();

        sink.expect_emit()
            .withf(|e| *e == HeartbeatEvent::Starting)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        sink.expect_emit()
            .withf(|e| *e == HeartbeatEvent::Ready)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        sink.expect_emit()
            .withf(|e| *e == HeartbeatEvent::Running { beat: 1 })
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        sink.expect_emit()
            .withf(|e| *e == HeartbeatEvent::Stopped { beats: 1 })
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let service = HeartbeatService::new(INTERVAL, Arc::new(sink));
        let beats = service
            .run_until(tokio::time::sleep(INTERVAL + Duration::from_secs(1)))
            .await;
        assert_eq!(beats, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_wakeup_fires_once_then_pushes_schedule_back() {
        let sink = Arc::new(RecordingSink::new());
        let service = Arc::new(HeartbeatService::new(INTERVAL, sink.clone()));

        let task = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.start().await })
        };
        let running = |sink: &RecordingSink| {
            sink.events()
                .into_iter()
                .filter(|e| matches!(e, HeartbeatEvent::Running { .. }))
                .count()
        };

        // t=1s, then jump to t=181s, past the 60s, 120s and 180s deadlines.
        tokio::time::sleep(Duration::from_secs(1)).await;
        tokio::time::advance(INTERVAL * 3).await;
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(running(&sink), 1, "one catch-up beat, not a burst");

        // t=240.5s: the old 60s grid would have fired at 240s.
        tokio::time::sleep(Duration::from_millis(59_499)).await;
        assert_eq!(running(&sink), 1, "next beat must wait a full interval");

        // t=241.5s: one interval after the late beat at 181s.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(running(&sink), 2);
        assert_eq!(
            sink.events().last(),
            Some(&HeartbeatEvent::Running { beat: 2 })
        );

        task.abort();
    }
}
