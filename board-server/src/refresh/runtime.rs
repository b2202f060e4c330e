//! Background tasks that keep the board current.
//!
//! Two timers run: a data refresh that replaces the snapshot, and a clock
//! tick that recomputes the board from whatever snapshot is current. Each
//! computed board is published on a watch channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::board::{Board, BoardEngine, BoardStatus};
use crate::clock::Clock;

use super::snapshot::{Refresher, SnapshotStore};

/// How often each timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub data_refresh: Duration,
    pub clock_tick: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_refresh: Duration::from_secs(5 * 60),
            clock_tick: Duration::from_secs(1),
        }
    }
}

struct Publisher {
    engine: BoardEngine,
    store: SnapshotStore,
    clock: Clock,
    boards: watch::Sender<Arc<Board>>,
}

impl Publisher {
    async fn publish(&self) {
        let (snapshot, last_error) = self.store.load().await;
        let board = self
            .engine
            .compute(snapshot.as_deref(), last_error.as_deref(), self.clock.now());
        self.boards.send_replace(Arc::new(board));
    }
}

/// Running refresh and clock tasks.
pub struct BoardRuntime {
    boards: watch::Receiver<Arc<Board>>,
    tasks: Vec<JoinHandle<()>>,
}

impl BoardRuntime {
    /// Spawn the timers. The first refresh starts immediately.
    ///
    /// A frozen clock gets no clock task: the board only changes when
    /// the data does.
    pub fn start(refresher: Refresher, engine: BoardEngine, clock: Clock, config: RuntimeConfig) -> Self {
        let initial = Board::empty(clock.now(), BoardStatus::Loading);
        let (tx, rx) = watch::channel(Arc::new(initial));

        let publisher = Arc::new(Publisher {
            engine,
            store: refresher.store().clone(),
            clock,
            boards: tx,
        });

        let mut tasks = Vec::with_capacity(2);

        let refresh_publisher = publisher.clone();
        tasks.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.data_refresh);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                // Failures are logged and recorded by the refresher.
                let _ = refresher.refresh().await;
                refresh_publisher.publish().await;
            }
        }));

        if clock.is_frozen() {
            info!(now = %clock.now(), "clock frozen, clock tick disabled");
        } else {
            tasks.push(tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.clock_tick);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    interval.tick().await;
                    publisher.publish().await;
                }
            }));
        }

        debug!(tasks = tasks.len(), "board runtime started");
        Self { boards: rx, tasks }
    }

    /// A receiver that always holds the latest board.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Board>> {
        self.boards.clone()
    }

    pub fn latest(&self) -> Arc<Board> {
        self.boards.borrow().clone()
    }

    /// Abort both timers. An in-flight fetch is dropped.
    pub fn shutdown(self) {
        for task in &self.tasks {
            task.abort();
        }
        info!("board runtime stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizeOptions;
    use crate::timetable::{FileTimetableSource, TimetableSource};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[tokio::test]
    async fn publishes_board_after_first_refresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("all.json");
        std::fs::write(
            &path,
            r#"{"jr": {"ＪＲ俊徳道駅": {"久宝寺・奈良方面": [{"hour": "9", "minute": "10", "destination": "久宝寺"}]}}}"#,
        )
        .unwrap();

        let clock = Clock::frozen(
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        );
        let refresher = Refresher::new(
            TimetableSource::File(FileTimetableSource::new(&path)),
            None,
            NormalizeOptions::default(),
            clock,
            SnapshotStore::new(),
        );

        let runtime = BoardRuntime::start(refresher, BoardEngine::default(), clock, RuntimeConfig::default());
        let mut boards = runtime.subscribe();

        let board = boards
            .wait_for(|b| b.status.is_ready())
            .await
            .unwrap()
            .clone();
        assert_eq!(board.total_departures(), 1);
        assert_eq!(board.stations[2].directions[1].trains[0].remaining_minutes, 10);

        runtime.shutdown();
    }

    #[tokio::test]
    async fn missing_source_becomes_unavailable() {
        let dir = tempdir().unwrap();
        let clock = Clock::frozen(
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        );
        let refresher = Refresher::new(
            TimetableSource::File(FileTimetableSource::new(dir.path().join("missing.json"))),
            None,
            NormalizeOptions::default(),
            clock,
            SnapshotStore::new(),
        );

        let runtime = BoardRuntime::start(refresher, BoardEngine::default(), clock, RuntimeConfig::default());
        assert_eq!(runtime.latest().status, BoardStatus::Loading);

        let mut boards = runtime.subscribe();
        let board = boards
            .wait_for(|b| matches!(b.status, BoardStatus::Unavailable(_)))
            .await
            .unwrap()
            .clone();
        assert!(board.stations.is_empty());

        runtime.shutdown();
    }
}
