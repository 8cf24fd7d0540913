use crate::messages::SessionEvent;
use crate::poller::LivePoller;
use crate::provider::GameDataProvider;
use crate::session::{PeriodFilter, ReplaySession, ReplayView};
use log::debug;
use nba_api::client::ApiError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// Playback tick period; pure computation, never I/O.
const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Owns a [`ReplaySession`] and the two timers that drive it: the playback
/// tick and, for in-progress games, the live poll. The two run independently
/// (playback keeps advancing while a fetch is in flight) and coordinate only
/// through the event loop applying their events to the single state owner.
///
/// Dropping the handle aborts every task unconditionally; no tick or fetch
/// result can touch the session afterwards.
pub struct SessionHandle {
    session: Arc<Mutex<ReplaySession>>,
    tasks: Vec<JoinHandle<()>>,
}

impl SessionHandle {
    /// Perform the initial load and start the timers. An initial-load failure
    /// propagates to the caller: there is no session to show without data.
    pub async fn start<P: GameDataProvider>(provider: P, game_id: &str) -> Result<Self, ApiError> {
        let provider = Arc::new(provider);
        let meta = provider.fetch_metadata(game_id).await?;
        let actions = provider.fetch_actions(game_id).await?;

        let is_live = meta.status.is_live();
        let session = Arc::new(Mutex::new(ReplaySession::new(
            game_id,
            actions,
            Some(meta),
        )));

        let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(100);

        let mut tasks = Vec::new();

        // Playback tick task, 100ms cadence.
        let tick_tx = event_tx.clone();
        tasks.push(tokio::spawn(async move {
            let mut tick = tokio::time::interval(TICK_PERIOD);
            loop {
                tick.tick().await;
                if tick_tx.send(SessionEvent::Tick).await.is_err() {
                    break;
                }
            }
        }));

        // Live poll task, only while the game is in progress. The initial
        // load above already supplied data, so the first fetch waits a full
        // interval.
        if is_live {
            let poller = LivePoller::new(Arc::clone(&provider), game_id, event_tx.clone());
            tasks.push(tokio::spawn(poller.run()));
        }

        tasks.push(tokio::spawn(event_loop(Arc::clone(&session), event_rx)));

        Ok(Self { session, tasks })
    }

    pub async fn view(&self) -> ReplayView {
        self.session.lock().await.view()
    }

    pub async fn toggle_play(&self) {
        self.session.lock().await.toggle_play();
    }

    pub async fn seek(&self, seconds: f64) {
        self.session.lock().await.seek(seconds);
    }

    pub async fn set_speed(&self, multiplier: f64) {
        self.session.lock().await.set_speed(multiplier);
    }

    pub async fn select_period_filter(&self, filter: PeriodFilter) {
        self.session.lock().await.select_period_filter(filter);
    }

    /// Abort all owned tasks. Also runs on drop; calling it explicitly just
    /// makes teardown visible at the call site.
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Single-threaded application of events to the state owner. Ticks are
/// stamped here with the receive-side instant so the clock measures real
/// elapsed time between applications, not between sends.
async fn event_loop(session: Arc<Mutex<ReplaySession>>, mut events: mpsc::Receiver<SessionEvent>) {
    while let Some(event) = events.recv().await {
        let mut session = session.lock().await;
        match event {
            SessionEvent::Tick => session.on_tick(Instant::now()),
            SessionEvent::Snapshot { actions, meta } => {
                debug!(
                    "game {}: applying live snapshot ({} actions)",
                    session.game_id(),
                    actions.len()
                );
                session.on_snapshot(actions, meta);
            }
        }
    }
}
