use crate::messages::SessionEvent;
use crate::provider::GameDataProvider;
use log::{debug, warn};
use nba_api::client::ApiError;
use nba_api::{Action, GameMeta};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Periodic live refresh while a game is in progress.
///
/// Each successful fetch is delivered as one atomic [`SessionEvent::Snapshot`]
/// replacing the whole action batch and metadata; failures are logged and
/// retried on the next scheduled interval, never surfaced to the viewer. The
/// loop ends on its own when the fetched status turns terminal, and a dropped
/// receiver ends it early so no update lands on a disposed session.
pub struct LivePoller<P> {
    provider: Arc<P>,
    game_id: String,
    events: mpsc::Sender<SessionEvent>,
    poll_interval: Duration,
    /// When the session already holds an initial load, skip the immediate
    /// first fetch so startup isn't double-triggered.
    has_initial_data: bool,
}

impl<P: GameDataProvider> LivePoller<P> {
    pub fn new(
        provider: Arc<P>,
        game_id: impl Into<String>,
        events: mpsc::Sender<SessionEvent>,
    ) -> Self {
        Self {
            provider,
            game_id: game_id.into(),
            events,
            poll_interval: DEFAULT_POLL_INTERVAL,
            has_initial_data: true,
        }
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn fetch_immediately(mut self) -> Self {
        self.has_initial_data = false;
        self
    }

    pub async fn run(self) {
        let mut poll = interval(self.poll_interval);
        if self.has_initial_data {
            // Consume the interval's immediate first tick.
            poll.tick().await;
        }

        loop {
            poll.tick().await;

            let (actions, meta) = match self.fetch_snapshot().await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    // Stale data stays visible until a later fetch succeeds.
                    warn!("game {}: live refresh failed, will retry: {e}", self.game_id);
                    continue;
                }
            };

            let terminal = meta.status.is_terminal();
            if self
                .events
                .send(SessionEvent::Snapshot { actions, meta })
                .await
                .is_err()
            {
                // Session torn down; nothing left to update.
                break;
            }
            if terminal {
                debug!("game {} reported final; stopping live polling", self.game_id);
                break;
            }
        }
    }

    /// Fetch both halves of a snapshot before either is applied, so partial
    /// states are never observable.
    async fn fetch_snapshot(&self) -> Result<(Vec<Action>, GameMeta), ApiError> {
        let actions = self.provider.fetch_actions(&self.game_id).await?;
        let meta = self.provider.fetch_metadata(&self.game_id).await?;
        Ok((actions, meta))
    }
}
