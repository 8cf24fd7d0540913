use nba_api::{Action, GameMeta};

/// Events flowing into the session event loop. State transitions happen only
/// where these are applied, inside the single state owner.
#[derive(Debug)]
pub enum SessionEvent {
    /// Playback tick; the handler stamps it with the receive-side instant.
    Tick,
    /// One atomic live refresh: the full action batch and metadata together,
    /// so a consumer never observes a torn update.
    Snapshot {
        actions: Vec<Action>,
        meta: GameMeta,
    },
}
