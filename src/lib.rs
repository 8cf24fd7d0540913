//! Replay and aggregation engine for NBA play-by-play feeds: normalize a raw
//! action log into a canonical timeline, play it back on a virtual clock
//! without spoiling what lies ahead, keep it fresh while the game is live,
//! and derive box scores and a momentum curve from any time-bounded slice.

pub mod boxscore;
pub mod messages;
pub mod momentum;
pub mod playback;
pub mod poller;
pub mod provider;
pub mod runtime;
pub mod session;
pub mod timeline;

pub use boxscore::{BoxScore, PlayerStats, StatLine, TeamStats, calculate_box_score};
pub use momentum::{MomentumPoint, VisibleCurve, momentum_series};
pub use playback::PlaybackClock;
pub use poller::LivePoller;
pub use provider::GameDataProvider;
pub use runtime::SessionHandle;
pub use session::{PeriodFilter, ReplaySession, ReplayView};
pub use timeline::{TimedAction, Timeline, normalize};
