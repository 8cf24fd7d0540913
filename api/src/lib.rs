pub mod client;
pub mod wire;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the liveData wire format
// ---------------------------------------------------------------------------

/// One play-by-play event. Immutable once recorded; a live refresh replaces
/// the whole collection rather than patching entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    /// Source-assigned action number. Not reliable as the sole ordering key:
    /// corrections can be appended out of order.
    pub sequence_id: u32,
    /// 1..=4 regulation, >4 overtime.
    pub period: u8,
    /// Seconds left in the period.
    pub clock_remaining: f64,
    /// Real-world instant the event occurred.
    pub wall_timestamp: DateTime<Utc>,
    /// "2pt", "3pt", "freethrow", "rebound", "turnover", "steal", "block",
    /// "foul", or anything else the feed invents.
    pub kind: String,
    /// "offensive"/"defensive" for rebounds, shot type for shots, etc.
    pub sub_kind: String,
    /// 0 = none / team-level event.
    pub actor_id: u32,
    /// 0 = neutral (clock and period markers).
    pub team_id: u32,
    pub home_score: u16,
    pub away_score: u16,
    pub assist_actor_id: Option<u32>,
    /// Abbreviated assister name as the feed prints it ("T. Young").
    pub assist_player_name: String,
    pub shot_made: bool,
    pub description: String,
    pub player_name: String,
    pub team_tricode: String,
}

/// Upstream `gameStatus` integer: 1 = not started, 2 = in progress, 3 = final.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    NotStarted,
    InProgress,
    Final,
}

impl GameStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => GameStatus::InProgress,
            3 => GameStatus::Final,
            _ => GameStatus::NotStarted,
        }
    }

    pub fn is_live(&self) -> bool {
        *self == GameStatus::InProgress
    }

    pub fn is_terminal(&self) -> bool {
        *self == GameStatus::Final
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterPlayer {
    pub person_id: u32,
    pub name: String,
}

/// Game metadata from the boxscore endpoint: team identity, status, rosters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameMeta {
    pub game_id: String,
    pub status: GameStatus,
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub home_tricode: String,
    pub away_tricode: String,
    /// Rosters in the upstream listed order (starters first).
    pub home_roster: Vec<RosterPlayer>,
    pub away_roster: Vec<RosterPlayer>,
}

/// Parse an ISO-8601 duration clock ("PT11M32.00S") into seconds remaining.
/// Malformed clocks parse as 0 rather than failing the whole batch.
pub fn clock_to_seconds(clock: &str) -> f64 {
    let Some(rest) = clock.strip_prefix("PT") else {
        return 0.0;
    };
    let Some((minutes, seconds)) = rest.split_once('M') else {
        return 0.0;
    };
    let minutes: f64 = minutes.parse().unwrap_or(0.0);
    let seconds: f64 = seconds
        .strip_suffix('S')
        .unwrap_or(seconds)
        .parse()
        .unwrap_or(0.0);
    minutes * 60.0 + seconds
}
