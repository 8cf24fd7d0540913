//! NBA liveData CDN raw wire types: serde shapes for deserializing the
//! playbyplay and boxscore JSON. The mapping functions in client.rs turn
//! these into the clean domain types.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Play-by-play  (playbyplay_{gameId}.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PlayByPlayResponse {
    pub game: Option<PlayByPlayGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayByPlayGame {
    pub game_id: Option<String>,
    pub actions: Option<Vec<WireAction>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireAction {
    pub action_number: Option<u32>,
    /// ISO-8601 duration, e.g. "PT11M32.00S".
    pub clock: Option<String>,
    /// RFC 3339 instant, e.g. "2024-01-15T00:12:31.4Z".
    pub time_actual: Option<String>,
    pub period: Option<u8>,
    pub action_type: Option<String>,
    pub sub_type: Option<String>,
    pub person_id: Option<u32>,
    pub player_name: Option<String>,
    pub team_id: Option<u32>,
    pub team_tricode: Option<String>,
    pub description: Option<String>,
    /// "Made" or "Missed" for shot and free-throw actions.
    pub shot_result: Option<String>,
    /// Cumulative scores arrive as strings on the wire.
    pub score_home: Option<String>,
    pub score_away: Option<String>,
    pub assist_person_id: Option<u32>,
    pub assist_player_name_initial: Option<String>,
}

// ---------------------------------------------------------------------------
// Box score / game metadata  (boxscore_{gameId}.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BoxScoreResponse {
    pub game: Option<BoxScoreGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoxScoreGame {
    pub game_id: Option<String>,
    /// 1 = not started, 2 = in progress, 3 = final.
    pub game_status: Option<u8>,
    pub home_team: Option<WireTeam>,
    pub away_team: Option<WireTeam>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireTeam {
    pub team_id: Option<u32>,
    pub team_tricode: Option<String>,
    pub players: Option<Vec<WirePlayer>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WirePlayer {
    pub person_id: Option<u32>,
    pub name: Option<String>,
}
