use crate::wire::{BoxScoreResponse, PlayByPlayResponse, WireAction, WireTeam};
use crate::{Action, GameMeta, GameStatus, RosterPlayer, clock_to_seconds};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const NBA_LIVE_BASE: &str = "https://cdn.nba.com/static/json/liveData";

/// NBA game data client backed by the liveData CDN endpoints.
#[derive(Debug, Clone)]
pub struct NbaApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for NbaApi {
    fn default() -> Self {
        // The CDN rejects anonymous clients; present browser-like headers.
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));

        Self {
            client: Client::builder()
                .user_agent(
                    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
                )
                .default_headers(headers)
                .build()
                .unwrap_or_default(),
            base_url: NBA_LIVE_BASE.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// No connectivity, or a non-success status with no better mapping.
    Network(String),
    /// Provider throttling (HTTP 429).
    RateLimited(String),
    /// Exceeded the request budget.
    Timeout(String),
    NotFound(String),
    /// Schema violation beyond tolerable unknown-kind actions.
    Malformed(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {msg}"),
            ApiError::RateLimited(url) => write!(f, "Rate limited by provider: {url}"),
            ApiError::Timeout(url) => write!(f, "Request timed out: {url}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Malformed(msg) => write!(f, "Malformed response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NbaApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different base URL. Used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Fetch the full current play-by-play action batch for one game.
    pub async fn fetch_actions(&self, game_id: &str) -> ApiResult<Vec<Action>> {
        let url = format!("{}/playbyplay/playbyplay_{game_id}.json", self.base_url);
        let raw: PlayByPlayResponse = self.get(&url).await?;
        let actions = raw
            .game
            .unwrap_or_default()
            .actions
            .unwrap_or_default()
            .iter()
            .map(map_action)
            .collect();
        Ok(actions)
    }

    /// Fetch game metadata: status, team identity, rosters.
    pub async fn fetch_metadata(&self, game_id: &str) -> ApiResult<GameMeta> {
        let url = format!("{}/boxscore/boxscore_{game_id}.json", self.base_url);
        let raw: BoxScoreResponse = self.get(&url).await?;
        let game = raw
            .game
            .ok_or_else(|| ApiError::Malformed(format!("{url}: missing game object")))?;

        let home = game.home_team.unwrap_or_default();
        let away = game.away_team.unwrap_or_default();

        Ok(GameMeta {
            game_id: game.game_id.unwrap_or_else(|| game_id.to_owned()),
            status: GameStatus::from_code(game.game_status.unwrap_or(0)),
            home_team_id: home.team_id.unwrap_or(0),
            away_team_id: away.team_id.unwrap_or(0),
            home_tricode: home.team_tricode.clone().unwrap_or_default(),
            away_tricode: away.team_tricode.clone().unwrap_or_default(),
            home_roster: map_roster(&home),
            away_roster: map_roster(&away),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(url.to_owned())
                } else {
                    ApiError::Network(format!("{url}: {e}"))
                }
            })?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited(url.to_owned())),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(url.to_owned())),
            status if !status.is_success() => {
                Err(ApiError::Network(format!("{url}: HTTP {status}")))
            }
            _ => response.json::<T>().await.map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(url.to_owned())
                } else {
                    ApiError::Malformed(format!("{url}: {e}"))
                }
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: liveData wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_action(raw: &WireAction) -> Action {
    Action {
        sequence_id: raw.action_number.unwrap_or(0),
        period: raw.period.unwrap_or(0),
        clock_remaining: clock_to_seconds(raw.clock.as_deref().unwrap_or("")),
        wall_timestamp: parse_wall_timestamp(raw.time_actual.as_deref().unwrap_or("")),
        kind: raw.action_type.clone().unwrap_or_default(),
        sub_kind: raw.sub_type.clone().unwrap_or_default(),
        actor_id: raw.person_id.unwrap_or(0),
        team_id: raw.team_id.unwrap_or(0),
        home_score: parse_score(raw.score_home.as_deref()),
        away_score: parse_score(raw.score_away.as_deref()),
        assist_actor_id: raw.assist_person_id.filter(|&id| id != 0),
        assist_player_name: raw.assist_player_name_initial.clone().unwrap_or_default(),
        shot_made: raw.shot_result.as_deref() == Some("Made"),
        description: raw.description.clone().unwrap_or_default(),
        player_name: raw.player_name.clone().unwrap_or_default(),
        team_tricode: raw.team_tricode.clone().unwrap_or_default(),
    }
}

/// An unparseable timestamp degrades to the epoch instead of poisoning the
/// batch; the normalizer orders by game time, not wall time.
fn parse_wall_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn parse_score(raw: Option<&str>) -> u16 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

fn map_roster(team: &WireTeam) -> Vec<RosterPlayer> {
    team.players
        .iter()
        .flatten()
        .map(|p| RosterPlayer {
            person_id: p.person_id.unwrap_or(0),
            name: p.name.clone().unwrap_or_default(),
        })
        .collect()
}
