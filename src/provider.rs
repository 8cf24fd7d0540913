use nba_api::client::{ApiError, NbaApi};
use nba_api::{Action, GameMeta};
use std::future::Future;

/// Seam between the replay engine and whatever fetches raw game data.
/// Production uses [`NbaApi`]; tests substitute scripted doubles.
pub trait GameDataProvider: Send + Sync + 'static {
    fn fetch_actions(
        &self,
        game_id: &str,
    ) -> impl Future<Output = Result<Vec<Action>, ApiError>> + Send;

    fn fetch_metadata(
        &self,
        game_id: &str,
    ) -> impl Future<Output = Result<GameMeta, ApiError>> + Send;
}

impl GameDataProvider for NbaApi {
    async fn fetch_actions(&self, game_id: &str) -> Result<Vec<Action>, ApiError> {
        NbaApi::fetch_actions(self, game_id).await
    }

    async fn fetch_metadata(&self, game_id: &str) -> Result<GameMeta, ApiError> {
        NbaApi::fetch_metadata(self, game_id).await
    }
}
