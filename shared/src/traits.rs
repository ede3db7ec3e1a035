//! Trait seams between the view layer and the backend client.
//!
//! The session and the update poller only ever see these traits, which keeps
//! them testable against scripted in-memory implementations.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{
    errors::ApiResponse,
    val_match::{Match, MatchDetail},
    PlayerInfo, UpdateStatus,
};

/// Riot-id lookup resolving a player to a puuid and region shard.
#[async_trait]
pub trait PlayerApi: Send + Sync {
    async fn get_player(&self, game_name: String, tag_line: String) -> ApiResponse<PlayerInfo>;
}

/// Match history and scoreboard access.
#[async_trait]
pub trait MatchApi: Send + Sync {
    async fn get_matches(&self, region: String, puuid: String) -> ApiResponse<Vec<Match>>;

    async fn get_match(&self, match_id: String) -> ApiResponse<MatchDetail>;
}

/// Background refresh job control: trigger plus status checks.
#[async_trait]
pub trait UpdateApi: Send + Sync {
    /// Start a server-side sync job, returning its task id.
    async fn start_update(&self, region: String, puuid: String) -> ApiResponse<String>;

    async fn update_status(&self, task_id: String) -> ApiResponse<UpdateStatus>;
}

/// Text chunks of the AI report in arrival order.
pub type ReportStream = BoxStream<'static, ApiResponse<String>>;

/// Streamed AI coaching report. The stream must be consumed incrementally,
/// never buffered whole before display.
#[async_trait]
pub trait ReportApi: Send + Sync {
    async fn report_stream(&self, puuid: String) -> ApiResponse<ReportStream>;
}

/// Every API surface the dashboard consumes.
pub trait DashboardApiFull: PlayerApi + MatchApi + UpdateApi + ReportApi {}
