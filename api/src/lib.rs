//! HTTP client for the stats dashboard backend.
//!
//! The library offers typed wrappers around the consumed REST endpoints and
//! an incremental reader for the streamed AI report.

pub mod client;
pub mod metrics;

mod matches;
mod players;
mod report;
mod update;

pub mod types {
    pub use super::matches::{MatchDetailDto, MatchSummaryDto, ParticipationDto};
    pub use super::players::PlayerDto;
    pub use super::update::UpdateTriggeredDto;
}

pub use client::DashboardApiClient;
