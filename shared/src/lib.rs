use serde::Deserialize;

use crate::errors::InvalidRiotId;

pub mod errors;
pub mod stats;
pub mod traits;
pub mod val_match;

/// Identity of a player resolved through the backend lookup endpoint.
///
/// Created after a successful search, held for the lifetime of the profile
/// view and discarded when navigating back to the landing screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub game_name: String,
    pub tag_line: String,
    pub puuid: String,
    /// Backend-assigned shard identifier, opaque to the client.
    pub region: String,
}

impl PlayerInfo {
    pub fn display_name(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }
}

/// A `game_name#tag_line` pair as typed into the search field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl RiotId {
    /// Parse a raw search input. Valid inputs contain exactly one `#`
    /// separating two non-empty halves; anything else is rejected before a
    /// request is ever issued.
    pub fn parse(input: &str) -> Result<Self, InvalidRiotId> {
        let trimmed = input.trim();
        let mut halves = trimmed.split('#');
        let game_name = halves.next().unwrap_or_default().trim();
        let tag_line = halves.next().unwrap_or_default().trim();

        if halves.next().is_some() {
            return Err(InvalidRiotId::TooManySeparators);
        }
        if game_name.is_empty() || tag_line.is_empty() {
            return Err(InvalidRiotId::MissingHalf);
        }

        Ok(Self {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
        })
    }
}

impl std::fmt::Display for RiotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}

/// Lifecycle states reported by the background update job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Pending,
    Progress,
    Success,
    Failure,
}

impl From<&str> for UpdateState {
    fn from(value: &str) -> Self {
        match value {
            "PROGRESS" => Self::Progress,
            "SUCCESS" => Self::Success,
            "FAILURE" => Self::Failure,
            // PENDING, STARTED and anything the job queue may add later keep
            // the poll loop running.
            _ => Self::Pending,
        }
    }
}

/// Status payload returned by the update-status endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct UpdateStatus {
    #[serde(deserialize_with = "de_update_state")]
    pub state: UpdateState,
    pub meta: Option<UpdateMeta>,
}

/// Progress metadata attached to a `PROGRESS` status.
#[derive(Deserialize, Debug, Clone)]
pub struct UpdateMeta {
    pub current: Option<u32>,
    pub total: Option<u32>,
    pub status: Option<String>,
}

fn de_update_state<'de, D>(deserializer: D) -> Result<UpdateState, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(UpdateState::from(raw.as_str()))
}
