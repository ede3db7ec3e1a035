use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use urlencoding::encode;
use valdeck_shared::{
    errors::ApiResponse,
    traits::MatchApi,
    val_match::{Match, MatchDetail, MatchResult, Participation},
};

use crate::client::DashboardApiClient;

/// Representation of one match history entry.
///
/// The backend mixes camelCase and snake_case field names, so renames are
/// spelled out per field instead of a blanket `rename_all`.
#[derive(Deserialize, Debug, Clone)]
pub struct MatchSummaryDto {
    pub id: u64,
    pub match_id: Option<String>,
    pub agent_name: String,
    #[serde(default)]
    pub agent_image: String,
    pub map: String,
    pub result: String,
    #[serde(rename = "roundsWon")]
    pub rounds_won: u32,
    #[serde(rename = "roundsLost")]
    pub rounds_lost: u32,
    pub kda: String,
    #[serde(rename = "kdRatio", deserialize_with = "de_number_or_string")]
    pub kd_ratio: f64,
    pub fmt_pos: String,
    #[serde(rename = "hsPercent")]
    pub hs_percent: f64,
    pub adr: f64,
    pub acs: f64,
    #[serde(default)]
    pub start_time: Option<i64>,
}

impl From<MatchSummaryDto> for Match {
    fn from(value: MatchSummaryDto) -> Self {
        Self {
            id: value.id,
            // Older backend rows carry no dedicated match id.
            match_id: value.match_id.unwrap_or_else(|| value.id.to_string()),
            agent_name: value.agent_name,
            agent_image: value.agent_image,
            map: value.map,
            result: MatchResult::from(value.result.as_str()),
            rounds_won: value.rounds_won,
            rounds_lost: value.rounds_lost,
            kda: value.kda,
            kd_ratio: value.kd_ratio,
            position_label: value.fmt_pos,
            hs_percent: value.hs_percent,
            adr: value.adr,
            acs: value.acs,
            start_time: value.start_time,
        }
    }
}

/// Representation of the match detail response.
#[derive(Deserialize, Debug, Clone)]
pub struct MatchDetailDto {
    pub id: String,
    pub map_name: String,
    pub start_time: i64,
    pub duration_ms: u64,
    pub winning_team: String,
    // Wire name is `rounds_play`, not `rounds_played`.
    pub rounds_play: u32,
    pub participations: Vec<ParticipationDto>,
}

impl From<MatchDetailDto> for MatchDetail {
    fn from(value: MatchDetailDto) -> Self {
        Self {
            id: value.id,
            map_name: value.map_name,
            start_time: value.start_time,
            duration_ms: value.duration_ms,
            winning_team: value.winning_team,
            rounds_played: value.rounds_play,
            participations: value
                .participations
                .into_iter()
                .map(|participation| participation.into())
                .collect(),
        }
    }
}

/// Representation of one scoreboard line in the match detail response.
#[derive(Deserialize, Debug, Clone)]
pub struct ParticipationDto {
    pub puuid: String,
    pub user_id: String,
    pub user_tag: String,
    pub agent_name: String,
    pub team_id: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub combat_score: u32,
    pub damage_dealt: u32,
    pub headshots: u32,
    pub othershots: u32,
    pub rounds_played: u32,
    pub result: String,
    pub position: u32,
}

impl From<ParticipationDto> for Participation {
    fn from(value: ParticipationDto) -> Self {
        Self {
            puuid: value.puuid,
            user_id: value.user_id,
            user_tag: value.user_tag,
            agent_name: value.agent_name,
            team_id: value.team_id,
            kills: value.kills,
            deaths: value.deaths,
            assists: value.assists,
            combat_score: value.combat_score,
            damage_dealt: value.damage_dealt,
            headshots: value.headshots,
            othershots: value.othershots,
            rounds_played: value.rounds_played,
            result: MatchResult::from(value.result.as_str()),
            position: value.position,
        }
    }
}

/// The backend reports `kdRatio` as either a number or a formatted string.
fn de_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[async_trait]
impl MatchApi for DashboardApiClient {
    async fn get_matches(&self, region: String, puuid: String) -> ApiResponse<Vec<Match>> {
        tracing::trace!("[API] get_matches {}/{}", region, puuid);
        let path = format!("/api/v1/matches/{}/{}", encode(&region), encode(&puuid));

        let dtos: Vec<MatchSummaryDto> = self.get_json(&path).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    async fn get_match(&self, match_id: String) -> ApiResponse<MatchDetail> {
        tracing::trace!("[API] get_match {}", match_id);
        let path = format!("/api/v1/matches/{}", encode(&match_id));

        let dto: MatchDetailDto = self.get_json(&path).await?;
        Ok(dto.into())
    }
}
