use async_trait::async_trait;
use serde::Deserialize;
use urlencoding::encode;
use valdeck_shared::{PlayerInfo, errors::ApiResponse, traits::PlayerApi};

use crate::client::DashboardApiClient;

/// Representation of the player lookup response.
#[derive(Deserialize, Debug, Clone)]
pub struct PlayerDto {
    pub puuid: String,
    pub region: String,
}

#[async_trait]
impl PlayerApi for DashboardApiClient {
    async fn get_player(&self, game_name: String, tag_line: String) -> ApiResponse<PlayerInfo> {
        tracing::trace!("[API] get_player {}#{}", game_name, tag_line);
        let path = format!(
            "/api/v1/players/{}/{}",
            encode(&game_name),
            encode(&tag_line)
        );

        let dto: PlayerDto = self.get_json(&path).await?;
        Ok(PlayerInfo {
            game_name,
            tag_line,
            puuid: dto.puuid,
            region: dto.region,
        })
    }
}
