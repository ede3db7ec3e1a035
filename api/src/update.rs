use async_trait::async_trait;
use serde::Deserialize;
use urlencoding::encode;
use valdeck_shared::{UpdateStatus, errors::ApiResponse, traits::UpdateApi};

use crate::client::DashboardApiClient;

/// Representation of the update trigger response.
#[derive(Deserialize, Debug, Clone)]
pub struct UpdateTriggeredDto {
    pub task_id: String,
}

#[async_trait]
impl UpdateApi for DashboardApiClient {
    async fn start_update(&self, region: String, puuid: String) -> ApiResponse<String> {
        tracing::trace!("[API] start_update {}/{}", region, puuid);
        let path = format!(
            "/api/v1/matches/{}/{}/update",
            encode(&region),
            encode(&puuid)
        );

        let dto: UpdateTriggeredDto = self.post_json(&path).await?;
        Ok(dto.task_id)
    }

    async fn update_status(&self, task_id: String) -> ApiResponse<UpdateStatus> {
        let path = format!("/api/v1/matches/update/status/{}", encode(&task_id));
        self.get_json(&path).await
    }
}
