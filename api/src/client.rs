use std::{fmt::Debug, num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use nonzero_ext::nonzero;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use valdeck_shared::{
    errors::{ApiError, ApiResponse},
    traits::DashboardApiFull,
};

use crate::metrics::RequestMetrics;

/// Client for every endpoint the dashboard consumes.
///
/// Requests go through a shared client-side rate limiter so a burst of
/// navigation can never hammer the backend.
#[derive(Debug)]
pub struct DashboardApiClient {
    pub client: reqwest::Client,
    pub limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    base_url: String,
    pub metrics: Arc<RequestMetrics>,
}

impl DashboardApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_rate_limit(base_url, nonzero!(20_u32))
    }

    pub fn with_rate_limit(base_url: impl Into<String>, per_second: NonZeroU32) -> Self {
        let base_url = base_url.into();

        Self {
            client: reqwest::Client::new(),
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
            base_url: base_url.trim_end_matches('/').to_string(),
            metrics: RequestMetrics::new(),
        }
    }

    /// Spawn a task logging periodic metrics about requests.
    pub fn start_metrics_logging(&self) {
        let metrics = self.metrics.clone();
        tokio::spawn(async move { metrics.log_loop().await });
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned + Debug>(&self, path: &str) -> ApiResponse<T> {
        let res = self.get_raw(path).await?;
        res.json().await.map_err(ApiError::Http)
    }

    pub(crate) async fn post_json<T: DeserializeOwned + Debug>(
        &self,
        path: &str,
    ) -> ApiResponse<T> {
        self.limiter.until_ready().await;
        self.metrics.inc();

        let res = self
            .client
            .post(self.url(path))
            .send()
            .await
            .map_err(ApiError::Http)?;
        Self::check_status(res)?.json().await.map_err(ApiError::Http)
    }

    /// GET returning the raw response, used for JSON and streamed bodies.
    pub(crate) async fn get_raw(&self, path: &str) -> ApiResponse<reqwest::Response> {
        self.limiter.until_ready().await;
        self.metrics.inc();

        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(ApiError::Http)?;
        Self::check_status(res)
    }

    fn check_status(res: reqwest::Response) -> ApiResponse<reqwest::Response> {
        match res.status() {
            StatusCode::OK => Ok(res),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            status => Err(ApiError::Status(status)),
        }
    }
}

impl DashboardApiFull for DashboardApiClient {}
