use std::sync::Arc;

use tracing::info;
use valdeck_api::DashboardApiClient;
use valdeck_session::{DashboardSession, ReportSession};
use valdeck_update_poller::UpdatePoller;

use crate::{
    cli::{Cli, SessionRefresh},
    config::Config,
    error::AppError,
};

mod cli;
mod config;
mod error;
mod logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    logging::init();

    let config = Config::from_env()?;
    info!("starting valdeck against {}", config.api_base_url);

    let api = Arc::new(DashboardApiClient::with_rate_limit(
        config.api_base_url.clone(),
        config.api_rate_limit_per_second,
    ));
    api.start_metrics_logging();

    let session = DashboardSession::new(api.clone());
    let report = ReportSession::new(api.clone());
    let poller = UpdatePoller::with_timing(
        api.clone(),
        Arc::new(SessionRefresh(session.clone())),
        config.poll_interval,
        config.poll_timeout,
    );

    Cli::new(session, report, poller).run().await
}
