//! Shared handler state.

use std::sync::Arc;

use task_gateway_core::{HttpTaskTracker, TaskGateway, TaskTracker, TaskTrackerClient};

use crate::config::Config;
use crate::transport::ReqwestTransport;

#[derive(Clone)]
pub struct AppState {
    pub gateway: TaskGateway,
}

impl AppState {
    pub fn new(gateway: TaskGateway) -> Self {
        Self { gateway }
    }

    /// State backed by the real upstream described in `config`.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new(config.upstream_timeout())?;
        let tracker: Arc<dyn TaskTracker> = Arc::new(HttpTaskTracker::new(
            TaskTrackerClient::new(&config.base_url),
            transport,
        ));
        let gateway = TaskGateway::new(tracker).with_policy(config.upstream_policy());
        Ok(Self::new(gateway))
    }
}
