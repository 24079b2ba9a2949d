//! Gateway configuration.

use std::time::Duration;

use clap::Parser;
use task_gateway_core::UpstreamPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.example.com";

/// Task gateway - validates task submissions and forwards them upstream
#[derive(Debug, Clone, Parser)]
#[command(name = "task-gateway")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Address the HTTP server binds to.
    #[arg(long, env = "GATEWAY_BIND_ADDR", default_value = "127.0.0.1:8080")]
    pub bind_addr: String,

    /// Base URL of the upstream task-tracking API.
    #[arg(long, env = "EXTERNAL_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Timeout for a single upstream call (seconds).
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,

    /// Answer 502 when the upstream create fails instead of echoing the
    /// submitted task.
    #[arg(long, env = "SURFACE_UPSTREAM_ERRORS")]
    pub surface_upstream_errors: bool,
}

impl Config {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn upstream_policy(&self) -> UpstreamPolicy {
        if self.surface_upstream_errors {
            UpstreamPolicy::Surface
        } else {
            UpstreamPolicy::Fallback
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            upstream_timeout_secs: 10,
            surface_upstream_errors: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_parser_defaults() {
        let parsed = Config::try_parse_from(["task-gateway"]).unwrap();
        let default = Config::default();
        assert_eq!(parsed.bind_addr, default.bind_addr);
        assert_eq!(parsed.upstream_timeout_secs, default.upstream_timeout_secs);
        assert_eq!(parsed.upstream_policy(), UpstreamPolicy::Fallback);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "task-gateway",
            "--base-url",
            "http://tracker.internal:9000",
            "--upstream-timeout-secs",
            "3",
            "--surface-upstream-errors",
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://tracker.internal:9000");
        assert_eq!(config.upstream_timeout(), Duration::from_secs(3));
        assert_eq!(config.upstream_policy(), UpstreamPolicy::Surface);
    }
}
