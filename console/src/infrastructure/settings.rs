use std::env;

use anyhow::Context;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use editorial_common::{TransitionPolicy, TransitionRule};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_port: String,
    pub authors: RemoteServiceSettings,
    pub publications: RemoteServiceSettings,
    #[serde(default)]
    pub workflow: WorkflowSettings,
}

/// Where one remote service lives and how long to wait for it.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteServiceSettings {
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowSettings {
    /// Empty means the publication service alone decides.
    #[serde(default)]
    pub allowed_transitions: Vec<TransitionRule>,
}

impl WorkflowSettings {
    pub fn policy(&self) -> TransitionPolicy {
        TransitionPolicy::from_rules(self.allowed_transitions.iter().copied())
    }
}

fn default_request_timeout() -> u64 {
    10
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        let run_mode = load_env("RUN_MODE", "development");

        let s = Config::builder()
            .add_source(File::with_name("./config/default"))
            .add_source(File::with_name(&format!("./config/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize().with_context(|| "failed to read config")
    }
}

fn load_env(key: &str, default_value: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default_value.into())
}
