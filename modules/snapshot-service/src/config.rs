use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::scheduler::RunMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("{var} is not a valid value: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Service configuration loaded from environment variables once at
/// startup. A missing credential fails the process before the polling
/// loop ever runs.
#[derive(Debug, Clone)]
pub struct Config {
    pub brightdata_token: String,
    pub supabase_project_ref: String,
    pub supabase_service_role_key: String,
    pub poll_interval: Duration,
    /// Present selects bounded mode: exit once this much wall-clock time
    /// has accumulated across cycles and sleeps.
    pub run_budget: Option<Duration>,
    /// Port for the liveness listener; absent disables it.
    pub health_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            brightdata_token: required("BRIGHTDATA_TOKEN")?,
            supabase_project_ref: required("SUPABASE_PROJECT_REF")?,
            supabase_service_role_key: required("SUPABASE_SERVICE_ROLE_KEY")?,
            poll_interval: Duration::from_secs(
                optional_parse("SNAPSHOT_POLL_INTERVAL")?.unwrap_or(60),
            ),
            run_budget: optional_parse::<u64>("RUN_BUDGET_SECS")?.map(Duration::from_secs),
            health_port: optional_parse("HEALTH_PORT")?,
        })
    }

    pub fn run_mode(&self) -> RunMode {
        match self.run_budget {
            Some(ceiling) => RunMode::Bounded { ceiling },
            None => RunMode::Continuous,
        }
    }

    /// Log the effective configuration without exposing credentials.
    pub fn log_redacted(&self) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            run_budget_secs = self.run_budget.map(|d| d.as_secs()),
            health_port = self.health_port,
            supabase_project_ref = %self.supabase_project_ref,
            "Configuration loaded"
        );
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVar(key))
}

fn optional_parse<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: key,
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
