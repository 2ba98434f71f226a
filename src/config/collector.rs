use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Collector endpoint as written in the scenario file. Both fields may be
/// overridden from the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved collector endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    pub host: String,
    pub port: u16,
}

impl CollectorSettings {
    /// Reads `CDM_HOST` / `CDM_PORT`, falling back to the scenario file.
    pub fn from_env(fallback: &CollectorConfig) -> Result<Self> {
        let env = ::config::Config::builder()
            .add_source(::config::Environment::with_prefix("CDM"))
            .build()
            .context("Failed to read collector settings from the environment")?;
        Self::resolve(&env, fallback)
    }

    pub fn resolve(source: &::config::Config, fallback: &CollectorConfig) -> Result<Self> {
        let host = match source.get_string("host") {
            Ok(host) => Some(host),
            Err(::config::ConfigError::NotFound(_)) => fallback.host.clone(),
            Err(e) => return Err(e).context("CDM_HOST is not a valid string"),
        }
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| anyhow!("Please define a collector host (CDM_HOST or [collector].host)"))?;

        let port = match source.get_int("port") {
            Ok(port) => Some(u16::try_from(port).with_context(|| format!("CDM_PORT {} is out of range", port))?),
            Err(::config::ConfigError::NotFound(_)) => fallback.port,
            Err(e) => return Err(e).context("CDM_PORT is not a valid port number"),
        }
        .ok_or_else(|| anyhow!("Please define a collector port (CDM_PORT or [collector].port)"))?;

        Ok(Self { host, port })
    }

    pub fn url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
