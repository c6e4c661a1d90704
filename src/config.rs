use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::domain::SeverityPolicy;
use crate::report::ReportPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub forecast: ForecastDefaults,
    #[serde(default)]
    pub severity: SeverityPolicy,
    #[serde(default)]
    pub report: ReportPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Request-level forecast defaults, overridable per request via query
/// parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastDefaults {
    pub horizon_days: u32,
    pub uncertainty_samples: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("INSIGHTS__").split("__"));
        Ok(figment.extract()?)
    }
}
