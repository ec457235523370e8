use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG: &str = "explorer.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// JSON bundle holding the six collections.
    pub data_path: String,
    pub log_filter: String,
    pub default_election: String,
    pub default_indicator: String,
    pub coefficient_groups: String,
}

impl Settings {
    /// File first (optional), then `EXPLORER__*` environment variables on top.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let settings = Config::builder()
            .set_default("data_path", "data/explorer.json")?
            .set_default("log_filter", "info")?
            .set_default("default_election", "Poland_2")?
            .set_default("default_indicator", "v2x_polyarchy")?
            .set_default("coefficient_groups", "Pooled")?
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG)).required(path.is_some()))
            .add_source(Environment::with_prefix("EXPLORER").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
