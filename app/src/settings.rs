use config::{Config, ConfigError, Environment, File};
use infrastructure::{HttpServerConfig, MonitoringConfig};
use serde::Deserialize;

use crate::adapter::homeassistant::HomeAssistant;
use crate::adapter::state_file::StateFile;
use crate::estimation::EstimatorConfig;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub monitoring: MonitoringConfig,
    pub http_server: HttpServerConfig,
    pub homeassistant: HomeAssistant,
    pub state_file: StateFile,
    #[serde(default)]
    pub estimator: EstimatorConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config.toml"))
            .add_source(Environment::default().separator("_").list_separator(","));

        let s = builder.build()?;
        s.try_deserialize()
    }
}
