mod client;
mod config;
mod incoming;
mod outgoing;

use std::collections::HashMap;

use client::HaHttpClient;
use incoming::HaTelemetrySource;
use outgoing::HaEstimatePublisher;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Deserialize, Clone)]
pub struct HomeAssistant {
    pub url: String,
    pub token: String,
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "PLN".to_owned()
}

impl HomeAssistant {
    pub fn new_telemetry_source(&self) -> anyhow::Result<HaTelemetrySource> {
        let client = HaHttpClient::new(&self.url, &self.token, self.timeout_secs)?;
        Ok(HaTelemetrySource::new(client, &config::default_ha_state_config()))
    }

    pub fn new_estimate_publisher(&self) -> anyhow::Result<HaEstimatePublisher> {
        let client = HaHttpClient::new(&self.url, &self.token, self.timeout_secs)?;
        Ok(HaEstimatePublisher::new(
            client,
            &config::default_ha_estimate_config(),
            &self.currency,
        ))
    }
}

#[derive(Debug, Clone, Copy)]
enum HaSource {
    State,
    Attribute(&'static str),
}

#[derive(Debug, Clone, Copy)]
enum TelemetryField {
    BurnCounter,
    ConsumedToday,
    ConsumedYesterday,
    DhwConsumedToday,
    HopperContent,
    ExternalTemperature,
    WindSpeed,
    HousePump,
    OfficePump,
    DhwPump,
    OfficeSwitch,
    BoilerStatus,
    DhwCurrent,
    DhwTarget,
    DhwHysteresis,
}

#[derive(Debug, Clone, Copy)]
enum Tunable {
    HouseTarget,
    OfficeTarget,
    PricePerTon,
    WindFactorPercent,
    OfficeDwellBaseMinutes,
    DhwTankVolume,
    DhwEfficiencyPercent,
    InsulationHouse,
    InsulationOffice,
}

#[derive(Debug, Clone, Copy)]
enum HaChannel {
    Telemetry(TelemetryField, HaSource),
    Tunable(Tunable),
}

#[derive(Deserialize, Debug, Clone)]
pub struct HaState {
    pub entity_id: String,
    pub state: StateValue,
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Available(String),
    Unavailable,
}

impl<'de> Deserialize<'de> for StateValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        match value.as_str() {
            "unavailable" | "unknown" | "" => Ok(StateValue::Unavailable),
            _ => Ok(StateValue::Available(value)),
        }
    }
}
