use crate::core::time::DateTime;
use crate::core::unit::{DegreeCelsius, Kilograms, Liters, PricePerKg};

use super::config::defaults;

#[derive(Debug, Clone)]
pub struct TelemetrySnapshot {
    pub timestamp: DateTime,
    pub burn_counter: Option<Kilograms>,
    pub consumed_today: Option<Kilograms>,
    pub consumed_yesterday: Option<Kilograms>,
    pub dhw_consumed_today: Option<Kilograms>,
    pub hopper_content: Option<Kilograms>,
    pub external_temperature: Option<DegreeCelsius>,
    pub wind_speed: Option<f64>,
    pub house_pump_on: bool,
    pub office_pump_on: bool,
    pub office_switch_on: Option<bool>,
    pub dhw_pump_on: bool,
    pub boiler_state: BoilerState,
    pub dhw: DhwReadings,
    pub readings: ExternalReadings,
}

impl TelemetrySnapshot {
    pub fn empty(timestamp: DateTime) -> Self {
        Self {
            timestamp,
            burn_counter: None,
            consumed_today: None,
            consumed_yesterday: None,
            dhw_consumed_today: None,
            hopper_content: None,
            external_temperature: None,
            wind_speed: None,
            house_pump_on: false,
            office_pump_on: false,
            office_switch_on: None,
            dhw_pump_on: false,
            boiler_state: BoilerState::Unknown,
            dhw: DhwReadings::default(),
            readings: ExternalReadings::default(),
        }
    }

    pub fn external_temperature(&self) -> DegreeCelsius {
        self.external_temperature.unwrap_or(defaults::EXTERNAL_TEMPERATURE)
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed.unwrap_or(0.0)
    }

    pub fn office_enabled(&self) -> bool {
        self.office_switch_on.unwrap_or(true)
    }

    pub fn is_hot_water_active(&self) -> bool {
        self.boiler_state.is_hot_water()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DhwReadings {
    pub current: Option<DegreeCelsius>,
    pub target: Option<DegreeCelsius>,
    pub hysteresis: Option<DegreeCelsius>,
}

impl DhwReadings {
    pub fn current(&self) -> DegreeCelsius {
        self.current.unwrap_or(defaults::DHW_CURRENT)
    }

    pub fn target(&self) -> DegreeCelsius {
        self.target.unwrap_or(defaults::DHW_TARGET)
    }

    pub fn hysteresis(&self) -> DegreeCelsius {
        self.hysteresis.unwrap_or(defaults::DHW_HYSTERESIS)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExternalReadings {
    pub house_target: Option<DegreeCelsius>,
    pub office_target: Option<DegreeCelsius>,
    pub price: Option<PricePerKg>,
    pub wind_factor_percent: Option<f64>,
    pub office_dwell_base_minutes: Option<f64>,
    pub dhw_tank_volume: Option<Liters>,
    pub dhw_efficiency_percent: Option<f64>,
    pub insulation_factor_house: Option<f64>,
    pub insulation_factor_office: Option<f64>,
}

impl ExternalReadings {
    pub fn target(&self, zone: super::Zone) -> DegreeCelsius {
        match zone {
            super::Zone::House => self.house_target.unwrap_or(defaults::HOUSE_TARGET),
            super::Zone::Office => self.office_target.unwrap_or(defaults::OFFICE_TARGET),
        }
    }

    pub fn price(&self) -> PricePerKg {
        self.price.unwrap_or(defaults::PRICE)
    }

    pub fn wind_factor(&self) -> f64 {
        self.wind_factor_percent.unwrap_or(defaults::WIND_FACTOR_PERCENT) / 100.0
    }

    pub fn office_dwell_base_minutes(&self) -> f64 {
        self.office_dwell_base_minutes
            .unwrap_or(defaults::OFFICE_DWELL_BASE_MINUTES)
    }

    pub fn dhw_tank_volume(&self) -> Liters {
        self.dhw_tank_volume.unwrap_or(Liters(defaults::DHW_TANK_LITERS))
    }

    pub fn dhw_efficiency(&self) -> f64 {
        let percent = self
            .dhw_efficiency_percent
            .filter(|p| *p > 0.0)
            .unwrap_or(defaults::DHW_EFFICIENCY_PERCENT);
        percent / 100.0
    }

    pub fn insulation_factor(&self, zone: super::Zone) -> f64 {
        match zone {
            super::Zone::House => self.insulation_factor_house.unwrap_or(defaults::INSULATION_HOUSE),
            super::Zone::Office => self.insulation_factor_office.unwrap_or(defaults::INSULATION_OFFICE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoilerState {
    Waiting,
    Starting,
    Ignition,
    Running,
    HotWater,
    Stopped,
    Cleaning,
    Alarm,
    Unknown,
}

impl BoilerState {
    /// Parses raw controller codes (`state_7`, `lng_state_7`) as well as labels
    /// already translated by the cloud integration.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().trim_start_matches("lng_");

        match code.to_ascii_lowercase().as_str() {
            "state_0" => BoilerState::Waiting,
            "state_1" => BoilerState::Starting,
            "state_2" | "state_4" => BoilerState::Ignition,
            "state_5" => BoilerState::Running,
            "state_7" | "cwu" | "hot water" | "grzanie wody" => BoilerState::HotWater,
            "state_9" | "state_14" | "state_22" | "state_23" | "state_24" | "state_25" | "state_46" => {
                BoilerState::Stopped
            }
            "state_43" => BoilerState::Cleaning,
            "state_8" | "state_11" | "state_12" | "state_13" | "state_15" | "state_17" | "state_19"
            | "state_20" | "state_29" | "state_31" | "state_36" | "state_37" | "state_38" | "state_39"
            | "state_41" | "state_42" | "state_44" | "state_45" | "state_49" | "state_50" => BoilerState::Alarm,
            _ => BoilerState::Unknown,
        }
    }

    pub fn is_hot_water(&self) -> bool {
        matches!(self, BoilerState::HotWater)
    }
}
