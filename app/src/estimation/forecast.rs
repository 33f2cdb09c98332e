use crate::core::time::Duration;
use crate::core::unit::{Cost, DegreeCelsius, EfficiencyIndex, Kilograms, Liters, PricePerKg};

use super::config::EstimatorConfig;
use super::efficiency::predicted_rate;
use super::snapshot::DhwReadings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastTarget {
    House,
    Office,
    Dhw,
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneForecast {
    pub consumed: Kilograms,
    pub remaining: Kilograms,
}

impl ZoneForecast {
    pub fn total(&self) -> Kilograms {
        self.consumed + self.remaining
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhwForecast {
    pub consumed: Kilograms,
    pub reheat: Kilograms,
    pub standby: Kilograms,
}

impl DhwForecast {
    pub fn total(&self) -> Kilograms {
        self.consumed + self.reheat + self.standby
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    pub house: ZoneForecast,
    pub office: ZoneForecast,
    pub dhw: DhwForecast,
    pub price: PricePerKg,
}

impl Forecast {
    pub fn weight(&self, target: ForecastTarget) -> Kilograms {
        match target {
            ForecastTarget::House => self.house.total(),
            ForecastTarget::Office => self.office.total(),
            ForecastTarget::Dhw => self.dhw.total(),
            ForecastTarget::Total => self.house.total() + self.office.total() + self.dhw.total(),
        }
    }

    pub fn cost(&self, target: ForecastTarget) -> Cost {
        self.weight(target) * self.price
    }
}

pub fn building_forecast(
    index: EfficiencyIndex,
    effective_delta_t: f64,
    hours_left: Duration,
    consumed: Kilograms,
    heating_enabled: bool,
) -> ZoneForecast {
    let remaining = if heating_enabled {
        predicted_rate(index, effective_delta_t) * hours_left
    } else {
        Kilograms(0.0)
    };

    ZoneForecast { consumed, remaining }
}

pub fn dhw_forecast(
    config: &EstimatorConfig,
    dhw: &DhwReadings,
    tank_volume: Liters,
    efficiency: f64,
    consumed: Kilograms,
    hours_left: Duration,
) -> DhwForecast {
    let reheat = if dhw.current() < dhw.target() - dhw.hysteresis() {
        let energy = config.reheat_energy(tank_volume.0, dhw.target() - dhw.current());
        config.fuel_for_energy(energy, efficiency)
    } else {
        Kilograms(0.0)
    };

    DhwForecast {
        consumed,
        reheat,
        standby: config.standby_loss() * hours_left,
    }
}

pub fn simulated_daily_demand(insulation_factor: f64, target: DegreeCelsius, external: DegreeCelsius) -> Kilograms {
    Kilograms(insulation_factor * (target - external).0.max(0.0))
}
