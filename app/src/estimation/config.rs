use serde::Deserialize;

use crate::core::time::Duration;
use crate::core::unit::{DegreeCelsius, EfficiencyIndex, KiloWattHours, Kilograms, KilogramsPerHour, PricePerKg};
use crate::t;

/// Tuning constants of the estimator. Every value has a default matching the
/// empirically tuned behaviour; none of them is a physical law.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub poll_interval: Duration,

    pub min_window: Duration,
    pub noise_floor_kg: f64,

    pub ema_alpha: f64,
    pub efficiency_min: f64,
    pub efficiency_max: f64,
    pub initial_house_index: f64,
    pub initial_office_index: f64,

    pub pump_grace: Duration,
    pub max_attribution_gap: Duration,
    pub attribution_tolerance: f64,

    pub range_history_weight: f64,
    pub range_sentinel_days: f64,
    pub range_min_daily_burn_kg: f64,
    pub range_refill_warning_days: f64,

    pub dhw_standby_loss_kg_per_hour: f64,
    pub specific_heat_kwh_per_liter_kelvin: f64,
    pub pellet_calorific_kwh_per_kg: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            poll_interval: t!(60 seconds),
            min_window: t!(300 seconds),
            noise_floor_kg: 0.005,
            ema_alpha: 0.1,
            efficiency_min: 0.1,
            efficiency_max: 15.0,
            initial_house_index: 0.8,
            initial_office_index: 0.6,
            pump_grace: t!(600 seconds),
            max_attribution_gap: t!(1 hours),
            attribution_tolerance: 1.15,
            range_history_weight: 0.7,
            range_sentinel_days: 99.0,
            range_min_daily_burn_kg: 0.5,
            range_refill_warning_days: 2.0,
            dhw_standby_loss_kg_per_hour: 0.02,
            specific_heat_kwh_per_liter_kelvin: 0.00116,
            pellet_calorific_kwh_per_kg: 4.8,
        }
    }
}

impl EstimatorConfig {
    pub fn initial_index(&self, zone: super::Zone) -> EfficiencyIndex {
        match zone {
            super::Zone::House => EfficiencyIndex(self.initial_house_index),
            super::Zone::Office => EfficiencyIndex(self.initial_office_index),
        }
    }

    pub fn standby_loss(&self) -> KilogramsPerHour {
        KilogramsPerHour(self.dhw_standby_loss_kg_per_hour)
    }

    pub fn reheat_energy(&self, volume_liters: f64, gap: DegreeCelsius) -> KiloWattHours {
        KiloWattHours(volume_liters * gap.0.max(0.0) * self.specific_heat_kwh_per_liter_kelvin)
    }

    pub fn fuel_for_energy(&self, energy: KiloWattHours, efficiency: f64) -> Kilograms {
        Kilograms(energy.0 / (self.pellet_calorific_kwh_per_kg * efficiency))
    }
}

pub mod defaults {
    use super::*;

    pub const HOUSE_TARGET: DegreeCelsius = DegreeCelsius(22.0);
    pub const OFFICE_TARGET: DegreeCelsius = DegreeCelsius(18.0);
    pub const PRICE: PricePerKg = PricePerKg(1.25);
    pub const WIND_FACTOR_PERCENT: f64 = 5.0;
    pub const OFFICE_DWELL_BASE_MINUTES: f64 = 10.0;
    pub const DHW_TANK_LITERS: f64 = 200.0;
    pub const DHW_EFFICIENCY_PERCENT: f64 = 85.0;
    pub const DHW_CURRENT: DegreeCelsius = DegreeCelsius(40.0);
    pub const DHW_TARGET: DegreeCelsius = DegreeCelsius(50.0);
    pub const DHW_HYSTERESIS: DegreeCelsius = DegreeCelsius(5.0);
    pub const INSULATION_HOUSE: f64 = 0.6;
    pub const INSULATION_OFFICE: f64 = 1.2;
    pub const EXTERNAL_TEMPERATURE: DegreeCelsius = DegreeCelsius(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize_from_empty_table() {
        let config: EstimatorConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.min_window, t!(300 seconds));
        assert_eq!(config.ema_alpha, 0.1);
        assert_eq!(config.range_history_weight, 0.7);
    }

    #[test]
    fn test_partial_override() {
        let config: EstimatorConfig =
            serde_json::from_str(r#"{ "poll_interval": "PT2M", "ema_alpha": 0.2 }"#).unwrap();

        assert_eq!(config.poll_interval, t!(2 minutes));
        assert_eq!(config.ema_alpha, 0.2);
        assert_eq!(config.noise_floor_kg, 0.005);
    }

    #[test]
    fn test_dhw_reheat_fuel() {
        let config = EstimatorConfig::default();

        let energy = config.reheat_energy(200.0, DegreeCelsius(10.0));
        let fuel = config.fuel_for_energy(energy, 0.85);

        assert!((energy.0 - 2.32).abs() < 1e-9);
        assert!((fuel.0 - 0.568_627).abs() < 1e-5);
    }
}
