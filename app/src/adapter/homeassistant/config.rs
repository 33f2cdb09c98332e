use crate::estimation::{Consumer, EstimateId, ForecastTarget, Zone};

use super::{HaChannel, HaSource, TelemetryField, Tunable};

pub fn default_ha_state_config() -> Vec<(&'static str, HaChannel)> {
    use HaSource::*;
    use TelemetryField::*;

    vec![
        //
        // BURNER
        //
        ("sensor.nbe_pellet_total_consumption", HaChannel::Telemetry(BurnCounter, State)),
        (
            "sensor.nbe_consumption_statistics",
            HaChannel::Telemetry(ConsumedToday, Attribute("today")),
        ),
        (
            "sensor.nbe_consumption_statistics",
            HaChannel::Telemetry(ConsumedYesterday, Attribute("yesterday")),
        ),
        (
            "sensor.nbe_consumption_statistics",
            HaChannel::Telemetry(DhwConsumedToday, Attribute("dhw_today")),
        ),
        ("sensor.nbe_hopper_content", HaChannel::Telemetry(HopperContent, State)),
        ("sensor.nbe_boiler_status", HaChannel::Telemetry(BoilerStatus, State)),
        //
        // WEATHER
        //
        (
            "sensor.nbe_weather_stokercloud",
            HaChannel::Telemetry(ExternalTemperature, Attribute("outdoor_temp")),
        ),
        (
            "sensor.nbe_weather_stokercloud",
            HaChannel::Telemetry(WindSpeed, Attribute("wind_speed")),
        ),
        //
        // PUMPS AND SWITCHES
        //
        ("binary_sensor.nbe_weather_pump_1", HaChannel::Telemetry(HousePump, State)),
        ("binary_sensor.nbe_weather_pump_2", HaChannel::Telemetry(OfficePump, State)),
        ("binary_sensor.nbe_dhw_pump", HaChannel::Telemetry(DhwPump, State)),
        ("switch.nbe_office_logic", HaChannel::Telemetry(OfficeSwitch, State)),
        //
        // HOT WATER
        //
        ("sensor.nbe_dhw_temperature", HaChannel::Telemetry(DhwCurrent, State)),
        ("sensor.nbe_dhw_temperature", HaChannel::Telemetry(DhwTarget, Attribute("target"))),
        (
            "sensor.nbe_dhw_temperature",
            HaChannel::Telemetry(DhwHysteresis, Attribute("hysteresis")),
        ),
        //
        // TUNABLES
        //
        ("number.nbe_house_target_temp", HaChannel::Tunable(Tunable::HouseTarget)),
        ("number.nbe_office_target_temp", HaChannel::Tunable(Tunable::OfficeTarget)),
        ("number.nbe_pellet_price", HaChannel::Tunable(Tunable::PricePerTon)),
        ("number.nbe_wind_factor", HaChannel::Tunable(Tunable::WindFactorPercent)),
        ("number.nbe_office_time_shift", HaChannel::Tunable(Tunable::OfficeDwellBaseMinutes)),
        ("number.nbe_dhw_tank_volume", HaChannel::Tunable(Tunable::DhwTankVolume)),
        ("number.nbe_system_efficiency", HaChannel::Tunable(Tunable::DhwEfficiencyPercent)),
        ("number.nbe_insulation_factor_house", HaChannel::Tunable(Tunable::InsulationHouse)),
        ("number.nbe_insulation_factor_office", HaChannel::Tunable(Tunable::InsulationOffice)),
    ]
}

pub fn default_ha_estimate_config() -> Vec<(EstimateId, &'static str, &'static str)> {
    use EstimateId::*;

    vec![
        (Efficiency(Zone::House), "sensor.nbe_house_efficiency", "House efficiency index"),
        (Efficiency(Zone::Office), "sensor.nbe_office_efficiency", "Office efficiency index"),
        (BurnRate, "sensor.nbe_burn_rate", "Burn rate"),
        (AttributedRate(Zone::House), "sensor.nbe_house_burn_rate", "House burn rate"),
        (AttributedRate(Zone::Office), "sensor.nbe_office_burn_rate", "Office burn rate"),
        (AcceptedUpdates, "sensor.nbe_efficiency_updates_accepted", "Efficiency updates accepted"),
        (RejectedUpdates, "sensor.nbe_efficiency_updates_rejected", "Efficiency updates rejected"),
        (OfficeDwellActive, "binary_sensor.nbe_office_heating_active", "Office heating active"),
        (OfficeDwellElapsed, "sensor.nbe_office_dwell_elapsed", "Office dwell elapsed"),
        (OfficeDwellThreshold, "sensor.nbe_office_dwell_limit", "Office dwell limit"),
        (OfficeDwellRemaining, "sensor.nbe_office_dwell_remaining", "Office dwell remaining"),
        (ForecastWeight(ForecastTarget::House), "sensor.nbe_forecast_house_weight", "Forecast house"),
        (ForecastWeight(ForecastTarget::Office), "sensor.nbe_forecast_office_weight", "Forecast office"),
        (ForecastWeight(ForecastTarget::Dhw), "sensor.nbe_forecast_dhw_weight", "Forecast hot water"),
        (ForecastWeight(ForecastTarget::Total), "sensor.nbe_forecast_total_weight", "Forecast total"),
        (ForecastCost(ForecastTarget::House), "sensor.nbe_forecast_house_cost", "Forecast house cost"),
        (ForecastCost(ForecastTarget::Office), "sensor.nbe_forecast_office_cost", "Forecast office cost"),
        (ForecastCost(ForecastTarget::Dhw), "sensor.nbe_forecast_dhw_cost", "Forecast hot water cost"),
        (ForecastCost(ForecastTarget::Total), "sensor.nbe_forecast_total_cost", "Forecast total cost"),
        (RangeDays, "sensor.nbe_pellet_range", "Hopper range"),
        (RangeDailyBurn, "sensor.nbe_pellet_daily_burn", "Average daily burn"),
        (RangeYesterday, "sensor.nbe_pellet_range_yesterday", "Burn yesterday"),
        (RangeForecastToday, "sensor.nbe_pellet_range_forecast", "Burn forecast today"),
        (RangeEmptyDate, "sensor.nbe_pellet_empty_date", "Hopper expected empty"),
        (RefillNeeded, "binary_sensor.nbe_pellet_refill_needed", "Hopper refill needed"),
        (ConsumptionTotal(Consumer::House), "sensor.nbe_house_consumption_total", "House consumption"),
        (ConsumptionTotal(Consumer::Office), "sensor.nbe_office_consumption_total", "Office consumption"),
        (ConsumptionTotal(Consumer::Dhw), "sensor.nbe_dhw_consumption_total", "Hot water consumption"),
        (CostTotal(Consumer::House), "sensor.nbe_house_cost_total", "House cost"),
        (CostTotal(Consumer::Office), "sensor.nbe_office_cost_total", "Office cost"),
        (CostTotal(Consumer::Dhw), "sensor.nbe_dhw_cost_total", "Hot water cost"),
        (InsulationDeviation, "sensor.nbe_insulation_deviation", "Insulation deviation"),
        (InsulationStatus, "sensor.nbe_insulation_status", "Insulation status"),
        (HeatingCostToday, "sensor.nbe_heating_cost_actual", "Heating cost today"),
        (SimulationWeight(Zone::House), "sensor.nbe_forecast_house_sim_weight", "Simulation house"),
        (SimulationWeight(Zone::Office), "sensor.nbe_forecast_office_sim_weight", "Simulation office"),
        (SimulationCost(Zone::House), "sensor.nbe_forecast_house_sim_cost", "Simulation house cost"),
        (SimulationCost(Zone::Office), "sensor.nbe_forecast_office_sim_cost", "Simulation office cost"),
        (DhwHeating, "binary_sensor.nbe_dhw_heating", "Hot water heating"),
        (DhwHeatingTime, "sensor.nbe_dhw_heating_time", "Hot water heating time"),
        (
            DhwLastSessionConsumption,
            "sensor.nbe_dhw_last_cycle_consumption",
            "Hot water last cycle consumption",
        ),
    ]
}
