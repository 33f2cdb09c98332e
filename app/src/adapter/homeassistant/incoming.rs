use std::collections::HashMap;

use anyhow::Context;
use serde_json::Value;

use crate::core::time::DateTime;
use crate::core::unit::{DegreeCelsius, Kilograms, Liters, PricePerKg};
use crate::estimation::{BoilerState, TelemetrySnapshot};
use crate::port::TelemetrySource;

use super::{HaChannel, HaHttpClient, HaSource, HaState, StateValue, TelemetryField, Tunable};

pub struct HaTelemetrySource {
    client: HaHttpClient,
    config: HashMap<&'static str, Vec<HaChannel>>,
}

impl HaTelemetrySource {
    pub(super) fn new(client: HaHttpClient, config: &[(&'static str, HaChannel)]) -> Self {
        Self {
            client,
            config: channels_by_entity(config),
        }
    }
}

impl TelemetrySource for HaTelemetrySource {
    async fn fetch(&self, now: DateTime) -> anyhow::Result<TelemetrySnapshot> {
        let states = self
            .client
            .get_current_state()
            .await
            .context("Error loading Home Assistant states")?;

        Ok(to_snapshot(&states, &self.config, now))
    }
}

fn channels_by_entity(config: &[(&'static str, HaChannel)]) -> HashMap<&'static str, Vec<HaChannel>> {
    let mut result: HashMap<&'static str, Vec<HaChannel>> = HashMap::new();
    for (entity_id, channel) in config {
        result.entry(*entity_id).or_default().push(*channel);
    }
    result
}

fn to_snapshot(states: &[HaState], config: &HashMap<&'static str, Vec<HaChannel>>, now: DateTime) -> TelemetrySnapshot {
    let mut snapshot = TelemetrySnapshot::empty(now);

    for state in states {
        let Some(channels) = config.get(state.entity_id.as_str()) else {
            continue;
        };

        let StateValue::Available(value) = &state.state else {
            tracing::warn!("Value of {} is not available", state.entity_id);
            continue;
        };

        for channel in channels {
            if let Err(e) = apply(&mut snapshot, *channel, value, &state.attributes) {
                tracing::error!("Error processing Home Assistant state of {}: {:?}", state.entity_id, e);
            }
        }
    }

    snapshot
}

fn apply(
    snapshot: &mut TelemetrySnapshot,
    channel: HaChannel,
    ha_value: &str,
    attributes: &HashMap<String, Value>,
) -> anyhow::Result<()> {
    match channel {
        HaChannel::Telemetry(field, source) => {
            let raw = match source {
                HaSource::State => Some(ha_value.to_owned()),
                HaSource::Attribute(name) => attribute(attributes, name),
            };

            let Some(raw) = raw else {
                return Ok(());
            };

            apply_telemetry(snapshot, field, &raw)
        }
        HaChannel::Tunable(tunable) => apply_tunable(snapshot, tunable, ha_value),
    }
}

fn apply_telemetry(snapshot: &mut TelemetrySnapshot, field: TelemetryField, raw: &str) -> anyhow::Result<()> {
    use TelemetryField::*;

    match field {
        BurnCounter => snapshot.burn_counter = Some(Kilograms(parse_number(raw)?)),
        ConsumedToday => snapshot.consumed_today = Some(Kilograms(parse_number(raw)?)),
        ConsumedYesterday => snapshot.consumed_yesterday = Some(Kilograms(parse_number(raw)?)),
        DhwConsumedToday => snapshot.dhw_consumed_today = Some(Kilograms(parse_number(raw)?)),
        HopperContent => snapshot.hopper_content = Some(Kilograms(parse_number(raw)?)),
        ExternalTemperature => snapshot.external_temperature = Some(DegreeCelsius(parse_number(raw)?)),
        WindSpeed => snapshot.wind_speed = Some(parse_number(raw)?),
        HousePump => snapshot.house_pump_on = is_on(raw),
        OfficePump => snapshot.office_pump_on = is_on(raw),
        DhwPump => snapshot.dhw_pump_on = is_on(raw),
        OfficeSwitch => snapshot.office_switch_on = Some(raw != "off"),
        BoilerStatus => snapshot.boiler_state = BoilerState::from_code(raw),
        DhwCurrent => snapshot.dhw.current = Some(DegreeCelsius(parse_number(raw)?)),
        DhwTarget => snapshot.dhw.target = Some(DegreeCelsius(parse_number(raw)?)),
        DhwHysteresis => snapshot.dhw.hysteresis = Some(DegreeCelsius(parse_number(raw)?)),
    }

    Ok(())
}

fn apply_tunable(snapshot: &mut TelemetrySnapshot, tunable: Tunable, raw: &str) -> anyhow::Result<()> {
    let value = parse_number(raw)?;
    let readings = &mut snapshot.readings;

    match tunable {
        Tunable::HouseTarget => readings.house_target = Some(DegreeCelsius(value)),
        Tunable::OfficeTarget => readings.office_target = Some(DegreeCelsius(value)),
        Tunable::PricePerTon => readings.price = Some(PricePerKg::per_ton(value)),
        Tunable::WindFactorPercent => readings.wind_factor_percent = Some(value),
        Tunable::OfficeDwellBaseMinutes => readings.office_dwell_base_minutes = Some(value),
        Tunable::DhwTankVolume => readings.dhw_tank_volume = Some(Liters(value)),
        Tunable::DhwEfficiencyPercent => readings.dhw_efficiency_percent = Some(value),
        Tunable::InsulationHouse => readings.insulation_factor_house = Some(value),
        Tunable::InsulationOffice => readings.insulation_factor_office = Some(value),
    }

    Ok(())
}

fn attribute(attributes: &HashMap<String, Value>, name: &str) -> Option<String> {
    match attributes.get(name)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s != "unknown" && s != "unavailable" => Some(s.clone()),
        _ => None,
    }
}

fn is_on(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("on")
}

/// The controller reports some values with a decimal comma.
fn parse_number(raw: &str) -> anyhow::Result<f64> {
    let value: f64 = raw
        .trim()
        .replace(',', ".")
        .parse()
        .with_context(|| format!("Not a number: {}", raw))?;

    if !value.is_finite() {
        anyhow::bail!("Not a finite number: {}", raw);
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::homeassistant::config::default_ha_state_config;
    use crate::estimation::Zone;
    use serde_json::json;

    fn states(value: serde_json::Value) -> Vec<HaState> {
        serde_json::from_value(value).unwrap()
    }

    fn now() -> DateTime {
        DateTime::from_iso("2024-01-10T12:00:00Z").unwrap()
    }

    #[test]
    fn test_maps_states_into_snapshot() {
        let config = channels_by_entity(&default_ha_state_config());
        let states = states(json!([
            { "entity_id": "sensor.nbe_pellet_total_consumption", "state": "1234,5", "attributes": {} },
            {
                "entity_id": "sensor.nbe_consumption_statistics",
                "state": "ok",
                "attributes": { "today": 7.25, "yesterday": "10.5", "dhw_today": 0.8 }
            },
            {
                "entity_id": "sensor.nbe_weather_stokercloud",
                "state": "ok",
                "attributes": { "outdoor_temp": "-3,5", "wind_speed": 4 }
            },
            { "entity_id": "binary_sensor.nbe_weather_pump_1", "state": "on" },
            { "entity_id": "binary_sensor.nbe_weather_pump_2", "state": "off" },
            { "entity_id": "switch.nbe_office_logic", "state": "on" },
            { "entity_id": "sensor.nbe_boiler_status", "state": "state_7" },
            {
                "entity_id": "sensor.nbe_dhw_temperature",
                "state": "41.0",
                "attributes": { "target": 52, "hysteresis": 6 }
            },
            { "entity_id": "number.nbe_pellet_price", "state": "1400" },
            { "entity_id": "number.nbe_house_target_temp", "state": "21.5" },
            { "entity_id": "sensor.something_else", "state": "17" }
        ]));

        let snapshot = to_snapshot(&states, &config, now());

        assert_eq!(snapshot.burn_counter, Some(Kilograms(1234.5)));
        assert_eq!(snapshot.consumed_today, Some(Kilograms(7.25)));
        assert_eq!(snapshot.consumed_yesterday, Some(Kilograms(10.5)));
        assert_eq!(snapshot.dhw_consumed_today, Some(Kilograms(0.8)));
        assert_eq!(snapshot.external_temperature, Some(DegreeCelsius(-3.5)));
        assert_eq!(snapshot.wind_speed, Some(4.0));
        assert!(snapshot.house_pump_on);
        assert!(!snapshot.office_pump_on);
        assert_eq!(snapshot.office_switch_on, Some(true));
        assert!(snapshot.is_hot_water_active());
        assert_eq!(snapshot.dhw.target(), DegreeCelsius(52.0));
        assert_eq!(snapshot.dhw.hysteresis(), DegreeCelsius(6.0));
        assert_eq!(snapshot.readings.price(), PricePerKg(1.4));
        assert_eq!(snapshot.readings.target(Zone::House), DegreeCelsius(21.5));
    }

    #[test]
    fn test_unavailable_and_invalid_values_fall_back() {
        let config = channels_by_entity(&default_ha_state_config());
        let states = states(json!([
            { "entity_id": "sensor.nbe_pellet_total_consumption", "state": "unavailable" },
            { "entity_id": "sensor.nbe_hopper_content", "state": "unknown" },
            { "entity_id": "number.nbe_office_target_temp", "state": "abc" },
            { "entity_id": "switch.nbe_office_logic", "state": "unavailable" },
            {
                "entity_id": "sensor.nbe_weather_stokercloud",
                "state": "ok",
                "attributes": { "outdoor_temp": "unknown" }
            }
        ]));

        let snapshot = to_snapshot(&states, &config, now());

        assert_eq!(snapshot.burn_counter, None);
        assert_eq!(snapshot.hopper_content, None);
        assert_eq!(snapshot.external_temperature, None);
        assert_eq!(snapshot.office_switch_on, None);
        assert!(snapshot.office_enabled());
        assert_eq!(snapshot.readings.target(Zone::Office), DegreeCelsius(18.0));
    }
}
