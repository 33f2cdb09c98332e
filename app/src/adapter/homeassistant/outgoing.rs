use serde_json::{Value, json};

use crate::estimation::{Estimate, EstimateId, EstimateValue};
use crate::port::EstimatePublisher;

use super::HaHttpClient;

pub struct HaEstimatePublisher {
    client: HaHttpClient,
    config: Vec<(EstimateId, &'static str, &'static str)>,
    currency: String,
}

impl HaEstimatePublisher {
    pub fn new(client: HaHttpClient, config: &[(EstimateId, &'static str, &'static str)], currency: &str) -> Self {
        Self {
            client,
            config: config.to_vec(),
            currency: currency.to_owned(),
        }
    }

    fn target(&self, id: &EstimateId) -> Option<(&'static str, &'static str)> {
        self.config
            .iter()
            .find(|(estimate_id, _, _)| estimate_id == id)
            .map(|(_, entity_id, name)| (*entity_id, *name))
    }
}

impl EstimatePublisher for HaEstimatePublisher {
    #[tracing::instrument(name = "publish_estimates HA", skip_all)]
    async fn publish(&self, estimates: &[Estimate]) -> anyhow::Result<()> {
        let mut failed = 0;

        for estimate in estimates {
            let Some((entity_id, friendly_name)) = self.target(&estimate.id) else {
                continue;
            };

            let (state, attributes) = to_ha_state(&estimate.value, friendly_name, &self.currency);

            if let Err(e) = self.client.set_state(entity_id, &state, attributes).await {
                tracing::error!("Error publishing {} to Home Assistant: {:?}", entity_id, e);
                failed += 1;
            }
        }

        if failed > 0 {
            anyhow::bail!("Publishing of {} estimates failed", failed);
        }

        Ok(())
    }
}

fn to_ha_state(value: &EstimateValue, friendly_name: &str, currency: &str) -> (String, Value) {
    let (state, unit, device_class) = match value {
        EstimateValue::Weight(kg) => (format!("{:.2}", kg.0), Some("kg"), Some("weight")),
        EstimateValue::Cost(cost) => (format!("{:.2}", cost.0), Some(currency), Some("monetary")),
        EstimateValue::Duration(duration) => (format!("{:.1}", duration.as_minutes_f64()), Some("min"), Some("duration")),
        EstimateValue::Days(days) => (format!("{:.1}", days), Some("d"), Some("duration")),
        EstimateValue::Count(count) => (count.to_string(), None, None),
        EstimateValue::Coefficient(index) => (format!("{:.3}", index.0), Some("kg/°C/24h"), None),
        EstimateValue::Rate(rate) => (format!("{:.3}", rate.0), Some("kg/h"), None),
        EstimateValue::Flag(on) => ((if *on { "on" } else { "off" }).to_owned(), None, None),
        EstimateValue::Timestamp(Some(at)) => (at.to_iso_string(), None, Some("timestamp")),
        EstimateValue::Timestamp(None) => ("unknown".to_owned(), None, Some("timestamp")),
        EstimateValue::Label(label) => ((*label).to_owned(), None, None),
    };

    let mut attributes = json!({ "friendly_name": friendly_name });
    if let Some(unit) = unit {
        attributes["unit_of_measurement"] = json!(unit);
    }
    if let Some(device_class) = device_class {
        attributes["device_class"] = json!(device_class);
    }
    if let EstimateValue::Timestamp(Some(at)) = value {
        attributes["relative"] = json!(at.to_human_readable());
    }

    (state, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::Duration;
    use crate::core::unit::{Cost, EfficiencyIndex, Kilograms};
    use assert_json_diff::assert_json_eq;

    #[test]
    fn test_weight_state() {
        let (state, attributes) = to_ha_state(&EstimateValue::Weight(Kilograms(12.3456)), "Forecast total", "PLN");

        assert_eq!(state, "12.35");
        assert_json_eq!(
            attributes,
            json!({
                "friendly_name": "Forecast total",
                "unit_of_measurement": "kg",
                "device_class": "weight"
            })
        );
    }

    #[test]
    fn test_cost_state_uses_currency() {
        let (state, attributes) = to_ha_state(&EstimateValue::Cost(Cost(3.5)), "House cost", "EUR");

        assert_eq!(state, "3.50");
        assert_json_eq!(
            attributes,
            json!({
                "friendly_name": "House cost",
                "unit_of_measurement": "EUR",
                "device_class": "monetary"
            })
        );
    }

    #[test]
    fn test_range_in_days() {
        let (state, attributes) = to_ha_state(&EstimateValue::Days(5.0), "Hopper range", "PLN");

        assert_eq!(state, "5.0");
        assert_eq!(attributes["unit_of_measurement"], "d");
    }

    #[test]
    fn test_duration_in_minutes() {
        let (state, attributes) = to_ha_state(&EstimateValue::Duration(Duration::minutes_f64(12.34)), "DHW heating", "PLN");

        assert_eq!(state, "12.3");
        assert_eq!(attributes["unit_of_measurement"], "min");
    }

    #[test]
    fn test_coefficient_and_flag() {
        let (index, attributes) = to_ha_state(&EstimateValue::Coefficient(EfficiencyIndex(0.81234)), "House", "PLN");
        let (flag, flag_attributes) = to_ha_state(&EstimateValue::Flag(true), "Refill", "PLN");

        assert_eq!(index, "0.812");
        assert_eq!(attributes["unit_of_measurement"], "kg/°C/24h");
        assert_eq!(flag, "on");
        assert_json_eq!(flag_attributes, json!({ "friendly_name": "Refill" }));
    }

    #[test]
    fn test_every_published_estimate_is_configured() {
        use crate::adapter::homeassistant::config::default_ha_estimate_config;
        use crate::estimation::{Estimator, EstimatorConfig, TelemetrySnapshot};

        let now = crate::core::time::DateTime::from_iso("2024-01-10T12:00:00Z").unwrap();
        let mut estimator = Estimator::restore(EstimatorConfig::default(), None);
        let snapshot = TelemetrySnapshot::empty(now);
        estimator.advance(&snapshot);

        let config = default_ha_estimate_config();
        let estimates = estimator.projection(&snapshot).project(now).estimates();

        for estimate in estimates {
            assert!(
                config.iter().any(|(id, _, _)| *id == estimate.id),
                "{} has no Home Assistant entity",
                estimate.id.name()
            );
        }
    }
}
