mod accumulator;
mod activity;
pub mod config;
mod diagnostics;
mod dhw_session;
mod efficiency;
mod estimate;
mod forecast;
mod range;
mod sampler;
mod snapshot;

pub use accumulator::{AccumulatorTotals, Accumulators, ConsumptionSplit};
pub use activity::{ActivityStatus, ZoneActivity};
pub use config::EstimatorConfig;
pub use diagnostics::InsulationDeviation;
pub use dhw_session::DhwSession;
pub use efficiency::{Attribution, AttributionBasis, EfficiencyUpdate};
pub use estimate::{Consumer, Estimate, EstimateId, EstimateValue};
pub use forecast::{Forecast, ForecastTarget};
pub use range::RangeEstimate;
pub use sampler::WindowOutcome;
pub use snapshot::{BoilerState, ExternalReadings, TelemetrySnapshot};

use serde::{Deserialize, Serialize};

use crate::core::time::{DateTime, Duration};
use crate::core::unit::{Cost, EfficiencyIndex, Kilograms};
use accumulator::{ConsumptionSplitter, SplitConditions};
use dhw_session::DhwSessionTracker;
use sampler::DeltaWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    House,
    Office,
}

impl Zone {
    pub fn name(&self) -> &'static str {
        match self {
            Zone::House => "house",
            Zone::Office => "office",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub house_index: Option<EfficiencyIndex>,
    pub office_index: Option<EfficiencyIndex>,
    #[serde(default)]
    pub office_activity: ZoneActivity,
    #[serde(default)]
    pub accumulators: Accumulators,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateDelta {
    pub window: Option<WindowOutcome>,
    pub hot_water_freeze: bool,
    pub attribution: Attribution,
    pub efficiency: Option<(Zone, EfficiencyUpdate)>,
    pub consumption: ConsumptionSplit,
    pub finished_dhw_session: Option<DhwSession>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UpdateCounters {
    pub accepted: u64,
    pub rejected: u64,
}

/// Owns all mutable estimation state. Mutated only through [`Estimator::advance`].
#[derive(Debug, Clone)]
pub struct Estimator {
    config: EstimatorConfig,
    house_index: EfficiencyIndex,
    office_index: EfficiencyIndex,
    office_activity: ZoneActivity,
    window: DeltaWindow,
    splitter: ConsumptionSplitter,
    accumulators: Accumulators,
    dhw_session: DhwSessionTracker,
    last_attribution: Option<Attribution>,
    counters: UpdateCounters,
}

impl Estimator {
    pub fn restore(config: EstimatorConfig, state: Option<PersistedState>) -> Self {
        let state = state.unwrap_or_default();
        let house_index = restored_index(&config, Zone::House, state.house_index);
        let office_index = restored_index(&config, Zone::Office, state.office_index);

        Self {
            config,
            house_index,
            office_index,
            office_activity: state.office_activity,
            window: DeltaWindow::default(),
            splitter: ConsumptionSplitter::default(),
            accumulators: state.accumulators,
            dhw_session: DhwSessionTracker::default(),
            last_attribution: None,
            counters: UpdateCounters::default(),
        }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn index(&self, zone: Zone) -> EfficiencyIndex {
        match zone {
            Zone::House => self.house_index,
            Zone::Office => self.office_index,
        }
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            house_index: Some(self.house_index),
            office_index: Some(self.office_index),
            office_activity: self.office_activity.clone(),
            accumulators: self.accumulators.clone(),
        }
    }

    pub fn advance(&mut self, snapshot: &TelemetrySnapshot) -> StateDelta {
        let now = snapshot.timestamp;
        let readings = &snapshot.readings;
        let external = snapshot.external_temperature();
        let office_enabled = snapshot.office_enabled();
        let hot_water = snapshot.is_hot_water_active();

        self.office_activity
            .update(office_enabled, snapshot.office_pump_on, now, self.config.pump_grace);
        let office_status = self.office_activity.status(
            office_enabled,
            snapshot.office_pump_on,
            now,
            external,
            readings.office_dwell_base_minutes(),
        );

        let house_dt = self.effective_delta_t(snapshot, Zone::House);
        let office_dt = self.effective_delta_t(snapshot, Zone::Office);
        let pred_house = efficiency::predicted_rate(self.house_index, house_dt);
        let pred_office = efficiency::predicted_rate(self.office_index, office_dt);

        let window = snapshot.burn_counter.map(|counter| {
            self.window.sample(
                now,
                counter,
                self.config.min_window,
                Kilograms(self.config.noise_floor_kg),
            )
        });

        let (attribution, efficiency) = match window {
            Some(WindowOutcome::Closed { .. }) if hot_water => {
                tracing::debug!("Hot water heating active, efficiency indices frozen");
                (Attribution::predicted(pred_house, pred_office), None)
            }
            Some(WindowOutcome::Closed { rate, .. }) => {
                let attribution = efficiency::attribute(rate, pred_house, pred_office, office_status.reliable);
                let update = attribution.calibrating_zone().map(|zone| {
                    let delta_t = match zone {
                        Zone::House => house_dt,
                        Zone::Office => office_dt,
                    };
                    let candidate = efficiency::candidate_index(attribution.share(zone), delta_t);
                    (zone, self.apply_candidate(zone, candidate))
                });
                (attribution, update)
            }
            _ => (Attribution::predicted(pred_house, pred_office), None),
        };

        let consumption = match snapshot.consumed_today {
            Some(counter) => self.splitter.split(
                now,
                counter,
                SplitConditions {
                    hot_water_active: hot_water,
                    house_pump_on: snapshot.house_pump_on,
                    office_active: snapshot.house_pump_on && snapshot.office_pump_on && office_enabled,
                    house_expected: pred_house,
                },
                self.config.max_attribution_gap,
                self.config.attribution_tolerance,
            ),
            None => ConsumptionSplit::default(),
        };

        self.accumulators
            .record(now, consumption, snapshot.dhw_consumed_today, readings.price());

        let finished_dhw_session = self
            .dhw_session
            .update(snapshot.dhw_pump_on, snapshot.burn_counter, now);

        self.last_attribution = Some(attribution);

        StateDelta {
            window,
            hot_water_freeze: hot_water && matches!(window, Some(WindowOutcome::Closed { .. })),
            attribution,
            efficiency,
            consumption,
            finished_dhw_session,
        }
    }

    pub fn projection(&self, snapshot: &TelemetrySnapshot) -> Projection {
        Projection {
            config: self.config.clone(),
            snapshot: snapshot.clone(),
            house_index: self.house_index,
            office_index: self.office_index,
            office_activity: self.office_activity.clone(),
            attribution: self.last_attribution,
            accumulators: self.accumulators.clone(),
            dhw_session: self.dhw_session.clone(),
            counters: self.counters,
        }
    }

    fn apply_candidate(&mut self, zone: Zone, candidate: f64) -> EfficiencyUpdate {
        let update = efficiency::smooth(self.index(zone), candidate, &self.config);

        match update {
            EfficiencyUpdate::Accepted { previous, updated, .. } => {
                tracing::debug!("{} index updated {} -> {} (candidate {:.3})", zone.name(), previous, updated, candidate);
                self.counters.accepted += 1;
                match zone {
                    Zone::House => self.house_index = updated,
                    Zone::Office => self.office_index = updated,
                }
            }
            EfficiencyUpdate::Rejected { retained, .. } => {
                tracing::debug!("{} index candidate {:.3} rejected, keeping {}", zone.name(), candidate, retained);
                self.counters.rejected += 1;
            }
        }

        update
    }

    fn effective_delta_t(&self, snapshot: &TelemetrySnapshot, zone: Zone) -> f64 {
        efficiency::effective_delta_t(
            snapshot.readings.target(zone),
            snapshot.external_temperature(),
            snapshot.wind_speed(),
            snapshot.readings.wind_factor(),
        )
    }
}

fn restored_index(config: &EstimatorConfig, zone: Zone, index: Option<EfficiencyIndex>) -> EfficiencyIndex {
    match index {
        Some(index) if index.0 > config.efficiency_min && index.0 < config.efficiency_max => index,
        Some(index) => {
            tracing::warn!("Ignoring persisted {} index {} outside of bounds", zone.name(), index);
            config.initial_index(zone)
        }
        None => config.initial_index(zone),
    }
}

/// Read-only view of the estimator. Projecting never changes estimator state.
#[derive(Debug, Clone)]
pub struct Projection {
    config: EstimatorConfig,
    snapshot: TelemetrySnapshot,
    house_index: EfficiencyIndex,
    office_index: EfficiencyIndex,
    office_activity: ZoneActivity,
    attribution: Option<Attribution>,
    accumulators: Accumulators,
    dhw_session: DhwSessionTracker,
    counters: UpdateCounters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSimulation {
    pub house: Kilograms,
    pub office: Kilograms,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DhwSessionReport {
    pub heating: bool,
    pub current_duration: Duration,
    pub last: Option<DhwSession>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub timestamp: DateTime,
    pub house_index: EfficiencyIndex,
    pub office_index: EfficiencyIndex,
    pub attribution: Option<Attribution>,
    pub counters: UpdateCounters,
    pub office_dwell: ActivityStatus,
    pub forecast: Forecast,
    pub range: RangeEstimate,
    pub totals: AccumulatorTotals,
    pub insulation: InsulationDeviation,
    pub heating_cost_today: Cost,
    pub simulation: ZoneSimulation,
    pub dhw_session: DhwSessionReport,
}

impl Projection {
    pub fn project(&self, now: DateTime) -> ForecastReport {
        let snapshot = &self.snapshot;
        let readings = &snapshot.readings;
        let external = snapshot.external_temperature();
        let hours_left = now.until_end_of_day();
        let price = readings.price();

        let house_dt = self.effective_delta_t(Zone::House);
        let office_dt = self.effective_delta_t(Zone::Office);

        let forecast = Forecast {
            house: forecast::building_forecast(
                self.house_index,
                house_dt,
                hours_left,
                Kilograms(self.accumulators.house_consumption.today(now)),
                true,
            ),
            office: forecast::building_forecast(
                self.office_index,
                office_dt,
                hours_left,
                Kilograms(self.accumulators.office_consumption.today(now)),
                snapshot.office_switch_on == Some(true),
            ),
            dhw: forecast::dhw_forecast(
                &self.config,
                &snapshot.dhw,
                readings.dhw_tank_volume(),
                readings.dhw_efficiency(),
                snapshot.dhw_consumed_today.unwrap_or_default(),
                hours_left,
            ),
            price,
        };

        let range = range::estimate_range(
            snapshot.hopper_content.unwrap_or_default(),
            snapshot.consumed_yesterday.unwrap_or_default(),
            forecast.weight(ForecastTarget::Total),
            now,
            &self.config,
        );

        let simulation = ZoneSimulation {
            house: forecast::simulated_daily_demand(
                readings.insulation_factor(Zone::House),
                readings.target(Zone::House),
                external,
            ),
            office: forecast::simulated_daily_demand(
                readings.insulation_factor(Zone::Office),
                readings.target(Zone::Office),
                external,
            ),
        };

        ForecastReport {
            timestamp: now,
            house_index: self.house_index,
            office_index: self.office_index,
            attribution: self.attribution,
            counters: self.counters,
            office_dwell: self.office_activity.status(
                snapshot.office_enabled(),
                snapshot.office_pump_on,
                now,
                external,
                readings.office_dwell_base_minutes(),
            ),
            forecast,
            range,
            totals: self.accumulators.totals(),
            insulation: InsulationDeviation::new(self.house_index, readings.insulation_factor(Zone::House)),
            heating_cost_today: snapshot.consumed_today.unwrap_or_default() * price,
            simulation,
            dhw_session: DhwSessionReport {
                heating: self.dhw_session.is_heating(),
                current_duration: self.dhw_session.current_duration(now),
                last: self.dhw_session.last_session(),
            },
        }
    }

    fn effective_delta_t(&self, zone: Zone) -> f64 {
        efficiency::effective_delta_t(
            self.snapshot.readings.target(zone),
            self.snapshot.external_temperature(),
            self.snapshot.wind_speed(),
            self.snapshot.readings.wind_factor(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unit::DegreeCelsius;
    use crate::t;

    fn start() -> DateTime {
        DateTime::from_iso("2024-01-10T10:00:00Z").unwrap()
    }

    fn snapshot(timestamp: DateTime, counter: f64) -> TelemetrySnapshot {
        TelemetrySnapshot {
            burn_counter: Some(Kilograms(counter)),
            external_temperature: Some(DegreeCelsius(2.0)),
            wind_speed: Some(0.0),
            house_pump_on: true,
            office_switch_on: Some(false),
            boiler_state: BoilerState::Running,
            ..TelemetrySnapshot::empty(timestamp)
        }
    }

    fn office_on(snapshot: TelemetrySnapshot) -> TelemetrySnapshot {
        TelemetrySnapshot {
            office_switch_on: Some(true),
            office_pump_on: true,
            ..snapshot
        }
    }

    fn estimator() -> Estimator {
        Estimator::restore(EstimatorConfig::default(), None)
    }

    #[test]
    fn test_no_update_within_min_window() {
        let mut estimator = estimator();

        estimator.advance(&snapshot(start(), 100.0));
        let delta = estimator.advance(&snapshot(start() + t!(100 seconds), 101.0));

        assert!(matches!(delta.window, Some(WindowOutcome::Pending { .. })));
        assert_eq!(delta.efficiency, None);
        assert_eq!(estimator.index(Zone::House), EfficiencyIndex(0.8));
    }

    #[test]
    fn test_house_calibrates_alone() {
        let mut estimator = estimator();

        estimator.advance(&snapshot(start(), 100.0));
        let delta = estimator.advance(&snapshot(start() + t!(1 hours), 101.0));

        let (zone, update) = delta.efficiency.unwrap();
        assert_eq!(zone, Zone::House);
        assert!(matches!(update, EfficiencyUpdate::Accepted { .. }));
        assert!((estimator.index(Zone::House).0 - 0.84).abs() < 1e-9);
        assert_eq!(estimator.index(Zone::Office), EfficiencyIndex(0.6));
        assert_eq!(delta.attribution.basis, AttributionBasis::HouseOnly);
    }

    #[test]
    fn test_shared_heating_splits_and_calibrates_office() {
        let mut estimator = estimator();

        estimator.advance(&office_on(snapshot(start(), 100.0)));
        let delta = estimator.advance(&office_on(snapshot(start() + t!(30 minutes), 101.0)));

        let attribution = delta.attribution;
        assert_eq!(attribution.basis, AttributionBasis::Shared);
        assert!((attribution.house.0 + attribution.office.0 - 2.0).abs() < 1e-12);
        assert!((attribution.office.0 - 0.75).abs() < 1e-9);

        assert_eq!(delta.efficiency.map(|(zone, _)| zone), Some(Zone::Office));
        assert!((estimator.index(Zone::Office).0 - 0.6525).abs() < 1e-9);
        assert_eq!(estimator.index(Zone::House), EfficiencyIndex(0.8));
    }

    #[test]
    fn test_office_not_trusted_before_dwell() {
        let mut estimator = estimator();

        estimator.advance(&office_on(snapshot(start(), 100.0)));
        let delta = estimator.advance(&office_on(snapshot(start() + t!(10 minutes), 100.3)));

        assert_eq!(delta.attribution.basis, AttributionBasis::HouseOnly);
        assert_eq!(delta.efficiency.map(|(zone, _)| zone), Some(Zone::House));
    }

    #[test]
    fn test_hot_water_tick_freezes_indices() {
        let mut estimator = estimator();
        let hot_water = |timestamp, counter, daily, dhw_daily| TelemetrySnapshot {
            boiler_state: BoilerState::HotWater,
            consumed_today: Some(Kilograms(daily)),
            dhw_consumed_today: Some(Kilograms(dhw_daily)),
            ..snapshot(timestamp, counter)
        };

        estimator.advance(&hot_water(start(), 100.0, 10.0, 1.0));
        let delta = estimator.advance(&hot_water(start() + t!(10 minutes), 105.0, 15.0, 6.0));

        assert!(delta.hot_water_freeze);
        assert_eq!(delta.efficiency, None);
        assert_eq!(delta.consumption, ConsumptionSplit::default());
        assert_eq!(estimator.index(Zone::House), EfficiencyIndex(0.8));

        let totals = estimator.accumulators.totals();
        assert_eq!(totals.house, Kilograms(0.0));
        assert_eq!(totals.dhw, Kilograms(5.0));

        // baseline moved on during hot water, no spike afterwards
        let after = estimator.advance(&snapshot(start() + t!(20 minutes), 105.1));
        match after.window {
            Some(WindowOutcome::Closed { rate, .. }) => assert!((rate.0 - 0.6).abs() < 1e-9),
            other => panic!("Unexpected window {:?}", other),
        }
    }

    #[test]
    fn test_outlier_candidate_is_reported() {
        let mut estimator = estimator();

        estimator.advance(&snapshot(start(), 100.0));
        let delta = estimator.advance(&snapshot(start() + t!(1 hours), 117.0));

        assert!(matches!(delta.efficiency, Some((Zone::House, EfficiencyUpdate::Rejected { .. }))));
        assert_eq!(estimator.index(Zone::House), EfficiencyIndex(0.8));
        assert_eq!(estimator.counters.rejected, 1);
    }

    #[test]
    fn test_missing_counter_skips_sampler() {
        let mut estimator = estimator();

        estimator.advance(&snapshot(start(), 100.0));
        let missing = TelemetrySnapshot {
            burn_counter: None,
            ..snapshot(start() + t!(1 hours), 0.0)
        };
        let delta = estimator.advance(&missing);

        assert_eq!(delta.window, None);
        assert_eq!(delta.efficiency, None);

        let resumed = estimator.advance(&snapshot(start() + t!(2 hours), 102.0));
        assert!(matches!(resumed.window, Some(WindowOutcome::Closed { .. })));
    }

    #[test]
    fn test_consumption_accumulates_by_zone() {
        let mut estimator = estimator();
        let with_daily = |timestamp, counter, daily| TelemetrySnapshot {
            consumed_today: Some(Kilograms(daily)),
            readings: ExternalReadings {
                price: Some(crate::core::unit::PricePerKg(1.0)),
                ..Default::default()
            },
            ..snapshot(timestamp, counter)
        };

        estimator.advance(&with_daily(start(), 100.0, 3.0));
        estimator.advance(&with_daily(start() + t!(30 minutes), 100.5, 3.5));
        estimator.advance(&with_daily(start() + t!(60 minutes), 101.0, 4.0));

        let totals = estimator.accumulators.totals();
        assert!((totals.house.0 - 1.0).abs() < 1e-12);
        assert!((totals.house_cost.0 - 1.0).abs() < 1e-12);
        assert_eq!(totals.office, Kilograms(0.0));
    }

    #[test]
    fn test_persisted_state_roundtrip() {
        let mut estimator = estimator();
        estimator.advance(&snapshot(start(), 100.0));
        estimator.advance(&snapshot(start() + t!(1 hours), 101.0));

        let json = serde_json::to_string(&estimator.persisted_state()).unwrap();
        let restored = Estimator::restore(EstimatorConfig::default(), Some(serde_json::from_str(&json).unwrap()));

        assert_eq!(restored.index(Zone::House), estimator.index(Zone::House));
        assert_eq!(restored.index(Zone::Office), EfficiencyIndex(0.6));
    }

    #[test]
    fn test_restore_ignores_index_out_of_bounds() {
        let state = PersistedState {
            house_index: Some(EfficiencyIndex(42.0)),
            office_index: Some(EfficiencyIndex(1.1)),
            ..Default::default()
        };

        let restored = Estimator::restore(EstimatorConfig::default(), Some(state));

        assert_eq!(restored.index(Zone::House), EfficiencyIndex(0.8));
        assert_eq!(restored.index(Zone::Office), EfficiencyIndex(1.1));
    }

    #[test]
    fn test_projection_is_read_only() {
        let mut estimator = estimator();
        let telemetry = TelemetrySnapshot {
            hopper_content: Some(Kilograms(47.0)),
            consumed_yesterday: Some(Kilograms(10.0)),
            ..snapshot(start(), 100.0)
        };
        estimator.advance(&telemetry);

        let before = estimator.persisted_state();
        let projection = estimator.projection(&telemetry);
        let first = projection.project(start() + t!(5 minutes));
        let second = projection.project(start() + t!(5 minutes));

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_value(estimator.persisted_state()).unwrap(),
            serde_json::to_value(before).unwrap()
        );
        assert_eq!(first.range.yesterday, Kilograms(10.0));
        assert!(first.forecast.weight(ForecastTarget::Total).0 > 0.0);
        assert!(first.estimates().iter().any(|e| e.id == EstimateId::RangeDays));
    }
}
