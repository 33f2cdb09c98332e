use serde::Serialize;

use crate::core::time::{DateTime, Duration};
use crate::core::unit::{Cost, EfficiencyIndex, Kilograms, KilogramsPerHour};

use super::{ForecastReport, ForecastTarget, Zone};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EstimateValue {
    Weight(Kilograms),
    Cost(Cost),
    #[serde(serialize_with = "serialize_minutes")]
    Duration(Duration),
    Days(f64),
    Count(u64),
    Coefficient(EfficiencyIndex),
    Rate(KilogramsPerHour),
    Flag(bool),
    Timestamp(Option<DateTime>),
    Label(&'static str),
}

impl EstimateValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EstimateValue::Weight(v) => Some(v.0),
            EstimateValue::Cost(v) => Some(v.0),
            EstimateValue::Duration(v) => Some(v.as_minutes_f64()),
            EstimateValue::Days(v) => Some(*v),
            EstimateValue::Count(v) => Some(*v as f64),
            EstimateValue::Coefficient(v) => Some(v.0),
            EstimateValue::Rate(v) => Some(v.0),
            EstimateValue::Flag(v) => Some(if *v { 1.0 } else { 0.0 }),
            EstimateValue::Timestamp(_) | EstimateValue::Label(_) => None,
        }
    }
}

fn serialize_minutes<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_minutes_f64())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstimateId {
    Efficiency(Zone),
    BurnRate,
    AttributedRate(Zone),
    AcceptedUpdates,
    RejectedUpdates,
    OfficeDwellActive,
    OfficeDwellElapsed,
    OfficeDwellThreshold,
    OfficeDwellRemaining,
    ForecastWeight(ForecastTarget),
    ForecastCost(ForecastTarget),
    RangeDays,
    RangeDailyBurn,
    RangeYesterday,
    RangeForecastToday,
    RangeEmptyDate,
    RefillNeeded,
    ConsumptionTotal(Consumer),
    CostTotal(Consumer),
    InsulationDeviation,
    InsulationStatus,
    HeatingCostToday,
    SimulationWeight(Zone),
    SimulationCost(Zone),
    DhwHeating,
    DhwHeatingTime,
    DhwLastSessionConsumption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Consumer {
    House,
    Office,
    Dhw,
}

impl Consumer {
    fn name(&self) -> &'static str {
        match self {
            Consumer::House => "house",
            Consumer::Office => "office",
            Consumer::Dhw => "dhw",
        }
    }
}

impl ForecastTarget {
    pub fn name(&self) -> &'static str {
        match self {
            ForecastTarget::House => "house",
            ForecastTarget::Office => "office",
            ForecastTarget::Dhw => "dhw",
            ForecastTarget::Total => "total",
        }
    }
}

impl EstimateId {
    pub fn name(&self) -> String {
        match self {
            EstimateId::Efficiency(zone) => format!("{}_efficiency", zone.name()),
            EstimateId::BurnRate => "burn_rate".to_owned(),
            EstimateId::AttributedRate(zone) => format!("{}_burn_rate", zone.name()),
            EstimateId::AcceptedUpdates => "efficiency_updates_accepted".to_owned(),
            EstimateId::RejectedUpdates => "efficiency_updates_rejected".to_owned(),
            EstimateId::OfficeDwellActive => "office_dwell_active".to_owned(),
            EstimateId::OfficeDwellElapsed => "office_dwell_elapsed".to_owned(),
            EstimateId::OfficeDwellThreshold => "office_dwell_threshold".to_owned(),
            EstimateId::OfficeDwellRemaining => "office_dwell_remaining".to_owned(),
            EstimateId::ForecastWeight(target) => format!("forecast_{}_weight", target.name()),
            EstimateId::ForecastCost(target) => format!("forecast_{}_cost", target.name()),
            EstimateId::RangeDays => "pellet_range".to_owned(),
            EstimateId::RangeDailyBurn => "pellet_daily_burn".to_owned(),
            EstimateId::RangeYesterday => "pellet_range_yesterday".to_owned(),
            EstimateId::RangeForecastToday => "pellet_range_forecast".to_owned(),
            EstimateId::RangeEmptyDate => "pellet_empty_date".to_owned(),
            EstimateId::RefillNeeded => "pellet_refill_needed".to_owned(),
            EstimateId::ConsumptionTotal(consumer) => format!("{}_consumption_total", consumer.name()),
            EstimateId::CostTotal(consumer) => format!("{}_cost_total", consumer.name()),
            EstimateId::InsulationDeviation => "insulation_deviation".to_owned(),
            EstimateId::InsulationStatus => "insulation_status".to_owned(),
            EstimateId::HeatingCostToday => "heating_cost_actual".to_owned(),
            EstimateId::SimulationWeight(zone) => format!("simulation_{}_weight", zone.name()),
            EstimateId::SimulationCost(zone) => format!("simulation_{}_cost", zone.name()),
            EstimateId::DhwHeating => "dhw_heating".to_owned(),
            EstimateId::DhwHeatingTime => "dhw_heating_time".to_owned(),
            EstimateId::DhwLastSessionConsumption => "dhw_last_session_consumption".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    #[serde(serialize_with = "serialize_id")]
    pub id: EstimateId,
    #[serde(flatten)]
    pub value: EstimateValue,
}

fn serialize_id<S: serde::Serializer>(id: &EstimateId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.name())
}

impl ForecastReport {
    pub fn estimates(&self) -> Vec<Estimate> {
        use EstimateId::*;

        let targets = [
            ForecastTarget::House,
            ForecastTarget::Office,
            ForecastTarget::Dhw,
            ForecastTarget::Total,
        ];
        let price = self.forecast.price;

        let mut result = vec![
            (Efficiency(Zone::House), EstimateValue::Coefficient(self.house_index)),
            (Efficiency(Zone::Office), EstimateValue::Coefficient(self.office_index)),
            (AcceptedUpdates, EstimateValue::Count(self.counters.accepted)),
            (RejectedUpdates, EstimateValue::Count(self.counters.rejected)),
            (OfficeDwellActive, EstimateValue::Flag(self.office_dwell.active)),
            (OfficeDwellElapsed, EstimateValue::Duration(self.office_dwell.elapsed)),
            (
                OfficeDwellThreshold,
                EstimateValue::Duration(Duration::minutes_f64(self.office_dwell.dwell_threshold_minutes)),
            ),
            (
                OfficeDwellRemaining,
                EstimateValue::Duration(Duration::minutes_f64(self.office_dwell.remaining_minutes())),
            ),
        ];

        if let Some(attribution) = &self.attribution {
            result.push((BurnRate, EstimateValue::Rate(attribution.rate)));
            result.push((AttributedRate(Zone::House), EstimateValue::Rate(attribution.house)));
            result.push((AttributedRate(Zone::Office), EstimateValue::Rate(attribution.office)));
        }

        for target in targets {
            result.push((ForecastWeight(target), EstimateValue::Weight(self.forecast.weight(target))));
            result.push((ForecastCost(target), EstimateValue::Cost(self.forecast.cost(target))));
        }

        result.extend([
            (RangeDays, EstimateValue::Days(self.range.days)),
            (RangeDailyBurn, EstimateValue::Weight(self.range.daily_burn)),
            (RangeYesterday, EstimateValue::Weight(self.range.yesterday)),
            (RangeForecastToday, EstimateValue::Weight(self.range.forecast_today)),
            (RangeEmptyDate, EstimateValue::Timestamp(self.range.empty_at)),
            (RefillNeeded, EstimateValue::Flag(self.range.refill_needed)),
            (ConsumptionTotal(Consumer::House), EstimateValue::Weight(self.totals.house)),
            (ConsumptionTotal(Consumer::Office), EstimateValue::Weight(self.totals.office)),
            (ConsumptionTotal(Consumer::Dhw), EstimateValue::Weight(self.totals.dhw)),
            (CostTotal(Consumer::House), EstimateValue::Cost(self.totals.house_cost)),
            (CostTotal(Consumer::Office), EstimateValue::Cost(self.totals.office_cost)),
            (CostTotal(Consumer::Dhw), EstimateValue::Cost(self.totals.dhw_cost)),
            (
                InsulationDeviation,
                EstimateValue::Coefficient(EfficiencyIndex(self.insulation.deviation)),
            ),
            (InsulationStatus, EstimateValue::Label(self.insulation.class.code())),
            (HeatingCostToday, EstimateValue::Cost(self.heating_cost_today)),
            (SimulationWeight(Zone::House), EstimateValue::Weight(self.simulation.house)),
            (SimulationWeight(Zone::Office), EstimateValue::Weight(self.simulation.office)),
            (SimulationCost(Zone::House), EstimateValue::Cost(self.simulation.house * price)),
            (SimulationCost(Zone::Office), EstimateValue::Cost(self.simulation.office * price)),
            (DhwHeating, EstimateValue::Flag(self.dhw_session.heating)),
            (DhwHeatingTime, EstimateValue::Duration(self.dhw_session.current_duration)),
            (
                DhwLastSessionConsumption,
                EstimateValue::Weight(
                    self.dhw_session
                        .last
                        .map(|session| session.consumed_rounded())
                        .unwrap_or_default(),
                ),
            ),
        ]);

        result
            .into_iter()
            .map(|(id, value)| Estimate { id, value })
            .collect()
    }
}
