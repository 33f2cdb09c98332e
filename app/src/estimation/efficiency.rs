use crate::core::unit::{DegreeCelsius, EfficiencyIndex, KilogramsPerHour};

use super::Zone;
use super::config::EstimatorConfig;

pub fn effective_delta_t(target: DegreeCelsius, external: DegreeCelsius, wind_speed: f64, wind_factor: f64) -> f64 {
    (target - external).0.max(1.0) * (1.0 + wind_speed * wind_factor)
}

pub fn predicted_rate(index: EfficiencyIndex, effective_delta_t: f64) -> KilogramsPerHour {
    KilogramsPerHour(index.0 * effective_delta_t / 24.0)
}

pub fn candidate_index(share: KilogramsPerHour, effective_delta_t: f64) -> f64 {
    share.0 * 24.0 / effective_delta_t
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EfficiencyUpdate {
    Accepted {
        previous: EfficiencyIndex,
        candidate: f64,
        updated: EfficiencyIndex,
    },
    Rejected {
        candidate: f64,
        retained: EfficiencyIndex,
    },
}

impl EfficiencyUpdate {
    pub fn index(&self) -> EfficiencyIndex {
        match self {
            EfficiencyUpdate::Accepted { updated, .. } => *updated,
            EfficiencyUpdate::Rejected { retained, .. } => *retained,
        }
    }
}

/// Exponential smoothing of the index. Candidates outside the open bounds are
/// dropped and the current index is kept.
pub fn smooth(current: EfficiencyIndex, candidate: f64, config: &EstimatorConfig) -> EfficiencyUpdate {
    if !(candidate > config.efficiency_min && candidate < config.efficiency_max) {
        return EfficiencyUpdate::Rejected {
            candidate,
            retained: current,
        };
    }

    let alpha = config.ema_alpha;
    EfficiencyUpdate::Accepted {
        previous: current,
        candidate,
        updated: EfficiencyIndex(current.0 * (1.0 - alpha) + candidate * alpha),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributionBasis {
    Predicted,
    HouseOnly,
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attribution {
    pub basis: AttributionBasis,
    pub rate: KilogramsPerHour,
    pub house: KilogramsPerHour,
    pub office: KilogramsPerHour,
}

impl Attribution {
    pub fn predicted(pred_house: KilogramsPerHour, pred_office: KilogramsPerHour) -> Self {
        Self {
            basis: AttributionBasis::Predicted,
            rate: KilogramsPerHour(0.0),
            house: pred_house,
            office: pred_office,
        }
    }

    pub fn share(&self, zone: Zone) -> KilogramsPerHour {
        match zone {
            Zone::House => self.house,
            Zone::Office => self.office,
        }
    }

    pub fn calibrating_zone(&self) -> Option<Zone> {
        match self.basis {
            AttributionBasis::Predicted => None,
            AttributionBasis::HouseOnly => Some(Zone::House),
            AttributionBasis::Shared => Some(Zone::Office),
        }
    }
}

pub fn attribute(
    rate: KilogramsPerHour,
    pred_house: KilogramsPerHour,
    pred_office: KilogramsPerHour,
    office_reliable: bool,
) -> Attribution {
    let total_pred = pred_house.0 + pred_office.0;

    if !office_reliable || total_pred <= 0.0 {
        return Attribution {
            basis: AttributionBasis::HouseOnly,
            rate,
            house: rate,
            office: pred_office,
        };
    }

    let office = KilogramsPerHour(rate.0 * (pred_office.0 / total_pred));
    Attribution {
        basis: AttributionBasis::Shared,
        rate,
        house: KilogramsPerHour(rate.0 - office.0),
        office,
    }
}
