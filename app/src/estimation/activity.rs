use serde::{Deserialize, Serialize};

use crate::core::time::{DateTime, Duration};
use crate::core::unit::DegreeCelsius;

/// Heating activity of the auxiliary zone. The start timestamp survives short
/// pump pauses so that a short-cycling pump does not restart the dwell clock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneActivity {
    started_at: Option<DateTime>,
    #[serde(skip)]
    last_pump_on: Option<DateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityStatus {
    pub active: bool,
    pub reliable: bool,
    pub elapsed: Duration,
    pub dwell_threshold_minutes: f64,
}

impl ActivityStatus {
    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed.as_minutes_f64()
    }

    pub fn remaining_minutes(&self) -> f64 {
        if self.active {
            (self.dwell_threshold_minutes - self.elapsed_minutes()).max(0.0)
        } else {
            0.0
        }
    }
}

impl ZoneActivity {
    pub fn started_at(&self) -> Option<DateTime> {
        self.started_at
    }

    pub fn update(&mut self, switch_on: bool, pump_on: bool, now: DateTime, grace: Duration) {
        if !switch_on {
            self.started_at = None;
            return;
        }

        if pump_on {
            self.last_pump_on = Some(now);
            self.started_at.get_or_insert(now);
            return;
        }

        if self.started_at.is_none() {
            return;
        }

        // after a restart the pump-on time is unknown, the start is kept until the
        // pump is seen again or the switch goes off
        if self.last_pump_on.is_some_and(|last_on| now.elapsed_since(last_on) > grace) {
            tracing::debug!("Pump off for more than {} min, clearing activity", grace.as_minutes_f64());
            self.started_at = None;
        }
    }

    pub fn status(
        &self,
        switch_on: bool,
        pump_on: bool,
        now: DateTime,
        external: DegreeCelsius,
        dwell_base_minutes: f64,
    ) -> ActivityStatus {
        let active = switch_on && pump_on;
        let elapsed = match self.started_at {
            Some(start) if now > start => now.elapsed_since(start),
            _ => Duration::zero(),
        };
        let dwell_threshold_minutes = dwell_threshold_minutes(dwell_base_minutes, external);

        ActivityStatus {
            active,
            reliable: active && elapsed.as_minutes_f64() >= dwell_threshold_minutes,
            elapsed,
            dwell_threshold_minutes,
        }
    }
}

/// Colder weather needs more time until flow and return temperatures settle.
pub fn dwell_threshold_minutes(base_minutes: f64, external: DegreeCelsius) -> f64 {
    base_minutes + ((10.0 - external.0) / 5.0).max(0.0) * 4.0
}
