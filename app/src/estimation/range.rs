use crate::core::time::{DateTime, Duration};
use crate::core::unit::Kilograms;

use super::config::EstimatorConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeEstimate {
    /// Days of fuel left, one decimal. Sentinel value if there is no meaningful burn.
    pub days: f64,
    pub daily_burn: Kilograms,
    pub yesterday: Kilograms,
    pub forecast_today: Kilograms,
    pub empty_at: Option<DateTime>,
    pub refill_needed: bool,
}

impl RangeEstimate {
    pub fn is_sentinel(&self) -> bool {
        self.empty_at.is_none()
    }
}

pub fn daily_burn_rate(yesterday: Kilograms, forecast_today: Kilograms, history_weight: f64) -> Kilograms {
    match (yesterday.0 > 0.0, forecast_today.0 > 0.0) {
        (true, true) => Kilograms(yesterday.0 * history_weight + forecast_today.0 * (1.0 - history_weight)),
        (true, false) => yesterday,
        (false, _) => Kilograms(forecast_today.0.max(0.0)),
    }
}

pub fn estimate_range(
    hopper: Kilograms,
    yesterday: Kilograms,
    forecast_today: Kilograms,
    now: DateTime,
    config: &EstimatorConfig,
) -> RangeEstimate {
    let daily_burn = daily_burn_rate(yesterday, forecast_today, config.range_history_weight);

    if daily_burn.0 < config.range_min_daily_burn_kg {
        return RangeEstimate {
            days: config.range_sentinel_days,
            daily_burn,
            yesterday,
            forecast_today,
            empty_at: None,
            refill_needed: false,
        };
    }

    let days = round_to_tenth(hopper.0.max(0.0) / daily_burn.0);

    let Some(empty_at) = now.checked_add(Duration::days_f64(days)) else {
        tracing::warn!("Hopper content {} gives no representable empty date, reporting sentinel", hopper);
        return RangeEstimate {
            days: config.range_sentinel_days,
            daily_burn,
            yesterday,
            forecast_today,
            empty_at: None,
            refill_needed: false,
        };
    };

    RangeEstimate {
        days,
        daily_burn,
        yesterday,
        forecast_today,
        empty_at: Some(empty_at),
        refill_needed: days < config.range_refill_warning_days,
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::t;

    fn now() -> DateTime {
        DateTime::from_iso("2024-01-10T12:00:00Z").unwrap()
    }

    #[test]
    fn test_blended_range() {
        let config = EstimatorConfig::default();

        let range = estimate_range(Kilograms(47.0), Kilograms(10.0), Kilograms(8.0), now(), &config);

        assert!((range.daily_burn.0 - 9.4).abs() < 1e-9);
        assert_eq!(range.days, 5.0);
        assert_eq!(range.empty_at, Some(now() + t!(120 hours)));
        assert!(!range.refill_needed);
    }

    #[test]
    fn test_sentinel_without_burn() {
        let config = EstimatorConfig::default();

        let range = estimate_range(Kilograms(47.0), Kilograms(0.0), Kilograms(0.0), now(), &config);

        assert_eq!(range.days, 99.0);
        assert!(range.is_sentinel());
        assert!(!range.refill_needed);
    }

    #[test]
    fn test_implausible_hopper_reading_reports_sentinel() {
        let config = EstimatorConfig::default();

        let range = estimate_range(Kilograms(1.0e12), Kilograms(10.0), Kilograms(8.0), now(), &config);

        assert_eq!(range.days, 99.0);
        assert!(range.is_sentinel());
        assert!(!range.refill_needed);
    }

    #[test]
    fn test_single_component_fallback() {
        assert_eq!(daily_burn_rate(Kilograms(10.0), Kilograms(0.0), 0.7), Kilograms(10.0));
        assert_eq!(daily_burn_rate(Kilograms(0.0), Kilograms(8.0), 0.7), Kilograms(8.0));
    }

    #[test]
    fn test_low_hopper_requests_refill() {
        let config = EstimatorConfig::default();

        let range = estimate_range(Kilograms(15.0), Kilograms(10.0), Kilograms(10.0), now(), &config);

        assert_eq!(range.days, 1.5);
        assert!(range.refill_needed);
        assert_eq!(range.empty_at, Some(now() + t!(36 hours)));
    }
}
