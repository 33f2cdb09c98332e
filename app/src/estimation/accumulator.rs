use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::time::{DateTime, Duration};
use crate::core::unit::{Cost, Kilograms, KilogramsPerHour, PricePerKg};

/// Long-running total fed from a source counter that may reset. Growth of the source
/// is added, a drop only moves the baseline. The baseline is never persisted, after a
/// restart it is taken from the first live reading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Accumulator {
    total: f64,
    #[serde(default)]
    today: DailyAmount,
    #[serde(skip)]
    last_source: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DailyAmount {
    date: Option<NaiveDate>,
    amount: f64,
}

impl DailyAmount {
    fn add(&mut self, amount: f64, now: DateTime) {
        let today = now.date();
        if self.date != Some(today) {
            self.date = Some(today);
            self.amount = 0.0;
        }
        self.amount += amount;
    }

    fn get(&self, now: DateTime) -> f64 {
        match self.date {
            Some(date) if date == now.date() => self.amount,
            _ => 0.0,
        }
    }
}

impl Accumulator {
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn today(&self, now: DateTime) -> f64 {
        self.today.get(now)
    }

    pub fn observe(&mut self, source: f64, weight: f64, now: DateTime) -> f64 {
        let Some(last) = self.last_source else {
            self.last_source = Some(source);
            return 0.0;
        };

        if source < last {
            tracing::debug!("Source counter dropped from {:.3} to {:.3}, re-baselining", last, source);
            self.last_source = Some(source);
            return 0.0;
        }

        self.last_source = Some(source);
        self.add((source - last) * weight, now)
    }

    pub fn add(&mut self, amount: f64, now: DateTime) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }

        self.total += amount;
        self.today.add(amount, now);
        amount
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConsumptionSplit {
    pub house: Kilograms,
    pub office: Kilograms,
}

#[derive(Debug, Clone, Copy)]
pub struct SplitConditions {
    pub hot_water_active: bool,
    pub house_pump_on: bool,
    pub office_active: bool,
    pub house_expected: KilogramsPerHour,
}

#[derive(Debug, Clone, Default)]
pub struct ConsumptionSplitter {
    last: Option<(DateTime, Kilograms)>,
}

impl ConsumptionSplitter {
    pub fn split(
        &mut self,
        now: DateTime,
        daily_counter: Kilograms,
        conditions: SplitConditions,
        max_gap: Duration,
        tolerance: f64,
    ) -> ConsumptionSplit {
        let (since, last) = match self.last {
            Some((since, last)) if daily_counter >= last => (since, last),
            _ => {
                self.last = Some((now, daily_counter));
                return ConsumptionSplit::default();
            }
        };

        let delta = daily_counter - last;
        if delta.0 <= 0.0 {
            self.last = Some((now, last));
            return ConsumptionSplit::default();
        }

        self.last = Some((now, daily_counter));

        let elapsed = now.elapsed_since(since).max(Duration::zero()).min(max_gap);
        let house_cap = Kilograms((conditions.house_expected * elapsed).0 * tolerance);

        match conditions {
            SplitConditions { hot_water_active: true, .. } => ConsumptionSplit::default(),
            SplitConditions { house_pump_on: false, .. } => ConsumptionSplit::default(),
            SplitConditions { office_active: true, .. } => {
                let house = if delta < house_cap { delta } else { house_cap };
                ConsumptionSplit {
                    house,
                    office: delta - house,
                }
            }
            _ => ConsumptionSplit {
                house: delta,
                office: Kilograms(0.0),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Accumulators {
    #[serde(default)]
    pub house_consumption: Accumulator,
    #[serde(default)]
    pub office_consumption: Accumulator,
    #[serde(default)]
    pub dhw_consumption: Accumulator,
    #[serde(default)]
    pub house_cost: Accumulator,
    #[serde(default)]
    pub office_cost: Accumulator,
    #[serde(default)]
    pub dhw_cost: Accumulator,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccumulatorTotals {
    pub house: Kilograms,
    pub office: Kilograms,
    pub dhw: Kilograms,
    pub house_cost: Cost,
    pub office_cost: Cost,
    pub dhw_cost: Cost,
}

impl Accumulators {
    pub fn record(
        &mut self,
        now: DateTime,
        split: ConsumptionSplit,
        dhw_daily_counter: Option<Kilograms>,
        price: PricePerKg,
    ) {
        self.house_consumption.add(split.house.0, now);
        self.office_consumption.add(split.office.0, now);

        if let Some(dhw) = dhw_daily_counter {
            self.dhw_consumption.observe(dhw.0, 1.0, now);
        }

        self.house_cost.observe(self.house_consumption.total(), price.0, now);
        self.office_cost.observe(self.office_consumption.total(), price.0, now);
        self.dhw_cost.observe(self.dhw_consumption.total(), price.0, now);
    }

    pub fn totals(&self) -> AccumulatorTotals {
        AccumulatorTotals {
            house: Kilograms(self.house_consumption.total()),
            office: Kilograms(self.office_consumption.total()),
            dhw: Kilograms(self.dhw_consumption.total()),
            house_cost: Cost(self.house_cost.total()),
            office_cost: Cost(self.office_cost.total()),
            dhw_cost: Cost(self.dhw_cost.total()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::t;

    fn at(iso: &str) -> DateTime {
        DateTime::from_iso(iso).unwrap()
    }

    fn conditions(house_pump_on: bool, office_active: bool) -> SplitConditions {
        SplitConditions {
            hot_water_active: false,
            house_pump_on,
            office_active,
            house_expected: KilogramsPerHour(1.0),
        }
    }

    #[test]
    fn test_total_never_decreases() {
        let now = at("2024-01-10T12:00:00Z");
        let readings = [0.0, 1.5, 3.25, 0.0, 0.75, 0.5, 2.0, 2.0, 10.0, 1.0, 1.5];
        let mut acc = Accumulator::default();
        let mut previous = 0.0;

        for reading in readings {
            acc.observe(reading, 1.0, now);
            assert!(acc.total() >= previous);
            previous = acc.total();
        }

        assert_eq!(acc.total(), 3.25 + 0.75 + 1.5 + 8.0 + 0.5);
    }

    #[test]
    fn test_rollback_keeps_total() {
        let now = at("2024-01-10T12:00:00Z");
        let mut acc = Accumulator::default();

        acc.observe(10.0, 1.0, now);
        acc.observe(14.0, 1.0, now);
        let before = acc.total();
        acc.observe(0.2, 1.0, now);

        assert_eq!(acc.total(), before);

        acc.observe(1.2, 1.0, now);
        assert_eq!(acc.total(), before + 1.0);
    }

    #[test]
    fn test_restored_total_rebaselines_on_first_reading() {
        let now = at("2024-01-10T12:00:00Z");
        let mut acc: Accumulator = serde_json::from_str(r#"{ "total": 120.5 }"#).unwrap();

        assert_eq!(acc.observe(37.0, 1.0, now), 0.0);
        assert_eq!(acc.total(), 120.5);

        acc.observe(38.0, 1.0, now);
        assert_eq!(acc.total(), 121.5);
    }

    #[test]
    fn test_cost_uses_weight() {
        let now = at("2024-01-10T12:00:00Z");
        let mut acc = Accumulator::default();

        acc.observe(2.0, 1.25, now);
        acc.observe(4.0, 1.25, now);

        assert_eq!(acc.total(), 2.5);
    }

    #[test]
    fn test_today_resets_at_new_day() {
        let day = at("2024-01-10T12:00:00+01:00");
        let mut acc = Accumulator::default();

        acc.add(2.0, day);
        assert_eq!(acc.today(day), 2.0);
        assert_eq!(acc.today(day + t!(24 hours)), 0.0);

        acc.add(1.0, day + t!(24 hours));
        assert_eq!(acc.today(day + t!(24 hours)), 1.0);
        assert_eq!(acc.total(), 3.0);
    }

    #[test]
    fn test_split_house_only() {
        let start = at("2024-01-10T12:00:00Z");
        let mut splitter = ConsumptionSplitter::default();

        splitter.split(start, Kilograms(5.0), conditions(true, false), t!(1 hours), 1.15);
        let split = splitter.split(start + t!(30 minutes), Kilograms(6.0), conditions(true, false), t!(1 hours), 1.15);

        assert_eq!(split.house, Kilograms(1.0));
        assert_eq!(split.office, Kilograms(0.0));
    }

    #[test]
    fn test_split_with_office_conserves_delta() {
        let start = at("2024-01-10T12:00:00Z");
        let mut splitter = ConsumptionSplitter::default();

        splitter.split(start, Kilograms(5.0), conditions(true, true), t!(1 hours), 1.15);
        let split = splitter.split(start + t!(30 minutes), Kilograms(6.0), conditions(true, true), t!(1 hours), 1.15);

        assert!((split.house.0 - 0.575).abs() < 1e-9);
        assert!((split.house.0 + split.office.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_split_clamps_elapsed_time() {
        let start = at("2024-01-10T12:00:00Z");
        let mut splitter = ConsumptionSplitter::default();

        splitter.split(start, Kilograms(5.0), conditions(true, true), t!(1 hours), 1.15);
        let split = splitter.split(start + t!(5 hours), Kilograms(9.0), conditions(true, true), t!(1 hours), 1.15);

        assert!((split.house.0 - 1.15).abs() < 1e-9);
        assert!((split.office.0 - 2.85).abs() < 1e-9);
    }

    #[test]
    fn test_split_skips_hot_water_and_idle_house() {
        let start = at("2024-01-10T12:00:00Z");
        let mut splitter = ConsumptionSplitter::default();
        let hot_water = SplitConditions {
            hot_water_active: true,
            ..conditions(true, true)
        };

        splitter.split(start, Kilograms(5.0), hot_water, t!(1 hours), 1.15);
        let during_dhw = splitter.split(start + t!(10 minutes), Kilograms(10.0), hot_water, t!(1 hours), 1.15);
        let house_idle =
            splitter.split(start + t!(20 minutes), Kilograms(11.0), conditions(false, false), t!(1 hours), 1.15);

        assert_eq!(during_dhw, ConsumptionSplit::default());
        assert_eq!(house_idle, ConsumptionSplit::default());
    }

    #[test]
    fn test_split_midnight_reset_rebaselines() {
        let start = at("2024-01-10T23:55:00Z");
        let mut splitter = ConsumptionSplitter::default();

        splitter.split(start, Kilograms(25.0), conditions(true, false), t!(1 hours), 1.15);
        let reset = splitter.split(start + t!(10 minutes), Kilograms(0.1), conditions(true, false), t!(1 hours), 1.15);
        let after = splitter.split(start + t!(20 minutes), Kilograms(0.6), conditions(true, false), t!(1 hours), 1.15);

        assert_eq!(reset, ConsumptionSplit::default());
        assert!((after.house.0 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_cost_follows_consumption() {
        let now = at("2024-01-10T12:00:00Z");
        let mut accumulators = Accumulators::default();
        let price = PricePerKg(1.25);

        accumulators.record(now, ConsumptionSplit::default(), Some(Kilograms(0.0)), price);
        accumulators.record(
            now,
            ConsumptionSplit {
                house: Kilograms(2.0),
                office: Kilograms(1.0),
            },
            Some(Kilograms(0.5)),
            price,
        );

        let totals = accumulators.totals();
        assert_eq!(totals.house, Kilograms(2.0));
        assert_eq!(totals.dhw, Kilograms(0.5));
        assert_eq!(totals.house_cost, Cost(2.5));
        assert_eq!(totals.office_cost, Cost(1.25));
        assert_eq!(totals.dhw_cost, Cost(0.625));
    }
}
