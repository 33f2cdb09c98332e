use crate::core::time::{DateTime, Duration};
use crate::core::unit::{Kilograms, KilogramsPerHour};

/// Turns the monotonic burn counter into a burn rate over windows of a minimum length.
#[derive(Debug, Clone, Default)]
pub struct DeltaWindow {
    baseline: Option<(DateTime, Kilograms)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowOutcome {
    Baseline,
    Pending { elapsed: Duration },
    Closed {
        delta: Kilograms,
        elapsed: Duration,
        rate: KilogramsPerHour,
    },
}

impl DeltaWindow {
    pub fn sample(
        &mut self,
        now: DateTime,
        counter: Kilograms,
        min_window: Duration,
        noise_floor: Kilograms,
    ) -> WindowOutcome {
        let (since, last) = match self.baseline {
            Some((since, last)) if counter >= last => (since, last),
            Some((_, last)) => {
                tracing::debug!("Burn counter went back from {} to {}, re-baselining", last, counter);
                self.baseline = Some((now, counter));
                return WindowOutcome::Baseline;
            }
            None => {
                self.baseline = Some((now, counter));
                return WindowOutcome::Baseline;
            }
        };

        let elapsed = now.elapsed_since(since);
        if elapsed < min_window || elapsed <= Duration::zero() {
            return WindowOutcome::Pending { elapsed };
        }

        let delta = counter - last;
        let rate = if delta > noise_floor {
            KilogramsPerHour(delta.0 / elapsed.as_hours_f64())
        } else {
            KilogramsPerHour(0.0)
        };

        self.baseline = Some((now, counter));

        WindowOutcome::Closed { delta, elapsed, rate }
    }
}
