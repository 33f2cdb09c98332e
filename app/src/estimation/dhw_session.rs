use crate::core::time::{DateTime, Duration};
use crate::core::unit::Kilograms;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhwSession {
    pub duration: Duration,
    pub consumed: Kilograms,
}

impl DhwSession {
    pub fn duration_minutes(&self) -> f64 {
        (self.duration.as_minutes_f64() * 10.0).round() / 10.0
    }

    pub fn consumed_rounded(&self) -> Kilograms {
        Kilograms((self.consumed.0 * 100.0).round() / 100.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DhwSessionTracker {
    running: Option<(DateTime, Option<Kilograms>)>,
    last: Option<DhwSession>,
}

impl DhwSessionTracker {
    pub fn update(&mut self, output_on: bool, counter: Option<Kilograms>, now: DateTime) -> Option<DhwSession> {
        match (output_on, self.running) {
            (true, None) => {
                tracing::debug!("DHW heating session started");
                self.running = Some((now, counter));
                None
            }
            (false, Some((started_at, start_counter))) => {
                let consumed = match (start_counter, counter) {
                    (Some(start), Some(end)) => Kilograms((end - start).0.max(0.0)),
                    _ => Kilograms(0.0),
                };
                let session = DhwSession {
                    duration: now.elapsed_since(started_at).max(Duration::zero()),
                    consumed,
                };

                tracing::debug!(
                    "DHW heating session finished after {} min using {}",
                    session.duration_minutes(),
                    session.consumed_rounded()
                );

                self.running = None;
                self.last = Some(session);
                Some(session)
            }
            _ => None,
        }
    }

    pub fn is_heating(&self) -> bool {
        self.running.is_some()
    }

    pub fn current_duration(&self, now: DateTime) -> Duration {
        match (self.running, self.last) {
            (Some((started_at, _)), _) => now.elapsed_since(started_at).max(Duration::zero()),
            (None, Some(last)) => last.duration,
            (None, None) => Duration::zero(),
        }
    }

    pub fn last_session(&self) -> Option<DhwSession> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::t;

    #[test]
    fn test_session_measured_between_edges() {
        let start = DateTime::from_iso("2024-01-10T06:00:00Z").unwrap();
        let mut tracker = DhwSessionTracker::default();

        assert_eq!(tracker.update(true, Some(Kilograms(100.0)), start), None);
        assert!(tracker.is_heating());
        assert_eq!(tracker.update(true, Some(Kilograms(100.3)), start + t!(10 minutes)), None);
        assert_eq!(tracker.current_duration(start + t!(15 minutes)), t!(15 minutes));

        let session = tracker
            .update(false, Some(Kilograms(100.456)), start + t!(25 minutes))
            .unwrap();

        assert_eq!(session.duration_minutes(), 25.0);
        assert_eq!(session.consumed_rounded(), Kilograms(0.46));
        assert!(!tracker.is_heating());
        assert_eq!(tracker.current_duration(start + t!(2 hours)), t!(25 minutes));
    }

    #[test]
    fn test_counter_reset_during_session_counts_nothing() {
        let start = DateTime::from_iso("2024-01-10T06:00:00Z").unwrap();
        let mut tracker = DhwSessionTracker::default();

        tracker.update(true, Some(Kilograms(100.0)), start);
        let session = tracker.update(false, Some(Kilograms(0.5)), start + t!(5 minutes)).unwrap();

        assert_eq!(session.consumed, Kilograms(0.0));
    }
}
