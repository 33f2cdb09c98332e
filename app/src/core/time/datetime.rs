use std::{
    fmt::Display,
    ops::{Add, Sub},
};

use super::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DateTime {
    delegate: chrono::DateTime<chrono::Local>,
}

impl DateTime {
    fn new<T: chrono::TimeZone>(delegate: chrono::DateTime<T>) -> Self {
        Self {
            delegate: delegate.with_timezone(&chrono::Local),
        }
    }

    pub fn now() -> Self {
        chrono::Local::now().into()
    }

    pub fn from_iso(iso8601: &str) -> anyhow::Result<Self> {
        Ok(chrono::DateTime::parse_from_rfc3339(iso8601)?.into())
    }

    pub fn to_iso_string(&self) -> String {
        self.delegate.to_rfc3339()
    }

    pub fn to_human_readable(&self) -> String {
        chrono_humanize::HumanTime::from(self.delegate).to_string()
    }

    pub fn date(&self) -> chrono::NaiveDate {
        self.delegate.date_naive()
    }

    /// Time left until the next local midnight. Falls back to zero if the next day
    /// cannot be represented.
    pub fn until_end_of_day(&self) -> Duration {
        let next_midnight = self
            .delegate
            .date_naive()
            .succ_opt()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|d| d.and_local_timezone(chrono::Local).earliest());

        match next_midnight {
            Some(midnight) => Duration::new(midnight - self.delegate),
            None => Duration::zero(),
        }
    }

    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        self.delegate.checked_add_signed(duration.delegate).map(Self::new)
    }

    pub fn elapsed_since(&self, since: Self) -> Duration {
        Duration::new(self.delegate - since.delegate)
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.delegate.format("%Y-%m-%d %H:%M:%S"))
    }
}

impl Add<Duration> for DateTime {
    type Output = DateTime;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::new(self.delegate + rhs.delegate)
    }
}

impl Sub<Duration> for DateTime {
    type Output = DateTime;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self::new(self.delegate - rhs.delegate)
    }
}

impl<T: chrono::TimeZone> From<chrono::DateTime<T>> for DateTime {
    fn from(val: chrono::DateTime<T>) -> Self {
        DateTime::new(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::t;

    #[test]
    fn test_elapsed_since() {
        let start = DateTime::from_iso("2024-11-03T15:23:46Z").unwrap();
        let end = DateTime::from_iso("2024-11-03T17:23:46Z").unwrap();

        assert_eq!(end.elapsed_since(start), t!(2 hours));
        assert_eq!(start + t!(2 hours), end);
    }

    #[test]
    fn test_checked_add_out_of_range() {
        let now = DateTime::from_iso("2024-11-03T15:23:46Z").unwrap();

        assert_eq!(now.checked_add(t!(2 hours)), Some(now + t!(2 hours)));
        assert_eq!(now.checked_add(Duration::days_f64(1.0e12)), None);
    }

    #[test]
    fn test_until_end_of_day_is_within_a_day() {
        let now = DateTime::from_iso("2024-11-03T15:23:46Z").unwrap();
        let left = now.until_end_of_day();

        assert!(left > Duration::zero());
        assert!(left <= t!(25 hours));
        assert_ne!((now + left).date(), now.date());
    }
}
