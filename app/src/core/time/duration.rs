#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Duration {
    #[serde(with = "duration_format")]
    pub(super) delegate: chrono::Duration,
}

impl Duration {
    pub(super) fn new(delegate: chrono::Duration) -> Self {
        Self { delegate }
    }

    pub fn zero() -> Self {
        Self::new(chrono::Duration::zero())
    }

    pub fn hours(hours: i64) -> Self {
        Self::new(chrono::Duration::hours(hours))
    }

    pub fn minutes(minutes: i64) -> Self {
        Self::new(chrono::Duration::minutes(minutes))
    }

    pub fn seconds(seconds: i64) -> Self {
        Self::new(chrono::Duration::seconds(seconds))
    }

    pub fn minutes_f64(minutes: f64) -> Self {
        Self::new(chrono::Duration::milliseconds((minutes * 60_000.0) as i64))
    }

    pub fn days_f64(days: f64) -> Self {
        Self::new(chrono::Duration::milliseconds((days * 86_400_000.0) as i64))
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.delegate.num_milliseconds() as f64 / 1000.0
    }

    pub fn as_minutes_f64(&self) -> f64 {
        self.as_secs_f64() / 60.0
    }

    pub fn as_hours_f64(&self) -> f64 {
        self.as_secs_f64() / 3600.0
    }
}

impl std::ops::Add<Duration> for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            delegate: self.delegate + rhs.delegate,
        }
    }
}

impl From<Duration> for std::time::Duration {
    fn from(val: Duration) -> Self {
        let millis = val.delegate.num_milliseconds().max(0);
        std::time::Duration::from_millis(millis as u64)
    }
}

mod duration_format {
    use iso8601_duration::Duration as Iso8601Duration;
    use serde::{Deserializer, Serializer, de::Visitor};

    pub fn serialize<S>(duration: &chrono::TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let iso_duration = super::from_chrono_duration(duration);
        serializer.serialize_str(&iso_duration.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<chrono::Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DurationVisitor;

        impl Visitor<'_> for DurationVisitor {
            type Value = chrono::TimeDelta;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a string representing an ISO 8601 duration (e.g., PT1M)")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let iso_duration = Iso8601Duration::parse(value)
                    .map_err(|e| E::custom(format!("Error parsing {} to duration: {:?}", value, e)))?;

                iso_duration.to_chrono().ok_or_else(|| {
                    E::custom(format!(
                        "Duration too long. Must not contain years and/or months. Received {}",
                        value
                    ))
                })
            }
        }

        deserializer.deserialize_str(DurationVisitor)
    }
}

fn from_chrono_duration(duration: &chrono::Duration) -> iso8601_duration::Duration {
    let days = duration.num_days();
    let seconds = duration.num_seconds() - days * 86400;
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    iso8601_duration::Duration::new(0.0, 0.0, days as f32, hours as f32, minutes as f32, seconds as f32)
}
