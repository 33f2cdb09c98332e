#![allow(async_fn_in_trait)]

use anyhow::Result;

use crate::core::time::DateTime;
use crate::estimation::{Estimate, PersistedState, TelemetrySnapshot};

pub trait TelemetrySource {
    /// Fresh telemetry for the current tick. A failure must not be answered with
    /// stale data.
    async fn fetch(&self, now: DateTime) -> Result<TelemetrySnapshot>;
}

pub trait EstimatePublisher {
    async fn publish(&self, estimates: &[Estimate]) -> Result<()>;
}

pub trait StateRepository {
    async fn load(&self) -> Result<Option<PersistedState>>;

    async fn save(&self, state: &PersistedState) -> Result<()>;
}
