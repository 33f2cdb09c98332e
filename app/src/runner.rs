use tokio::sync::watch;

use crate::core::time::DateTime;
use crate::estimation::{Estimate, Estimator, Projection, StateDelta};
use crate::port::{EstimatePublisher, StateRepository, TelemetrySource};

pub struct EstimationRunner<S, P, R>
where
    S: TelemetrySource,
    P: EstimatePublisher,
    R: StateRepository,
{
    estimator: Estimator,
    source: S,
    publisher: P,
    repository: R,
    projection_tx: watch::Sender<Option<Projection>>,
}

impl<S, P, R> EstimationRunner<S, P, R>
where
    S: TelemetrySource,
    P: EstimatePublisher,
    R: StateRepository,
{
    pub fn new(estimator: Estimator, source: S, publisher: P, repository: R) -> Self {
        let (projection_tx, _) = watch::channel(None);

        Self {
            estimator,
            source,
            publisher,
            repository,
            projection_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Projection>> {
        self.projection_tx.subscribe()
    }

    pub async fn run(mut self) {
        let mut timer = tokio::time::interval(self.estimator.config().poll_interval.into());
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            timer.tick().await;
            self.tick(DateTime::now()).await;
        }
    }

    #[tracing::instrument(skip(self))]
    async fn tick(&mut self, now: DateTime) {
        let snapshot = match self.source.fetch(now).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("Error fetching telemetry, skipping cycle: {:?}", e);
                return;
            }
        };

        let delta = self.estimator.advance(&snapshot);
        log_delta(&delta);

        if let Err(e) = self.repository.save(&self.estimator.persisted_state()).await {
            tracing::error!("Error persisting estimator state: {:?}", e);
        }

        let projection = self.estimator.projection(&snapshot);
        let estimates = projection.project(now).estimates();

        record_metrics(&estimates);

        if let Err(e) = self.publisher.publish(&estimates).await {
            tracing::error!("Error publishing estimates: {:?}", e);
        }

        self.projection_tx.send_replace(Some(projection));
    }
}

fn log_delta(delta: &StateDelta) {
    if let Some(session) = &delta.finished_dhw_session {
        tracing::info!(
            "DHW session finished after {:.0} min, consumed {:.2} kg",
            session.duration_minutes(),
            session.consumed_rounded()
        );
    }

    let split = &delta.consumption;
    if split.house.0 > 0.0 || split.office.0 > 0.0 {
        tracing::debug!("Consumption attributed: house {}, office {}", split.house, split.office);
    }
}

fn record_metrics(estimates: &[Estimate]) {
    for estimate in estimates {
        if let Some(value) = estimate.value.as_f64() {
            infrastructure::meter::set("pellet_estimate", value, &[("estimate", &estimate.id.name())]);
        }
    }
}
