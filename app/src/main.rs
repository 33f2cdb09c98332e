use settings::Settings;

use crate::estimation::Estimator;
use crate::port::StateRepository as _;
use crate::runner::EstimationRunner;

mod adapter;
mod core;
mod estimation;
pub mod port;
mod runner;
mod settings;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    settings.monitoring.init().expect("Error initializing monitoring");

    let source = settings
        .homeassistant
        .new_telemetry_source()
        .expect("Error initializing telemetry source");
    let publisher = settings
        .homeassistant
        .new_estimate_publisher()
        .expect("Error initializing estimate publisher");
    let repository = settings.state_file.new_repository();

    let state = match repository.load().await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Error loading persisted state, starting fresh: {:?}", e);
            None
        }
    };

    let estimator = Estimator::restore(settings.estimator.clone(), state);
    let runner = EstimationRunner::new(estimator, source, publisher, repository);

    let http_server_exec = {
        let projection = runner.subscribe();

        async move {
            settings
                .http_server
                .run_server(move || vec![adapter::api::new_routes(projection.clone())])
                .await
                .expect("HTTP server execution failed");
        }
    };

    tracing::info!("Starting main loop");

    tokio::select!(
        _ = runner.run() => {},
        _ = http_server_exec => {},
    );
}
