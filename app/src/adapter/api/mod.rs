use actix_web::{
    HttpResponse, ResponseError,
    web::{self},
};
use derive_more::derive::{Display, Error};
use tokio::sync::watch;

use crate::core::time::DateTime;
use crate::estimation::Projection;

pub fn new_routes(projection: watch::Receiver<Option<Projection>>) -> actix_web::Scope {
    web::scope("/api")
        .route("/estimates", web::get().to(get_estimates))
        .app_data(web::Data::new(projection))
}

#[derive(Debug, Error, Display)]
enum EstimatesApiError {
    #[display("No telemetry processed yet")]
    NotReady,
}

impl ResponseError for EstimatesApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        tracing::warn!("EstimatesApiError: {:?}", self);

        match self {
            EstimatesApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

async fn get_estimates(
    projection: web::Data<watch::Receiver<Option<Projection>>>,
) -> Result<HttpResponse, EstimatesApiError> {
    let report = match projection.borrow().as_ref() {
        Some(projection) => projection.project(DateTime::now()),
        None => return Err(EstimatesApiError::NotReady),
    };

    Ok(HttpResponse::Ok().json(report.estimates()))
}
