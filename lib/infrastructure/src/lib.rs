mod http;
mod monitoring;

pub use monitoring::MonitoringConfig;

pub use http::client::HttpClientConfig;
pub use http::server::HttpServerConfig;

pub mod meter {
    pub use super::monitoring::meter::set;
}
