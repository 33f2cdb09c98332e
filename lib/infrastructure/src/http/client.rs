use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::{self, HeaderMap};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct HttpClientConfig {
    bearer_token: Option<String>,
    timeout_secs: Option<u64>,
}

impl HttpClientConfig {
    pub fn new(bearer_token: Option<String>, timeout_secs: Option<u64>) -> Self {
        Self {
            bearer_token,
            timeout_secs,
        }
    }

    pub fn new_tracing_client(&self) -> anyhow::Result<ClientWithMiddleware> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &self.bearer_token {
            let mut auth_value = header::HeaderValue::from_str(format!("Bearer {}", token).as_str())
                .context("Bearer token contains invalid header characters")?;
            auth_value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth_value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build()?;

        Ok(reqwest_middleware::ClientBuilder::new(client)
            .with(TracingMiddleware::default())
            .build())
    }
}
