use anyhow::Context;
use infrastructure::HttpClientConfig;
use reqwest_middleware::ClientWithMiddleware;

use super::HaState;

#[derive(Debug, Clone)]
pub struct HaHttpClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl HaHttpClient {
    pub fn new(url: &str, token: &str, timeout_secs: Option<u64>) -> anyhow::Result<Self> {
        let client = HttpClientConfig::new(Some(token.to_owned()), timeout_secs).new_tracing_client()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_owned(),
        })
    }
}

impl HaHttpClient {
    #[tracing::instrument(skip(self))]
    pub async fn get_current_state(&self) -> anyhow::Result<Vec<HaState>> {
        let response = self
            .client
            .get(format!("{}/api/states", self.base_url))
            .send()
            .await?
            .error_for_status()?;

        response
            .json::<Vec<HaState>>()
            .await
            .context("Error getting all states")
    }

    #[tracing::instrument(skip(self, attributes))]
    pub async fn set_state(&self, entity_id: &str, state: &str, attributes: serde_json::Value) -> anyhow::Result<()> {
        let url = format!("{}/api/states/{}", self.base_url, entity_id);
        let body = serde_json::json!({
            "state": state,
            "attributes": attributes,
        });

        let response = self.client.post(url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!(
                "Error setting state of {}: {} - {}",
                entity_id,
                status,
                response.text().await.unwrap_or_default()
            );
        }

        Ok(())
    }
}
