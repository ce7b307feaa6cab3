use crate::traits::Notifier;
use crate::types::{Message, Result, WatchError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://mandrillapp.com/api/1.0/messages/send.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers composed messages through the Mandrill send API.
pub struct MandrillNotifier {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl MandrillNotifier {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Overrides the API endpoint, for tests.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Notifier for MandrillNotifier {
    async fn send(&self, message: &Message) -> Result<()> {
        let payload = json!({
            "key": self.api_key,
            "message": {
                "from_email": message.from,
                "to": [{ "email": message.to, "type": "to" }],
                "autotext": "true",
                "subject": message.subject,
                "html": message.body,
            }
        });

        debug!("POST {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            // Keep the response body: it names bad keys and rejected
            // recipients, which is what operators need to see.
            let body = response.text().await.unwrap_or_default();
            return Err(WatchError::SendRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
