// SMS gateway transport - outbound HTTP webhook

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pester_core::port::{DeliveryError, MessageTransport};

/// Gateway transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookTransportConfig {
    /// URL the gateway accepts outbound messages on.
    pub gateway_url: String,
    /// Optional sender id forwarded to the gateway.
    #[serde(default)]
    pub sender: Option<String>,
}

/// MessageTransport that POSTs each message to an SMS gateway.
///
/// No per-call timeout: delivery is fire-and-forget per firing, and the next
/// interval is the retry.
pub struct WebhookTransport {
    config: WebhookTransportConfig,
    client: reqwest::Client,
}

impl WebhookTransport {
    pub fn new(config: WebhookTransportConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MessageTransport for WebhookTransport {
    async fn send_text(&self, phone_number: &str, message: &str) -> Result<(), DeliveryError> {
        let body = serde_json::json!({
            "to": phone_number,
            "body": message,
            "sender": self.config.sender,
        });

        let response = self
            .client
            .post(&self.config.gateway_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::TransportFailure(format!("gateway request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(DeliveryError::TransportFailure(format!(
                "gateway returned {}",
                response.status()
            )));
        }

        debug!(to = %phone_number, "gateway accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_gateway_maps_to_transport_failure() {
        // Port 1 is never listening; the connect fails fast.
        let transport = WebhookTransport::new(WebhookTransportConfig {
            gateway_url: "http://127.0.0.1:1/send".to_string(),
            sender: None,
        });

        let err = transport.send_text("5551234", "Hi").await.unwrap_err();
        assert!(matches!(err, DeliveryError::TransportFailure(_)));
    }
}
