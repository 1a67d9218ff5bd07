use std::time::Duration;

use reqwest::Client;
use tracing::{error, info, warn};

use crate::{
    GrantKind, InboundGrantRequest, OutboundTokenRequest, ProviderResponse, RelayConfig,
    RelayError,
};

/// Forwards client grants to the provider with the server-held credentials
/// attached.
#[derive(Debug, Clone)]
pub struct TokenRelay {
    config: RelayConfig,
    http: Client,
}

impl TokenRelay {
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let http = Client::builder().build()?;
        Ok(Self { config, http })
    }

    pub fn with_http_client(config: RelayConfig, http: Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Runs one grant exchange and hands back the provider's answer as-is.
    ///
    /// A body that cannot be decoded is logged and treated as empty, so the
    /// provider still sees the request (with an empty grant field) and
    /// produces the rejection.
    pub async fn exchange(
        &self,
        kind: GrantKind,
        inbound_body: &[u8],
    ) -> Result<ProviderResponse, RelayError> {
        let inbound = match InboundGrantRequest::decode(inbound_body) {
            Ok(inbound) => inbound,
            Err(err) => {
                warn!(grant_type = %kind, error = %err, "input decoding error");
                InboundGrantRequest::default()
            }
        };

        info!(grant_type = %kind, body = %inbound.redacted(), "token grant request");

        let outbound = OutboundTokenRequest::new(kind, &self.config, &inbound);
        self.forward(kind, &outbound).await
    }

    async fn forward(
        &self,
        kind: GrantKind,
        outbound: &OutboundTokenRequest,
    ) -> Result<ProviderResponse, RelayError> {
        let timeout = self.config.timeout;
        let response = self
            .http
            .post(&self.config.token_url)
            .timeout(timeout)
            .form(outbound.pairs())
            .send()
            .await
            .map_err(|err| provider_error(err, timeout))?;

        let status = response.status();
        info!(grant_type = %kind, status = %status, "provider token response");

        let body = response
            .bytes()
            .await
            .map_err(|err| provider_error(err, timeout))?;

        Ok(ProviderResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn provider_error(err: reqwest::Error, timeout: Duration) -> RelayError {
    error!(error = %err, "provider api error");
    if err.is_timeout() {
        RelayError::Timeout { timeout }
    } else {
        RelayError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_keeps_its_config() {
        let config = RelayConfig::new("client-id", "client-secret", "myapp://cb")
            .with_timeout(Duration::from_secs(3))
            .unwrap();
        let relay = TokenRelay::new(config).unwrap();
        assert_eq!(relay.config().client_id, "client-id");
        assert_eq!(relay.config().timeout, Duration::from_secs(3));
    }
}
