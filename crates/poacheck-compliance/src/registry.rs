// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// State notary registry client.
//
// The registry answers `GET {url}/verify?commission=<number>&name=<name>`
// with a JSON body `{"valid": true|false}`.

use std::time::Duration;

use async_trait::async_trait;
use poacheck_core::config::RegistryConfig;
use poacheck_core::error::PoaError;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Confirms a notary commission against an authoritative source.
#[async_trait]
pub trait NotaryRegistry: Send + Sync {
    /// `Ok(true)` if the commission is valid for that notary.
    async fn verify(&self, commission_number: &str, notary_name: &str) -> Result<bool, PoaError>;
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    valid: bool,
}

/// HTTP registry client with bearer-token auth.
pub struct HttpNotaryRegistry {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpNotaryRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self, PoaError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("poacheck/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PoaError::ExternalLookup(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn verify_url(&self) -> String {
        format!("{}/verify", self.base_url)
    }
}

#[async_trait]
impl NotaryRegistry for HttpNotaryRegistry {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn verify(&self, commission_number: &str, notary_name: &str) -> Result<bool, PoaError> {
        let mut request = self
            .client
            .get(self.verify_url())
            .query(&[("commission", commission_number), ("name", notary_name)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PoaError::ExternalLookup(format!("registry request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PoaError::ExternalLookup(format!(
                "registry returned HTTP {}",
                status
            )));
        }

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| PoaError::ExternalLookup(format!("unreadable registry response: {}", e)))?;

        debug!(valid = body.valid, "Registry answered");
        Ok(body.valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> RegistryConfig {
        RegistryConfig {
            url: url.into(),
            token: Some("secret".into()),
            timeout_secs: 1,
        }
    }

    #[test]
    fn verify_url_strips_trailing_slash() {
        let registry = HttpNotaryRegistry::new(&config("https://registry.example.gov/api/")).unwrap();
        assert_eq!(registry.verify_url(), "https://registry.example.gov/api/verify");
    }

    #[tokio::test]
    async fn unreachable_registry_is_external_lookup_error() {
        let registry = HttpNotaryRegistry::new(&config("http://127.0.0.1:9")).unwrap();
        let err = registry.verify("2345678", "Maria Lopez").await.unwrap_err();
        assert!(matches!(err, PoaError::ExternalLookup(_)));
    }
}
