//! Client for the external OpenID-Connect identity provider.
//!
//! The provider contract this system depends on: a discovery document
//! describing the authorization, token, and userinfo endpoints; a code
//! exchange at the token endpoint; and verified identity claims from the
//! userinfo endpoint. Nothing beyond that is assumed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use url::Url;

use crate::config::OidcConfig;
use crate::constants::oidc::{DISCOVERY_TTL_SECONDS, SCOPES};

/// Subset of the provider discovery document we rely on.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryDocument {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
}

/// Token endpoint response for the authorization-code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Verified identity claims as returned by the userinfo endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Per-hostname provider binding. Callback URLs differ per host, so each
/// hostname gets its own lazily built entry in the registry.
#[derive(Debug, Clone)]
pub struct ProviderBinding {
    pub callback_url: String,
}

struct CachedDiscovery {
    doc: DiscoveryDocument,
    fetched_at: Instant,
}

pub struct OidcClient {
    http: reqwest::Client,
    config: OidcConfig,
    discovery: RwLock<Option<CachedDiscovery>>,
    bindings: RwLock<HashMap<String, Arc<ProviderBinding>>>,
}

impl OidcClient {
    #[must_use]
    pub fn new(config: OidcConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            config,
            discovery: RwLock::new(None),
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch the discovery document, or serve the cached copy while it is
    /// still within its TTL.
    pub async fn discovery(&self) -> Result<DiscoveryDocument> {
        let ttl = Duration::from_secs(DISCOVERY_TTL_SECONDS);

        {
            let cached = self.discovery.read().await;
            if let Some(cached) = cached.as_ref()
                && cached.fetched_at.elapsed() < ttl
            {
                return Ok(cached.doc.clone());
            }
        }

        let url = format!(
            "{}/.well-known/openid-configuration",
            self.config.issuer_url.trim_end_matches('/')
        );

        let doc: DiscoveryDocument = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to fetch OIDC discovery document")?
            .error_for_status()
            .context("OIDC discovery endpoint returned an error")?
            .json()
            .await
            .context("Failed to parse OIDC discovery document")?;

        let mut cached = self.discovery.write().await;
        *cached = Some(CachedDiscovery {
            doc: doc.clone(),
            fetched_at: Instant::now(),
        });

        Ok(doc)
    }

    /// Get or lazily create the provider binding for a request hostname.
    pub async fn binding_for_host(&self, hostname: &str) -> Arc<ProviderBinding> {
        {
            let bindings = self.bindings.read().await;
            if let Some(binding) = bindings.get(hostname) {
                return binding.clone();
            }
        }

        let binding = Arc::new(ProviderBinding {
            callback_url: format!("https://{hostname}/api/callback"),
        });

        let mut bindings = self.bindings.write().await;
        bindings
            .entry(hostname.to_string())
            .or_insert(binding)
            .clone()
    }

    /// Build the authorization redirect URL for a login attempt.
    pub async fn authorization_url(
        &self,
        hostname: &str,
        state: &str,
        nonce: &str,
    ) -> Result<Url> {
        let doc = self.discovery().await?;
        let binding = self.binding_for_host(hostname).await;

        let mut url = Url::parse(&doc.authorization_endpoint)
            .context("Provider authorization endpoint is not a valid URL")?;

        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &binding.callback_url)
            .append_pair("scope", SCOPES)
            .append_pair("state", state)
            .append_pair("nonce", nonce)
            .append_pair("prompt", "login consent");

        Ok(url)
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, hostname: &str, code: &str) -> Result<TokenResponse> {
        let doc = self.discovery().await?;
        let binding = self.binding_for_host(hostname).await;

        let mut form = vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code.to_string()),
            ("redirect_uri", binding.callback_url.clone()),
            ("client_id", self.config.client_id.clone()),
        ];
        if let Some(secret) = &self.config.client_secret {
            form.push(("client_secret", secret.clone()));
        }

        let tokens: TokenResponse = self
            .http
            .post(&doc.token_endpoint)
            .form(&form)
            .send()
            .await
            .context("Failed to reach OIDC token endpoint")?
            .error_for_status()
            .context("OIDC token exchange failed")?
            .json()
            .await
            .context("Failed to parse OIDC token response")?;

        Ok(tokens)
    }

    /// Fetch verified claims for an access token from the userinfo endpoint.
    pub async fn fetch_claims(&self, access_token: &str) -> Result<IdentityClaims> {
        let doc = self.discovery().await?;

        let claims: IdentityClaims = self
            .http
            .get(&doc.userinfo_endpoint)
            .bearer_auth(access_token)
            .send()
            .await
            .context("Failed to reach OIDC userinfo endpoint")?
            .error_for_status()
            .context("OIDC userinfo request failed")?
            .json()
            .await
            .context("Failed to parse OIDC userinfo response")?;

        Ok(claims)
    }
}
