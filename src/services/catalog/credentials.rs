//! Bearer credentials for the catalog backend.
//!
//! The dialogue engine asks a [`CredentialProvider`] for a credential right
//! before each catalog call; how the token is obtained and kept fresh is the
//! provider's business.

use crate::cache::Cache;
use crate::error::{Error, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Cache key for the client-credentials access token.
const ACCESS_TOKEN_CACHE_KEY: &str = "catalog_access_token";

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Tokens are dropped from the cache this long before the backend expires them.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// A bearer token for the catalog backend.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl From<SecretString> for Credential {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

/// Supplies a valid credential for the next catalog call.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn credential(&self) -> Result<Credential>;
}

/// A fixed token taken from configuration.
#[derive(Debug, Clone)]
pub struct StaticCredential(Credential);

impl StaticCredential {
    pub fn new(credential: Credential) -> Self {
        Self(credential)
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn credential(&self) -> Result<Credential> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// OAuth2 client-credentials grant against the catalog backend.
///
/// The token is kept in the TTL cache until shortly before it expires, so
/// at most one token request is made per token lifetime under normal load.
pub struct ClientCredentialsProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    cache: Cache<String>,
}

impl fmt::Debug for ClientCredentialsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentialsProvider")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl ClientCredentialsProvider {
    /// Creates a provider for `{base_url}/oauth/access_token`.
    pub fn new(
        base_url: &str,
        client_id: impl Into<String>,
        client_secret: SecretString,
        timeout: Duration,
        cache: Cache<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            token_url: format!("{}/oauth/access_token", base_url.trim_end_matches('/')),
            client_id: client_id.into(),
            client_secret,
            cache,
        })
    }

    async fn request_token(&self) -> Result<AccessTokenResponse> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", self.client_secret.expose_secret())
            .append_pair("grant_type", "client_credentials")
            .finish();

        let response = self
            .http
            .post(&self.token_url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::BackendError(format!(
                "token request failed with status {}",
                status
            )));
        }

        response.json::<AccessTokenResponse>().await.map_err(|e| {
            Error::BackendError(format!("Failed to parse access token response: {}", e))
        })
    }
}

#[async_trait]
impl CredentialProvider for ClientCredentialsProvider {
    async fn credential(&self) -> Result<Credential> {
        if let Some(token) = self.cache.get(ACCESS_TOKEN_CACHE_KEY).await? {
            return Ok(Credential::new(token));
        }

        let token = self.request_token().await?;
        let ttl = token
            .expires_in
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS)
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS)
            .max(1);

        self.cache
            .set_ex(ACCESS_TOKEN_CACHE_KEY, token.access_token.clone(), ttl)
            .await?;

        tracing::info!(ttl_seconds = ttl, "Obtained catalog access token");
        Ok(Credential::new(token.access_token))
    }
}
