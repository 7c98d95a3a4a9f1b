//! Client-credentials authentication against the directory's token endpoint

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{ApiError, Result};

/// Default token endpoint host
pub const DEFAULT_LOGIN_HOST: &str = "https://login.microsoftonline.com";

/// Token response from the login endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// An acquired access token with its expiry
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Expired, or expiring within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Acquires an access token once per invocation and hands out the cached
/// value for every subsequent request. Nothing is persisted; a fresh
/// exchange happens on the next run.
pub struct TokenCache {
    http: reqwest::Client,
    login_host: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    scope: String,
    cached: RwLock<Option<CachedToken>>,
    grace_period: Duration,
}

impl TokenCache {
    pub fn new(
        http: reqwest::Client,
        login_host: String,
        tenant_id: String,
        client_id: String,
        client_secret: String,
        resource_host: &str,
    ) -> Self {
        Self {
            http,
            login_host,
            tenant_id,
            client_id,
            client_secret,
            scope: format!("{resource_host}/.default"),
            cached: RwLock::new(None),
            grace_period: Duration::minutes(5),
        }
    }

    /// Get a valid access token, exchanging credentials if none is cached.
    pub async fn get_token(&self) -> Result<String> {
        {
            let cache = self.cached.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.grace_period) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        debug!("Acquiring access token for tenant {}", self.tenant_id);
        let token = self.acquire_token().await?;

        let access_token = token.access_token.clone();
        let mut cache = self.cached.write().await;
        *cache = Some(token);

        Ok(access_token)
    }

    async fn acquire_token(&self) -> Result<CachedToken> {
        let token_url = format!("{}/{}/oauth2/v2.0/token", self.login_host, self.tenant_id);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("scope", &self.scope),
        ];

        let response = self
            .http
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ApiError::Auth(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Auth(format!("token endpoint returned {status}: {body}")).into());
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Auth(format!("failed to parse token response: {e}")))?;

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);
        debug!("Access token acquired, expires at {expires_at}");

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}
