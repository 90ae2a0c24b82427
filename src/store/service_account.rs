//! Google service-account authentication.
//!
//! Signs an RS256 assertion with the service account key and exchanges it
//! for an OAuth access token (JWT bearer grant). The token is cached until
//! shortly before it expires.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use super::StoreError;

/// OAuth scope for reading and writing spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Lifetime requested for each signed assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before Google says they expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Claims of the signed assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS as u64
}

struct CachedToken {
    token: SecretString,
    expires_at: Instant,
}

/// Access-token source for one service account.
#[derive(Clone)]
pub struct ServiceAccountAuth {
    email: String,
    key: EncodingKey,
    token_url: String,
    http: reqwest::Client,
    cache: Arc<RwLock<Option<CachedToken>>>,
}

impl ServiceAccountAuth {
    /// Parse the PEM private key. Fails fast on a malformed key.
    pub fn new(
        email: &str,
        private_key: &SecretString,
        token_url: &str,
        http: reqwest::Client,
    ) -> Result<Self, StoreError> {
        let key = EncodingKey::from_rsa_pem(private_key.expose_secret().as_bytes())
            .map_err(|e| StoreError::Auth(format!("invalid private key: {}", e)))?;

        Ok(Self {
            email: email.to_string(),
            key,
            token_url: token_url.to_string(),
            http,
            cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Build the signed assertion for the token exchange.
    pub fn signed_assertion(&self, now: i64) -> Result<String, StoreError> {
        let claims = AssertionClaims {
            iss: self.email.clone(),
            scope: SHEETS_SCOPE.to_string(),
            aud: self.token_url.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| StoreError::Auth(format!("failed to sign assertion: {}", e)))
    }

    /// A valid access token, from cache when possible.
    pub async fn access_token(&self) -> Result<SecretString, StoreError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref()
                && Instant::now() < cached.expires_at
            {
                return Ok(cached.token.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(cached) = cache.as_ref()
            && Instant::now() < cached.expires_at
        {
            return Ok(cached.token.clone());
        }

        let assertion = self.signed_assertion(chrono::Utc::now().timestamp())?;
        let body = format!(
            "grant_type={}&assertion={}",
            urlencoding::encode(JWT_BEARER_GRANT),
            urlencoding::encode(&assertion)
        );

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

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!(
                "token endpoint returned {}: {}",
                status, text
            )));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(REFRESH_MARGIN);
        debug!(
            "Obtained Google access token for {} (valid {}s)",
            self.email,
            lifetime.as_secs()
        );

        let secret = SecretString::from(token.access_token);
        *cache = Some(CachedToken {
            token: secret.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(secret)
    }
}
