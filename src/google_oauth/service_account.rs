use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::EncodingKey;
use tokio::sync::RwLock;
use tracing::info;

use super::credentials::ServiceAccountKey;
use super::endpoints::GoogleOauthEndpoints;
use crate::error::LinkpageError;

/// Tokens are renewed this long before Google says they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Access tokens for the service account, minted through the JWT-bearer grant.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    scope: String,
    http: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Fails on an incomplete key or an unreadable PEM private key.
    pub fn new(
        key: ServiceAccountKey,
        scope: impl Into<String>,
        http: reqwest::Client,
    ) -> Result<Self, LinkpageError> {
        if key.project_id.is_empty() {
            return Err(LinkpageError::MissingConfig("service account project_id"));
        }
        if key.client_email.is_empty() {
            return Err(LinkpageError::MissingConfig("service account client_email"));
        }
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| LinkpageError::MalformedCredential(format!("private_key: {e}")))?;

        info!(
            project_id = %key.project_id,
            client_email = %key.client_email,
            "service account credential loaded"
        );

        Ok(Self {
            key,
            signing_key,
            scope: scope.into(),
            http,
            cached: RwLock::new(None),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.key.project_id
    }

    /// A valid bearer token, reusing the cached one while it is fresh.
    pub async fn access_token(&self) -> Result<String, LinkpageError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref()
                && token.expires_at > Utc::now()
            {
                return Ok(token.token.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(token) = cached.as_ref()
            && token.expires_at > Utc::now()
        {
            return Ok(token.token.clone());
        }

        let fresh = GoogleOauthEndpoints::exchange_jwt_assertion(
            &self.key,
            &self.signing_key,
            &self.scope,
            self.http.clone(),
        )
        .await?;
        let lifetime = (fresh.expires_in - EXPIRY_MARGIN_SECS).max(0);
        *cached = Some(CachedToken {
            token: fresh.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(lifetime),
        });
        Ok(fresh.access_token)
    }
}
