use crate::error::LinkpageError;
use crate::google_oauth::credentials::{DriveOauthCredential, ServiceAccountKey};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use oauth2::{
    Client as OAuth2Client, ClientId, ClientSecret, EndpointNotSet, EndpointSet, RefreshToken,
    StandardRevocableToken, TokenResponse, TokenUrl,
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenResponse,
    },
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Stateless Google OAuth endpoints.
pub(crate) struct GoogleOauthEndpoints;

impl GoogleOauthEndpoints {
    /// Mint a fresh access token from the long-lived refresh token.
    pub(crate) async fn refresh_access_token(
        creds: &DriveOauthCredential,
        token_url: &Url,
        http_client: reqwest::Client,
    ) -> Result<String, LinkpageError> {
        let client = build_oauth2_client(creds, token_url)?;
        let token_result: BasicTokenResponse = client
            .exchange_refresh_token(&RefreshToken::new(creds.refresh_token.clone()))
            .request_async(&http_client)
            .await?;
        debug!(client_id = %creds.client_id, "Drive access token refreshed");
        Ok(token_result.access_token().secret().to_string())
    }

    /// Trade a signed service-account assertion for an access token.
    pub(crate) async fn exchange_jwt_assertion(
        key: &ServiceAccountKey,
        signing_key: &EncodingKey,
        scope: &str,
        http_client: reqwest::Client,
    ) -> Result<ServiceAccountToken, LinkpageError> {
        let assertion = sign_assertion(key, signing_key, scope, chrono::Utc::now().timestamp())?;

        let resp = http_client
            .post(key.token_uri.as_str())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, body = %body, "service account token exchange rejected");
            return Err(LinkpageError::Oauth2Server { error: body });
        }

        let token: ServiceAccountToken = resp.json().await?;
        debug!(project_id = %key.project_id, "service account token issued");
        Ok(token)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

fn sign_assertion(
    key: &ServiceAccountKey,
    signing_key: &EncodingKey,
    scope: &str,
    now: i64,
) -> Result<String, LinkpageError> {
    let mut header = Header::new(Algorithm::RS256);
    if !key.private_key_id.is_empty() {
        header.kid = Some(key.private_key_id.clone());
    }
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope,
        aud: &key.token_uri,
        iat: now,
        exp: now + 3600,
    };
    Ok(jsonwebtoken::encode(&header, &claims, signing_key)?)
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServiceAccountToken {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Build the Google OAuth2 client from the Drive credential.
fn build_oauth2_client(
    creds: &DriveOauthCredential,
    token_url: &Url,
) -> Result<DriveOauth2Client, LinkpageError> {
    let client = OAuth2Client::new(ClientId::new(creds.client_id.clone()))
        .set_client_secret(ClientSecret::new(creds.client_secret.clone()))
        .set_token_uri(TokenUrl::from_url(token_url.clone()));
    Ok(client)
}

pub(crate) type DriveOauth2Client = OAuth2Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;
