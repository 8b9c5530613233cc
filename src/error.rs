use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use oauth2::basic::BasicErrorResponseType;
use oauth2::reqwest::Error as ReqwestClientError;
use oauth2::{HttpClientError, RequestTokenError, StandardErrorResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

use crate::types::upload::UploadKind;

#[derive(Debug, ThisError)]
pub enum LinkpageError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JWT signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("OAuth2 token request error: {0}")]
    Oauth2Token(String),

    #[error("OAuth2 server error: {error}")]
    Oauth2Server { error: String },

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("Upstream response missing field `{0}`")]
    MissingUpstreamField(&'static str),

    #[error("Malformed service account credential: {0}")]
    MalformedCredential(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Only image files are allowed!")]
    NotAnImage,

    #[error("File too large. Maximum size is 10MB.")]
    FileTooLarge,

    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] JsonRejection),

    #[error("Malformed multipart body: {0}")]
    MalformedMultipart(String),

    #[error("Failed to upload {kind}: {source}")]
    UploadFailed {
        kind: UploadKind,
        #[source]
        source: Box<LinkpageError>,
    },
}

impl LinkpageError {
    /// Attach the upload kind so the response names what failed.
    pub fn during_upload(self, kind: UploadKind) -> Self {
        match self {
            err @ LinkpageError::UploadFailed { .. } => err,
            err => LinkpageError::UploadFailed {
                kind,
                source: Box::new(err),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            LinkpageError::NoFileUploaded
            | LinkpageError::NotAnImage
            | LinkpageError::FileTooLarge
            | LinkpageError::MalformedMultipart(_) => StatusCode::BAD_REQUEST,
            LinkpageError::InvalidJson(rejection) => rejection.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl
    From<
        RequestTokenError<
            HttpClientError<ReqwestClientError>,
            StandardErrorResponse<BasicErrorResponseType>,
        >,
    > for LinkpageError
{
    fn from(
        e: RequestTokenError<
            HttpClientError<ReqwestClientError>,
            StandardErrorResponse<BasicErrorResponseType>,
        >,
    ) -> Self {
        match e {
            RequestTokenError::ServerResponse(err) => LinkpageError::Oauth2Server {
                error: err.error().to_string(),
            },
            RequestTokenError::Request(req_e) => {
                LinkpageError::Oauth2Token(format!("request failed: {}", req_e))
            }
            RequestTokenError::Parse(parse_err, _body) => {
                LinkpageError::Json(parse_err.into_inner())
            }
            RequestTokenError::Other(s) => LinkpageError::Oauth2Token(s),
        }
    }
}

impl IntoResponse for LinkpageError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self {
            LinkpageError::NoFileUploaded
            | LinkpageError::NotAnImage
            | LinkpageError::FileTooLarge => self.to_string(),
            LinkpageError::MalformedMultipart(_) => "Malformed multipart body".to_string(),
            LinkpageError::InvalidJson(rejection) => rejection.body_text(),
            LinkpageError::UploadFailed { kind, .. } => format!("Failed to upload {kind}"),
            _ => "Internal server error".to_string(),
        };
        (status, Json(ApiErrorResponse { error: message })).into_response()
    }
}

/// Error body returned to clients: `{"error": "..."}`.
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
