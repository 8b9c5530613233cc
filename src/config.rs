use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use url::Url;

pub static GOOGLE_AUTH_URI: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://accounts.google.com/o/oauth2/auth").expect("valid Google auth URI")
});

pub static GOOGLE_TOKEN_URI: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://oauth2.googleapis.com/token").expect("valid Google token URI")
});

pub static GOOGLE_CERTS_URI: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://www.googleapis.com/oauth2/v1/certs").expect("valid Google certs URI")
});

pub static DRIVE_UPLOAD_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart&fields=id")
        .expect("valid Drive upload URL")
});

pub static DRIVE_FILES_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://www.googleapis.com/drive/v3/files/").expect("valid Drive files URL")
});

pub static FIRESTORE_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://firestore.googleapis.com/v1/").expect("valid Firestore URL")
});

pub const FIRESTORE_SCOPE: &str =
    "https://www.googleapis.com/auth/datastore https://www.googleapis.com/auth/cloud-platform";

/// Public download link served for every uploaded image.
pub const DRIVE_PUBLIC_URL_PREFIX: &str = "https://drive.google.com/uc?id=";

/// Origins allowed to call the API from a browser.
pub const CORS_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "https://nhixinhne.vercel.app",
    "https://nhixinhne-a39e2.web.app",
];

/// Largest accepted image, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Room left on top of `MAX_UPLOAD_BYTES` for multipart boundaries and headers.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Plain settings, parsed by figment's env provider.
const ENV_KEYS: [&str; 4] = ["PORT", "LOGLEVEL", "STORAGE", "DATABASE_URL"];

/// Credentials and ids, taken verbatim: figment would turn a 21-digit client id
/// into a float and try to read a JSON blob as one of its own values.
/// Blank values are ignored.
const VERBATIM_ENV_KEYS: [&str; 11] = [
    "FIREBASE_SERVICE_ACCOUNT_KEY",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_PRIVATE_KEY_ID",
    "FIREBASE_PRIVATE_KEY",
    "FIREBASE_CLIENT_EMAIL",
    "FIREBASE_CLIENT_ID",
    "FIREBASE_CLIENT_X509_CERT_URL",
    "GOOGLE_CLIENT_ID",
    "GOOGLE_CLIENT_SECRET",
    "GOOGLE_REFRESH_TOKEN",
    "GOOGLE_DRIVE_FOLDER_ID",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Firestore,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub loglevel: String,
    pub storage: StorageBackend,
    pub database_url: String,

    pub firebase_service_account_key: Option<String>,
    pub firebase_project_id: Option<String>,
    pub firebase_private_key_id: Option<String>,
    pub firebase_private_key: Option<String>,
    pub firebase_client_email: Option<String>,
    pub firebase_client_id: Option<String>,
    pub firebase_client_x509_cert_url: Option<String>,

    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_refresh_token: Option<String>,
    pub google_drive_folder_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            loglevel: "info".to_string(),
            storage: StorageBackend::Firestore,
            database_url: "sqlite:linkpage.db".to_string(),
            firebase_service_account_key: None,
            firebase_project_id: None,
            firebase_private_key_id: None,
            firebase_private_key: None,
            firebase_client_email: None,
            firebase_client_id: None,
            firebase_client_x509_cert_url: None,
            google_client_id: None,
            google_client_secret: None,
            google_refresh_token: None,
            google_drive_folder_id: "root".to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with the recognized environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(&ENV_KEYS))
            .merge(Serialized::defaults(verbatim_env()))
    }
}

fn verbatim_env() -> BTreeMap<String, String> {
    VERBATIM_ENV_KEYS
        .iter()
        .filter_map(|key| {
            let value = std::env::var(key).ok()?;
            (!value.trim().is_empty()).then(|| (key.to_ascii_lowercase(), value))
        })
        .collect()
}
