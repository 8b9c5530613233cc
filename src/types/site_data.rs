use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

/// Client-defined page content. Only `lastUpdated` is ever touched by the server.
pub type SiteData = Map<String, Value>;

pub const LAST_UPDATED_FIELD: &str = "lastUpdated";

const DEFAULT_AVATAR: &str = "https://lh3.googleusercontent.com/aida-public/AB6AXuD4-4nseipxqo0kUCZE9uFM44MdTSYdXZK7Ip6KdlyymxoMUAFfS7Ve06-Q9hHGxjPluC6X1APdZdN4rucbf81eaxjkm_YhmgvFAXw4pcASA-ix8llEXZC5nUN6SacEV2XF_k-dtb9Yva94yHVEtkau6hvENT-rlCm-EdLda-wSIKp47tOJkZDAYu-1VrHNM-2ra5qRFgsaqhl86noxOuc2f75yKQwk7z-_QUC1XkJ0rEhR3XHAN6BLxLkkhAlcI2nDPjqbfeDSZ3h2";

const DEFAULT_BACKGROUND: &str = "https://lh3.googleusercontent.com/aida-public/AB6AXuC8aAcLjxpyVZyPCmL72kiLClze8F-26nZRzXjNA-qmY4h-RzSJhNeTrZLXfhEr5bEkoErKSv2uzqv6I_Z1c0WGToWBBo8lmLUNeAu_LDe-B6S3W7w34pYYpdPQrqxAz8xq3TpZqdZYGIbp69Ua_oGY5QBQh5-87_vbnvnV7ZBjOqxAz-WTUZIAhSwh7ZlLA7pHlcbVbQ-UyX1jMuk4iQ_-RC6DX9nJz-Q_qINfaQcsZmJBDXDCP-yJdKV9S66Jyooe_Tw2Che6pEPO";

/// Served when nothing has been saved yet. Never written back.
pub static DEFAULT_SITE_DATA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "profile": {
            "name": "Mẹ Bỉm Sữa Review",
            "bio": "Chia sẻ kinh nghiệm nuôi dạy con & săn deal hot cho bé yêu 🍼 Follow để nhận voucher mỗi ngày nhé!",
            "avatar": DEFAULT_AVATAR,
        },
        "backgroundImage": DEFAULT_BACKGROUND,
        "categories": [],
    })
});

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T08:30:00.123Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Overwrite (or add) the server-side write stamp.
pub fn stamp_last_updated(data: &mut SiteData, timestamp: String) {
    data.insert(LAST_UPDATED_FIELD.to_string(), Value::String(timestamp));
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
}

impl SaveResponse {
    pub fn saved() -> Self {
        Self {
            success: true,
            message: "Site data saved successfully".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
