use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// OKX request signature:
/// `base64(HMAC-SHA256(secret, timestamp + METHOD + request_path + body))`.
pub fn sign(secret: &str, timestamp: &str, method: &str, request_path: &str, body: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(timestamp.as_bytes());
    mac.update(method.to_ascii_uppercase().as_bytes());
    mac.update(request_path.as_bytes());
    mac.update(body.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// ISO-8601 UTC with millisecond precision and a `Z` suffix, e.g.
/// `2024-05-01T12:00:00.000Z`.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub access_key: String,
    pub signature: String,
    pub timestamp: String,
    pub passphrase: String,
}

#[derive(Clone)]
pub struct Signer {
    api_key: String,
    api_secret: String,
    passphrase: String,
}

impl Signer {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Headers for a request sent now. The timestamp is part of the signed
    /// message, so these must never be reused across requests.
    pub fn headers(&self, method: &str, request_path: &str, body: &str) -> AuthHeaders {
        self.headers_at(&iso_timestamp(Utc::now()), method, request_path, body)
    }

    pub fn headers_at(
        &self,
        timestamp: &str,
        method: &str,
        request_path: &str,
        body: &str,
    ) -> AuthHeaders {
        AuthHeaders {
            access_key: self.api_key.clone(),
            signature: sign(&self.api_secret, timestamp, method, request_path, body),
            timestamp: timestamp.to_string(),
            passphrase: self.passphrase.clone(),
        }
    }
}
