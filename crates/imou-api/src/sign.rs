// Request signing
//
// Every call carries a `system` block whose `sign` binds the operation
// parameters, a timestamp, and a nonce to the application secret. The
// canonical string and digest must match the vendor byte-for-byte.

use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::Credentials;

/// Operation parameters. Keys are unique; order is irrelevant on the wire.
pub type Params = serde_json::Map<String, Value>;

/// Protocol version sent in every `system` block.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Build a [`Params`] map from literal pairs.
pub fn params<const N: usize>(pairs: [(&str, Value); N]) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

/// The `system` block of a signed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemBlock {
    pub ver: &'static str,
    pub sign: String,
    pub app_id: String,
    pub nonce: String,
    pub time: i64,
}

/// Complete request body: `{system, params, id}`.
///
/// Built fresh for every call and never reused.
#[derive(Debug, Clone, Serialize)]
pub struct SignedEnvelope {
    pub system: SystemBlock,
    pub params: Params,
    pub id: String,
}

impl SignedEnvelope {
    /// Sign `params` with a freshly drawn timestamp, nonce, and request id.
    pub fn new(params: Params, credentials: &Credentials) -> Self {
        let time = chrono::Utc::now().timestamp();
        let nonce = Uuid::new_v4().to_string();
        let system = sign_with(&params, credentials, time, &nonce);
        Self {
            system,
            params,
            id: Uuid::new_v4().to_string(),
        }
    }
}

/// Render a parameter value the way the signature expects it: strings
/// verbatim, everything else in its JSON text form.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build the string that gets hashed.
///
/// `key:value` pairs sorted over the whole rendered string (not the key),
/// comma-joined, followed by `time`, `nonce`, and `appSecret`.
pub fn canonical_string(params: &Params, time: i64, nonce: &str, app_secret: &str) -> String {
    let mut pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{key}:{}", render_value(value)))
        .collect();
    pairs.sort();

    let mut out = String::new();
    for pair in &pairs {
        out.push_str(pair);
        out.push(',');
    }
    out.push_str(&format!("time:{time},nonce:{nonce},appSecret:{app_secret}"));
    out
}

/// Lowercase MD5 hex digest of the trimmed canonical string.
pub fn signature(params: &Params, time: i64, nonce: &str, app_secret: &str) -> String {
    let canonical = canonical_string(params, time, nonce, app_secret);
    format!("{:x}", md5::compute(canonical.trim().as_bytes()))
}

/// Build a `system` block for fixed `time` and `nonce`.
pub fn sign_with(params: &Params, credentials: &Credentials, time: i64, nonce: &str) -> SystemBlock {
    SystemBlock {
        ver: PROTOCOL_VERSION,
        sign: signature(
            params,
            time,
            nonce,
            credentials.app_secret.expose_secret(),
        ),
        app_id: credentials.app_id.clone(),
        nonce: nonce.to_owned(),
        time,
    }
}
