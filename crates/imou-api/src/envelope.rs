// Response envelope
//
// Every Imou response is wrapped as `{ id, result: { code, msg, data } }`.
// `code == "0"` means success; anything else is a vendor failure whose
// code and message are kept as inspectable data.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// Vendor result code for success.
pub const SUCCESS_CODE: &str = "0";

/// Outer response wrapper.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope<T> {
    #[serde(default)]
    pub id: Option<String>,
    pub result: ApiResult<T>,
}

/// The `result` block: a vendor code, a diagnostic message, and the payload
/// (present on success only).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResult<T> {
    #[serde(deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Success yields the (possibly absent) payload; any other code becomes
    /// [`Error::Api`] carrying `code` and `msg` verbatim.
    pub fn into_result(self) -> Result<Option<T>, Error> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(Error::Api {
                code: self.code,
                message: self.msg,
            })
        }
    }
}

/// The vendor sends `code` as a string, but some gateways emit a bare
/// number. Accept both.
fn code_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number for result.code, got {other}"
        ))),
    }
}

fn deserialization_error(err: &serde_json::Error, body: &str) -> Error {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    let preview = &body[..end];
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}

/// Parse a raw body into the envelope without interpreting the code.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<ResponseEnvelope<T>, Error> {
    serde_json::from_str(body).map_err(|e| deserialization_error(&e, body))
}

/// Parse a raw body and unwrap the payload.
///
/// A success envelope without `data` decodes as an empty object, so payload
/// types whose fields all default (e.g. [`crate::models::Empty`]) still
/// succeed.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    let envelope: ResponseEnvelope<Value> = parse_envelope(body)?;
    let data = match envelope.result.into_result()? {
        Some(Value::Null) | None => Value::Object(serde_json::Map::new()),
        Some(value) => value,
    };
    serde_json::from_value(data).map_err(|e| deserialization_error(&e, body))
}
