//! Typed model of the handle API JSON response.

use serde::{Deserialize, Serialize};

use crate::{Error, ErrorKind};

/// Value type holding a direct target URL.
pub const URL_TYPE: &str = "URL";

/// Value type holding an XML list of weighted alternate locations.
pub const LOCATIONS_TYPE: &str = "10320/loc";

/// The `responseCode` returned by the handle API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "i64", into = "i64")]
pub enum ResponseCode {
    /// The handle was resolved.
    Success,
    /// Something unexpected went wrong during handle resolution.
    Error,
    /// The handle does not exist.
    HandleNotFound,
    /// The handle exists but has no values matching the query.
    ValuesNotFound,
    /// A code the handle API does not document.
    Unknown(i64),
}

impl ResponseCode {
    /// The numeric code as sent on the wire.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Success => 1,
            Self::Error => 2,
            Self::HandleNotFound => 100,
            Self::ValuesNotFound => 200,
            Self::Unknown(code) => code,
        }
    }

    /// Human readable description of the code.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Success => "Success.",
            Self::Error => "Error. Something unexpected went wrong during handle resolution.",
            Self::HandleNotFound => "Handle Not Found.",
            Self::ValuesNotFound => "Values Not Found. The handle exists but has no values (or no values according to the types and indices specified).",
            Self::Unknown(_) => "Unknown response code.",
        }
    }

    /// The HTTP status the handle API pairs with this code.
    #[must_use]
    pub const fn expected_status(self) -> Option<u16> {
        match self {
            Self::Success | Self::ValuesNotFound => Some(200),
            Self::Error => Some(500),
            Self::HandleNotFound => Some(404),
            Self::Unknown(_) => None,
        }
    }

    /// `true` only for [`ResponseCode::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<i64> for ResponseCode {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Success,
            2 => Self::Error,
            100 => Self::HandleNotFound,
            200 => Self::ValuesNotFound,
            other => Self::Unknown(other),
        }
    }
}

impl From<ResponseCode> for i64 {
    fn from(code: ResponseCode) -> Self {
        code.code()
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// A handle resolution response.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Response {
    #[serde(rename = "responseCode")]
    response_code: ResponseCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values: Vec<Value>,
}

/// One typed value attached to a handle.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Value {
    index: u32,
    #[serde(rename = "type")]
    value_type: String,
    data: ValueData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
struct ValueData {
    format: String,
    // not always a string, `admin` values are objects
    value: serde_json::Value,
}

impl Response {
    /// Parses a response body, unwrapping a JSONP callback if present.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Deserialize`] is returned when the body does not have
    /// the shape of a handle response.
    pub fn from_body(body: &str) -> Result<Self, Error> {
        serde_json::from_str(strip_jsonp(body)).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
    }

    /// The `responseCode` of the response.
    #[must_use]
    pub const fn code(&self) -> ResponseCode {
        self.response_code
    }

    /// The handle echoed back by the server.
    #[must_use]
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    /// Values in the order the server returned them.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Values whose declared type equals `value_type`.
    pub fn values_of_type<'a>(&'a self, value_type: &'a str) -> impl Iterator<Item = &'a Value> {
        self.values.iter().filter(move |v| v.value_type == value_type)
    }
}

impl Value {
    /// The index of the value within the handle.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// The declared type, e.g. [`URL_TYPE`] or [`LOCATIONS_TYPE`].
    #[must_use]
    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    /// The data format, e.g. `string` or `admin`.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.data.format
    }

    /// The raw data value.
    #[must_use]
    pub const fn data(&self) -> &serde_json::Value {
        &self.data.value
    }

    /// The data value when it is a string.
    #[must_use]
    pub fn data_str(&self) -> Option<&str> {
        self.data.value.as_str()
    }

    /// Time to live in seconds, when the server sent one.
    #[must_use]
    pub const fn ttl(&self) -> Option<i64> {
        self.ttl
    }

    /// When the value was last modified, as sent by the server.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }
}

fn strip_jsonp(body: &str) -> &str {
    let body = body.trim();
    if body.starts_with('{') {
        return body;
    }

    match (body.find('('), body.rfind(')')) {
        (Some(start), Some(end)) if start < end => &body[start + 1..end],
        _ => body,
    }
}
