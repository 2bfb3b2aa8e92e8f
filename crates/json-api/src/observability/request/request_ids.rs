//! Correlation ids carried in `x-request-id`.

use salvo::{http::header::HeaderValue, prelude::Response};
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id kept as is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// A request id that is always safe to echo in a response header and to
/// write into logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RequestId(String);

impl RequestId {
    /// Keep the caller's id when it is usable, otherwise mint a UUIDv7.
    pub(super) fn from_header(header_value: Option<&str>) -> Self {
        header_value
            .map(str::trim)
            .filter(|value| is_acceptable(value))
            .map_or_else(Self::generate, |value| Self(value.to_owned()))
    }

    fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub(super) fn as_str(&self) -> &str {
        &self.0
    }

    pub(super) fn write_header(&self, res: &mut Response) {
        if let Ok(value) = HeaderValue::from_str(&self.0) {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Visible ASCII only, so ids cannot split log lines or smuggle headers.
fn is_acceptable(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|byte| byte.is_ascii_graphic())
}
