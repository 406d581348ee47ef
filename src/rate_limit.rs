//! Rate-limit readings
//!
//! The provider reports its quota either in response headers or in the body of
//! `GET /rate_limit`. The header reading is strict (any unparseable value gives
//! `None`), the body reading always succeeds with defaults filling the gaps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transport::ResponseHeaders;

pub const HEADER_LIMIT: &str = "X-RateLimit";
pub const HEADER_REMAINING: &str = "X-RateLimit-Remaining";
pub const HEADER_RESET: &str = "X-RateLimit-Reset";

pub const DEFAULT_LIMIT: i64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub limit: i64,
    pub remaining: i64,
    /// Epoch seconds, provider clock.
    pub reset_timestamp: i64,
}

impl RateLimitInfo {
    pub fn from_headers(headers: &ResponseHeaders) -> Option<Self> {
        Some(Self {
            limit: header_int(headers, HEADER_LIMIT, DEFAULT_LIMIT)?,
            remaining: header_int(headers, HEADER_REMAINING, 0)?,
            reset_timestamp: header_int(headers, HEADER_RESET, 0)?,
        })
    }

    pub fn from_body(body: &Value) -> Self {
        Self {
            limit: body_int(body, "limit", DEFAULT_LIMIT),
            remaining: body_int(body, "remaining", 0),
            reset_timestamp: body_int(body, "reset", 0),
        }
    }

    /// True when the headers carry any of the rate-limit keys.
    pub fn headers_present(headers: &ResponseHeaders) -> bool {
        [HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET]
            .iter()
            .any(|name| headers.contains(name))
    }
}

fn header_int(headers: &ResponseHeaders, name: &str, default: i64) -> Option<i64> {
    match headers.get(name) {
        None => Some(default),
        Some(raw) => raw.trim().parse().ok(),
    }
}

fn body_int(body: &Value, key: &str, default: i64) -> i64 {
    body.get(key).and_then(Value::as_i64).unwrap_or(default)
}
