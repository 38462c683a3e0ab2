//! The transport-agnostic request/response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A signed batch of actions.
///
/// `body` is the exact string the signature covers; it deserializes to an
/// ordered list of [`crate::ActionEntry`]. `account_id` is informational
/// only - the authenticated identity comes from the client binding, never
/// from this field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub client_id: String,
    #[serde(default)]
    pub account_id: String,
    pub signature: String,
    pub body: String,
}

/// Outcome of one action, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Value,
    pub success: bool,
    pub error: String,
}

impl ActionResult {
    pub fn ok(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
            success: true,
            error: String::new(),
        }
    }

    /// A failure echoes the request payload back alongside the error.
    pub fn fail(kind: impl Into<String>, payload: Value, error: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload,
            success: false,
            error: error.into(),
        }
    }
}

/// One result per requested action, preserving request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub results: Vec<ActionResult>,
}
