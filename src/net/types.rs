//! DTOs for the platform's auth and realtime payloads.
//!
//! DESIGN
//! ======
//! These types mirror the platform's wire shapes so serde can do the
//! parsing and the gateways stay schema-driven. Fields the app never reads
//! are kept as open `serde_json::Value` rather than modeled out.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// An authenticated platform user.
///
/// Opaque to the app: it is stored and displayed but never mutated locally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID string).
    pub id: String,
    /// Sign-in email, if the platform exposes one.
    #[serde(default)]
    pub email: Option<String>,
    /// Open-ended profile fields owned by the platform.
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    /// Last sign-in timestamp as reported by the platform.
    #[serde(default)]
    pub last_sign_in_at: Option<String>,
}

/// A validated session: the bearer token plus its user.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

/// Token-grant response from `POST /auth/v1/token`.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// A phoenix-style message on the realtime websocket.
///
/// Both directions use the same envelope: `topic` scopes the channel,
/// `event` names the operation, `payload` is event-specific, and `ref`
/// correlates replies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub topic: String,
    pub event: String,
    pub payload: serde_json::Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}
