//! Gateways to the backend platform: REST auth, count queries, and the
//! realtime websocket channel.
//!
//! DESIGN
//! ======
//! Every operation here is a thin pass-through: the platform owns session
//! validation, counting, and change delivery. Gateways forward the
//! platform's own error message text and add no error taxonomy of their own.

pub mod auth;
pub mod data;
pub mod realtime;
pub mod types;

/// Compile-time platform API key, attached as the `apikey` header when set.
///
/// Deployments that front the platform with a same-origin proxy that injects
/// the key can leave this unset.
pub fn anon_key() -> Option<&'static str> {
    option_env!("PULSE_ANON_KEY")
}
