//! Shared UI helpers.

pub mod auth;
