//! Route components.

pub mod dashboard;
pub mod login;
