//! Shared client-side state containers.
//!
//! DESIGN
//! ======
//! State is split by domain so components depend on small focused models.
//! Containers are plain structs held in `RwSignal`s provided via context;
//! side effects (navigation, subscriptions) live in the views that read and
//! write them, never in the containers themselves.

pub mod events;
pub mod session;
