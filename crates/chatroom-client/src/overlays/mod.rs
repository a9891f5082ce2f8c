//! Modal overlays.
//!
//! - `confirm.rs`: confirmation gate in front of every destructive operation

pub mod confirm;

pub use confirm::{ConfirmGate, ConfirmStatus, PendingAction};
