//! Feature slices. Each module owns its state and the reducer logic for it.

pub mod analytics;
pub mod composer;
pub mod deleted;
pub mod messages;
pub mod search;
pub mod session;
