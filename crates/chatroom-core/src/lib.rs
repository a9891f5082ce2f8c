//! Core chatroom library (config, logging, backend API, live channel).

pub mod api;
pub mod channel;
pub mod config;
pub mod logging;

pub use api::ApiClient;
pub use channel::{ChannelEvent, ChannelHandle, ChannelId};
pub use config::Config;
