//! Interactive chat client.
//!
//! State lives in [`state::AppState`] and changes only through
//! [`update::update`]. The [`runtime::ClientRuntime`] performs the I/O the
//! reducer asks for.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod update;

use anyhow::Result;
use chatroom_core::Config;
use chatroom_types::SessionId;
pub use runtime::ClientRuntime;

/// Runs the interactive chat loop, optionally opening a session right away.
pub async fn run_interactive_chat(config: &Config, session: Option<SessionId>) -> Result<()> {
    let mut runtime = ClientRuntime::new(config)?;
    runtime.run(session).await
}
