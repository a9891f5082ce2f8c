//! Interactive chat command.

use anyhow::Result;
use chatroom_core::Config;
use chatroom_core::logging::LoggingHandle;

pub async fn run(config: &Config, logging: &LoggingHandle, session: Option<String>) -> Result<()> {
    println!("chatroom · {} · /help for commands", config.api_base_url);
    println!("logs: {}", logging.log_path.display());
    chatroom_client::run_interactive_chat(config, session).await
}
