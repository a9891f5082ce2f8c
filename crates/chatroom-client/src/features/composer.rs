//! Outbound message composition and the assistant typing indicator.

use crate::effects::UiEffect;
use crate::features::session::ChannelState;
use crate::state::AppState;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ComposerState {
    pub input: String,
    /// Shown from a send until the assistant replies or the timer fires.
    pub assistant_typing: bool,
    /// Identifies the most recent typing timer; older timers are ignored.
    pub typing_generation: u64,
}

impl ComposerState {
    pub fn reset_typing(&mut self) {
        self.assistant_typing = false;
        self.typing_generation = self.typing_generation.wrapping_add(1);
    }
}

pub fn set_input(app: &mut AppState, text: String) -> Vec<UiEffect> {
    app.composer.input = text;
    vec![]
}

/// Sends the trimmed input over the open channel.
///
/// Blank input, or a channel that is not open, leaves everything untouched.
pub fn send(app: &mut AppState) -> Vec<UiEffect> {
    let content = app.composer.input.trim();
    if content.is_empty() {
        return vec![];
    }
    let ChannelState::Open(channel) = app.channel else {
        return vec![];
    };
    let content = content.to_string();

    let composer = &mut app.composer;
    composer.input.clear();
    composer.assistant_typing = true;
    composer.typing_generation = composer.typing_generation.wrapping_add(1);

    vec![
        UiEffect::SendMessage {
            channel,
            sender: app.settings.self_sender.clone(),
            content,
        },
        UiEffect::StartTypingTimer {
            generation: composer.typing_generation,
            after: app.settings.typing_timeout,
        },
    ]
}

pub fn handle_typing_timeout(app: &mut AppState, generation: u64) -> Vec<UiEffect> {
    if app.composer.typing_generation == generation {
        app.composer.assistant_typing = false;
    }
    vec![]
}
