//! Inbox channel: every async source reports back to the runtime through it.

use tokio::sync::mpsc;

use crate::events::UiEvent;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

pub fn channel() -> (UiEventSender, UiEventReceiver) {
    mpsc::unbounded_channel()
}
