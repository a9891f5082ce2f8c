//! Client runtime: owns the I/O, runs the event loop, executes effects.
//!
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Every async source (backend tasks, the live channel, typing timers) sends
//! `UiEvent`s to `inbox_tx`. The loop waits on stdin and the inbox, feeds
//! each event through the reducer and renders what changed.

mod handlers;
mod inbox;

use std::future::Future;
use std::io::{Stdout, Write};

use anyhow::{Context, Result};
use chatroom_core::{ApiClient, ChannelEvent, ChannelHandle, ChannelId, Config};
use chatroom_types::{Message, SessionId};
use inbox::{UiEventReceiver, UiEventSender};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::common::commands::{ParsedInput, parse_input};
use crate::common::{TaskCompleted, TaskId, TaskKind};
use crate::effects::UiEffect;
use crate::events::{Action, UiEvent};
use crate::render::{Renderer, help_text};
use crate::state::{AppState, ClientSettings};
use crate::update;

/// Line-oriented chat runtime reading commands from stdin.
pub struct ClientRuntime {
    /// Application state.
    pub state: AppState,
    api: ApiClient,
    ws_base_url: String,
    /// The active session's live channel, if one is open.
    channel: Option<ChannelHandle>,
    renderer: Renderer,
    out: Stdout,
    /// Inbox sender - handlers send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - the loop drains this.
    inbox_rx: UiEventReceiver,
}

impl ClientRuntime {
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::new(config)?;
        let (inbox_tx, inbox_rx) = inbox::channel();
        Ok(Self {
            state: AppState::new(ClientSettings::from_config(config)),
            api,
            ws_base_url: config.ws_base_url.clone(),
            channel: None,
            renderer: Renderer::new(),
            out: std::io::stdout(),
            inbox_tx,
            inbox_rx,
        })
    }

    /// Runs until `/quit` or end of input.
    pub async fn run(&mut self, initial_session: Option<SessionId>) -> Result<()> {
        info!(api = %self.api.base_url(), ws = %self.ws_base_url, "client starting");
        self.dispatch_event(UiEvent::Init);
        if let Some(session) = initial_session {
            self.dispatch_event(Action::SelectSession(Some(session)).into());
        }
        self.render()?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while !self.state.should_quit {
            tokio::select! {
                line = lines.next_line() => {
                    match line.context("Failed to read input")? {
                        Some(line) => self.handle_line(&line)?,
                        None => break,
                    }
                }
                Some(event) = self.inbox_rx.recv() => {
                    self.dispatch_event(event);
                    while let Ok(event) = self.inbox_rx.try_recv() {
                        self.dispatch_event(event);
                    }
                }
            }
            self.render()?;
        }

        if let Some(channel) = self.channel.take() {
            channel.close();
        }
        info!("client stopped");
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        self.renderer
            .render(&self.state, &mut self.out)
            .context("Failed to write output")
    }

    fn handle_line(&mut self, line: &str) -> Result<()> {
        match parse_input(line, &self.state) {
            ParsedInput::Empty => {}
            ParsedInput::Actions(actions) => {
                for action in actions {
                    self.dispatch_event(action.into());
                }
            }
            ParsedInput::Help => writeln!(self.out, "{}", help_text())?,
            ParsedInput::Error(message) => writeln!(self.out, "! {message}")?,
        }
        Ok(())
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns a backend call; its result comes back through the inbox as
    /// `TaskCompleted`.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, f: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let api = self.api.clone();
        tokio::spawn(async move {
            let inner = f(api).await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::OpenChannel { channel, session } => self.open_channel(channel, &session),
            UiEffect::CloseChannel { channel } => {
                if let Some(handle) = self.channel.take_if(|handle| handle.id() == channel) {
                    handle.close();
                }
            }
            UiEffect::SendMessage {
                channel,
                sender,
                content,
            } => {
                let message = Message::new(sender, content, chrono::Utc::now().timestamp_millis());
                let sent = self
                    .channel
                    .as_ref()
                    .filter(|handle| handle.id() == channel)
                    .is_some_and(|handle| handle.send(message));
                if !sent {
                    warn!(channel = channel.0, "dropping message for a channel that is gone");
                }
            }
            UiEffect::StartTypingTimer { generation, after } => {
                let tx = self.inbox_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(UiEvent::TypingTimeout { generation });
                });
            }

            UiEffect::LoadSessions { task } => {
                self.spawn_task(TaskKind::SessionList, task, handlers::load_sessions);
            }
            UiEffect::CreateSession { task, session } => {
                self.spawn_task(TaskKind::SessionCreate, task, move |api| {
                    handlers::create_session(api, session)
                });
            }
            UiEffect::DeleteSession { task, session } => {
                self.spawn_task(TaskKind::SessionDelete, task, move |api| {
                    handlers::delete_session(api, session)
                });
            }
            UiEffect::LoadDeletedHistory { task, session } => {
                self.spawn_task(TaskKind::DeletedHistory, task, move |api| {
                    handlers::load_deleted_history(api, session)
                });
            }
            UiEffect::BatchDelete {
                task,
                session,
                ts_list,
            } => {
                self.spawn_task(TaskKind::BatchDelete, task, move |api| {
                    handlers::batch_delete(api, session, ts_list)
                });
            }
            UiEffect::Restore {
                task,
                session,
                entry,
            } => {
                self.spawn_task(TaskKind::Restore, task, move |api| {
                    handlers::restore(api, session, entry)
                });
            }
            UiEffect::RestoreBatch {
                task,
                session,
                entries,
            } => {
                self.spawn_task(TaskKind::Restore, task, move |api| {
                    handlers::restore_batch(api, session, entries)
                });
            }
            UiEffect::Search { task, query } => {
                self.spawn_task(TaskKind::Search, task, move |api| {
                    handlers::search(api, query)
                });
            }
            UiEffect::LoadHourlyTrend { task, session } => {
                self.spawn_task(TaskKind::HourlyTrend, task, move |api| {
                    handlers::load_hourly_trend(api, session)
                });
            }
        }
    }

    fn open_channel(&mut self, channel: ChannelId, session: &str) {
        if let Some(previous) = self.channel.take() {
            debug!(channel = previous.id().0, "replacing live channel");
            previous.close();
        }

        let tx = self.inbox_tx.clone();
        let on_event = move |event: ChannelEvent| {
            let _ = tx.send(UiEvent::Channel { channel, event });
        };
        match ChannelHandle::open(channel, &self.ws_base_url, session, on_event) {
            Ok(handle) => self.channel = Some(handle),
            Err(error) => {
                warn!(session, error = %format!("{error:#}"), "could not open live channel");
                self.dispatch_event(UiEvent::Channel {
                    channel,
                    event: ChannelEvent::Failed(format!("{error:#}")),
                });
            }
        }
    }
}
