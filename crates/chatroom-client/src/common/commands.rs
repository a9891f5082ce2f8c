//! Slash commands understood by the interactive client.
//!
//! A line starting with `/` is a command; anything else is sent as a chat
//! message. Commands that refer to messages take the 1-based numbers shown
//! next to them.

use chatroom_types::SessionId;

use crate::events::Action;
use crate::state::AppState;

/// Definition of a command.
#[derive(Debug, Clone)]
pub struct Command {
    /// Primary name (e.g., "open") - without the leading slash.
    pub name: &'static str,
    /// Aliases (e.g., ["switch"]) - without leading slashes.
    pub aliases: &'static [&'static str],
    /// Argument synopsis shown in help.
    pub usage: &'static str,
    pub description: &'static str,
}

impl Command {
    /// Returns true if `name` is the command name or one of its aliases
    /// (case-insensitive).
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Returns the display name with aliases, e.g., "quit (q, exit)".
    pub fn display_name(&self) -> String {
        if self.aliases.is_empty() {
            self.name.to_string()
        } else {
            format!("{} ({})", self.name, self.aliases.join(", "))
        }
    }
}

/// Available commands.
pub const COMMANDS: &[Command] = &[
    Command {
        name: "sessions",
        aliases: &["ls"],
        usage: "",
        description: "Reload and list sessions",
    },
    Command {
        name: "open",
        aliases: &["switch", "join"],
        usage: "<session|n>",
        description: "Open a session",
    },
    Command {
        name: "close",
        aliases: &["leave"],
        usage: "",
        description: "Leave the current session",
    },
    Command {
        name: "new",
        aliases: &["add"],
        usage: "<session>",
        description: "Create a session and open it",
    },
    Command {
        name: "remove",
        aliases: &["rm", "delete-session"],
        usage: "[session]",
        description: "Delete a session (defaults to the current one)",
    },
    Command {
        name: "refresh",
        aliases: &["reload"],
        usage: "",
        description: "Reconnect and reload the current session",
    },
    Command {
        name: "batch",
        aliases: &[],
        usage: "",
        description: "Toggle message selection mode",
    },
    Command {
        name: "select",
        aliases: &["sel"],
        usage: "<n>...",
        description: "Toggle selection of messages",
    },
    Command {
        name: "all",
        aliases: &[],
        usage: "",
        description: "Select every message",
    },
    Command {
        name: "none",
        aliases: &[],
        usage: "",
        description: "Clear the message selection",
    },
    Command {
        name: "delete",
        aliases: &["del"],
        usage: "",
        description: "Delete the selected messages",
    },
    Command {
        name: "deleted",
        aliases: &["trash", "history"],
        usage: "[off]",
        description: "Show or hide deleted messages",
    },
    Command {
        name: "dbatch",
        aliases: &[],
        usage: "",
        description: "Toggle deleted-message selection mode",
    },
    Command {
        name: "dselect",
        aliases: &["dsel"],
        usage: "<n>...",
        description: "Toggle selection of deleted messages",
    },
    Command {
        name: "dall",
        aliases: &[],
        usage: "",
        description: "Select every deleted message",
    },
    Command {
        name: "dnone",
        aliases: &[],
        usage: "",
        description: "Clear the deleted-message selection",
    },
    Command {
        name: "restore",
        aliases: &["undelete"],
        usage: "[n]",
        description: "Restore one deleted message, or the selection",
    },
    Command {
        name: "search",
        aliases: &["find"],
        usage: "<text>",
        description: "Find sessions containing text",
    },
    Command {
        name: "jump",
        aliases: &["goto"],
        usage: "<session|n>",
        description: "Open a session from the search results",
    },
    Command {
        name: "trend",
        aliases: &["stats", "analytics"],
        usage: "[off]",
        description: "Show hourly activity for the current session",
    },
    Command {
        name: "yes",
        aliases: &["y", "confirm"],
        usage: "",
        description: "Confirm the pending action",
    },
    Command {
        name: "no",
        aliases: &["n", "cancel"],
        usage: "",
        description: "Cancel the pending action",
    },
    Command {
        name: "help",
        aliases: &["?", "commands"],
        usage: "",
        description: "Show this help",
    },
    Command {
        name: "quit",
        aliases: &["q", "exit"],
        usage: "",
        description: "Exit",
    },
];

pub fn find_command(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.is_named(name))
}

/// What one line of input turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    Empty,
    Actions(Vec<Action>),
    Help,
    Error(String),
}

/// Parses one line typed by the user against the current state.
pub fn parse_input(line: &str, app: &AppState) -> ParsedInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ParsedInput::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ParsedInput::Actions(vec![Action::SetInput(line.to_string()), Action::Send]);
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };
    let Some(command) = find_command(name) else {
        return ParsedInput::Error(format!("Unknown command '/{name}'. Try /help."));
    };

    match parse_command(command.name, args, app) {
        Ok(parsed) => parsed,
        Err(message) => ParsedInput::Error(message),
    }
}

fn parse_command(name: &str, args: &str, app: &AppState) -> Result<ParsedInput, String> {
    let actions = match name {
        "sessions" => vec![Action::ReloadSessions],
        "help" => return Ok(ParsedInput::Help),
        "open" => vec![Action::SelectSession(Some(resolve_session(
            args,
            &app.sessions.list,
        )?))],
        "close" => vec![Action::SelectSession(None)],
        "new" => vec![Action::AddSession(required(args, "/new <session>")?.to_string())],
        "remove" => {
            let target = if args.is_empty() {
                app.sessions
                    .active
                    .clone()
                    .ok_or_else(|| "No session is open; use /remove <session>".to_string())?
            } else {
                resolve_session(args, &app.sessions.list)?
            };
            vec![Action::RequestDeleteSession(target)]
        }
        "refresh" => vec![Action::Refresh],
        "batch" => vec![Action::ToggleBatchMode],
        "select" => {
            require_batch(app.messages.batch_mode, "/batch")?;
            numbers(args)?
                .into_iter()
                .map(|n| {
                    app.messages
                        .items
                        .get(n - 1)
                        .map(|m| Action::ToggleSelected(m.ts))
                        .ok_or_else(|| format!("No message #{n}"))
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        "all" => vec![Action::SelectAll(true)],
        "none" => vec![Action::SelectAll(false)],
        "delete" => {
            if app.messages.selection.is_empty() {
                return Err("Nothing selected; use /batch then /select <n>".to_string());
            }
            vec![Action::RequestBatchDelete]
        }
        "deleted" => vec![Action::ShowDeletedHistory(!is_off(args))],
        "dbatch" => vec![Action::ToggleDeletedBatchMode],
        "dselect" => {
            require_batch(app.deleted.batch_mode, "/dbatch")?;
            numbers(args)?
                .into_iter()
                .map(|n| {
                    app.deleted
                        .items
                        .get(n - 1)
                        .map(|entry| Action::ToggleDeletedSelected(entry.key()))
                        .ok_or_else(|| format!("No deleted message #{n}"))
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        "dall" => vec![Action::SelectAllDeleted(true)],
        "dnone" => vec![Action::SelectAllDeleted(false)],
        "restore" => {
            if args.is_empty() {
                if app.deleted.selection.is_empty() {
                    return Err(
                        "Nothing selected; use /restore <n> or /dbatch then /dselect".to_string(),
                    );
                }
                vec![Action::RequestRestoreBatch]
            } else {
                let n = number(args)?;
                let entry = app
                    .deleted
                    .items
                    .get(n - 1)
                    .ok_or_else(|| format!("No deleted message #{n}"))?;
                vec![Action::RequestRestore(entry.key())]
            }
        }
        "search" => vec![Action::Search(required(args, "/search <text>")?.to_string())],
        "jump" => vec![Action::JumpToSession(resolve_session(
            args,
            &app.search.results,
        )?)],
        "trend" => {
            if is_off(args) {
                vec![Action::CloseAnalytics]
            } else {
                vec![Action::ShowAnalytics]
            }
        }
        "yes" => vec![Action::Confirm],
        "no" => vec![Action::Cancel],
        "quit" => vec![Action::Quit],
        other => return Err(format!("Unhandled command '/{other}'")),
    };
    Ok(ParsedInput::Actions(actions))
}

fn required<'a>(args: &'a str, usage: &str) -> Result<&'a str, String> {
    if args.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(args)
    }
}

fn is_off(args: &str) -> bool {
    matches!(args, "off" | "hide" | "close")
}

fn require_batch(enabled: bool, toggle: &str) -> Result<(), String> {
    if enabled {
        Ok(())
    } else {
        Err(format!("Selection mode is off; enable it with {toggle}"))
    }
}

fn number(arg: &str) -> Result<usize, String> {
    match arg.trim_start_matches('#').parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Expected a message number, got '{arg}'")),
    }
}

fn numbers(args: &str) -> Result<Vec<usize>, String> {
    let numbers = args
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(number)
        .collect::<Result<Vec<_>, _>>()?;
    if numbers.is_empty() {
        return Err("Expected one or more message numbers".to_string());
    }
    Ok(numbers)
}

/// Resolves a session name, or a 1-based position in `listed`.
///
/// An exact name match wins over a position.
fn resolve_session(arg: &str, listed: &[SessionId]) -> Result<SessionId, String> {
    if arg.is_empty() {
        return Err("Expected a session name or number".to_string());
    }
    if listed.iter().any(|s| s == arg) {
        return Ok(arg.to_string());
    }
    if let Ok(n) = arg.trim_start_matches('#').parse::<usize>() {
        return listed
            .get(n.wrapping_sub(1))
            .cloned()
            .ok_or_else(|| format!("No session #{n}"));
    }
    Ok(arg.to_string())
}
