//! Line-oriented console front end.
//!
//! Each input line maps to one or more [`Action`]s (typing into a field,
//! pressing a button). The screen is re-rendered after every dispatch.

use std::io::{BufRead, Write};

use anyhow::Context;
use chrono::Utc;
use thiserror::Error;

use stockkeeper_inventory::ItemName;

use crate::state::{Action, AppState};
use crate::view::{self, TimeDisplay};

pub const HELP: &str = "\
Commands:
  name <text>          set the item name field
  qty <text>           set the quantity-to-add field
  take <text>          set the shared quantity-to-remove field
  add                  press Add with the current fields
  add <name> <qty>     fill both fields and press Add
  remove <name>        press Remove on a row (uses the take field);
                       an exact row name wins over a trailing number
  remove <name> <qty>  fill the take field and press Remove
  show                 redraw the screen
  json                 print the inventory and history as JSON
  help                 this text
  quit                 leave";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {needs}")]
    MissingArgument {
        command: &'static str,
        needs: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Dispatch(Vec<Action>),
    /// `remove <row> [qty]`; which part is the row depends on the inventory.
    Remove(String),
    Show,
    Json,
    Help,
    Quit,
    Empty,
}

/// Parse one input line.
pub fn parse(line: &str) -> Result<ShellCommand, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" => ShellCommand::Empty,
        "name" => ShellCommand::Dispatch(vec![Action::SetItemName(rest.to_string())]),
        "qty" => ShellCommand::Dispatch(vec![Action::SetItemQuantity(rest.to_string())]),
        "take" => ShellCommand::Dispatch(vec![Action::SetRemoveQuantity(rest.to_string())]),
        "add" if rest.is_empty() => ShellCommand::Dispatch(vec![Action::AddItem]),
        "add" => {
            let (name, qty) = split_trailing_word(rest).ok_or(ParseError::MissingArgument {
                command: "add",
                needs: "a name and a quantity",
            })?;
            ShellCommand::Dispatch(vec![
                Action::SetItemName(name.to_string()),
                Action::SetItemQuantity(qty.to_string()),
                Action::AddItem,
            ])
        }
        "remove" if rest.is_empty() => {
            return Err(ParseError::MissingArgument {
                command: "remove",
                needs: "an item name",
            });
        }
        "remove" => ShellCommand::Remove(rest.to_string()),
        "show" | "list" => ShellCommand::Show,
        "json" => ShellCommand::Json,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(command)
}

/// `"Brown Rice 10"` → `("Brown Rice", "10")`.
fn split_trailing_word(text: &str) -> Option<(&str, &str)> {
    text.rsplit_once(char::is_whitespace)
        .map(|(head, last)| (head.trim_end(), last))
}

/// Actions for `remove <rest>`.
///
/// `rest` naming an existing row wins, so `Pack 6` stays a row name. Only
/// otherwise is a trailing whole number taken as the quantity to remove.
pub fn remove_actions(rest: &str, state: &AppState) -> Vec<Action> {
    let is_row = ItemName::parse(rest)
        .is_some_and(|name| state.store().inventory().get(&name).is_some());
    if !is_row {
        if let Some((name, qty)) = split_trailing_word(rest) {
            if qty.parse::<i64>().is_ok() {
                return vec![
                    Action::SetRemoveQuantity(qty.to_string()),
                    Action::RemoveItem(name.to_string()),
                ];
            }
        }
    }
    vec![Action::RemoveItem(rest.to_string())]
}

/// Interactive session over any reader/writer pair.
pub struct Shell<R, W> {
    input: R,
    output: W,
    state: AppState,
    time: TimeDisplay,
}

impl<R, W> Shell<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W, time: TimeDisplay) -> Self {
        Self {
            input,
            output,
            state: AppState::new(),
            time,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_parts(self) -> (AppState, W) {
        (self.state, self.output)
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.draw()?;

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read command")?;
            if read == 0 {
                break;
            }

            match parse(&line) {
                Ok(ShellCommand::Dispatch(actions)) => self.dispatch(actions)?,
                Ok(ShellCommand::Remove(rest)) => {
                    let actions = remove_actions(&rest, &self.state);
                    self.dispatch(actions)?;
                }
                Ok(ShellCommand::Show) => self.draw()?,
                Ok(ShellCommand::Json) => {
                    let json = serde_json::to_string_pretty(&self.state.store().snapshot())
                        .context("failed to serialize inventory")?;
                    writeln!(self.output, "{json}")?;
                }
                Ok(ShellCommand::Help) => writeln!(self.output, "{HELP}")?,
                Ok(ShellCommand::Quit) => break,
                Ok(ShellCommand::Empty) => {}
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }

        self.output.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, actions: Vec<Action>) -> anyhow::Result<()> {
        for action in actions {
            tracing::debug!(?action, "dispatch");
            self.state = std::mem::take(&mut self.state).reduce(action, Utc::now());
        }
        self.draw()
    }

    fn draw(&mut self) -> anyhow::Result<()> {
        let screen = view::render(&self.state, &self.time);
        write!(self.output, "\n{screen}").context("failed to draw screen")?;
        Ok(())
    }
}
