//! Line commands typed at the prompt.

use podplay_core::{AppViewModel, Msg};
use thiserror::Error;

/// Row numbers are 1-based as printed by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Play(usize),
    Stop,
    Episodes(usize),
    ToggleSubscription(usize),
    ListSubscriptions,
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Dispatch(Msg),
    ShowSubscriptions,
    ShowHelp,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a row number")]
    NotANumber(String),
    #[error("there is no row {0}")]
    NoSuchRow(usize),
}

pub const HELP: &str = "\
search <term>   find podcasts
play <n>        preview row n (again to pause or resume)
stop            stop the preview
episodes <n>    list episodes of row n
sub <n>         subscribe or unsubscribe row n
subs            list subscriptions
clear           clear results
quit            exit";

/// `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "search" | "s" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("search"));
            }
            Command::Search(rest.to_string())
        }
        "play" | "p" => Command::Play(row_number("play", rest)?),
        "stop" => Command::Stop,
        "episodes" | "e" => Command::Episodes(row_number("episodes", rest)?),
        "sub" => Command::ToggleSubscription(row_number("sub", rest)?),
        "subs" => Command::ListSubscriptions,
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn row_number(command: &'static str, raw: &str) -> Result<usize, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    raw.parse::<usize>()
        .map_err(|_| CommandError::NotANumber(raw.to_string()))
}

/// Resolve row numbers against the rows currently on screen.
pub fn to_action(command: Command, view: &AppViewModel) -> Result<Action, CommandError> {
    let row_at = move |number: usize| {
        number
            .checked_sub(1)
            .and_then(|index| view.rows.get(index))
            .ok_or(CommandError::NoSuchRow(number))
    };
    let key_of = |number: usize| row_at(number).map(|row| row.key.clone());

    let action = match command {
        Command::Search(term) => Action::Dispatch(Msg::SearchSubmitted(term)),
        Command::Play(number) => Action::Dispatch(Msg::PreviewSelected {
            key: key_of(number)?,
        }),
        Command::Stop => Action::Dispatch(Msg::StopClicked),
        Command::Episodes(number) => {
            let row = row_at(number)?;
            Action::Dispatch(Msg::DetailsRequested {
                key: row.key.clone(),
                image_url: row.image_url.clone(),
            })
        }
        Command::ToggleSubscription(number) => Action::Dispatch(Msg::SubscriptionToggled {
            key: key_of(number)?,
        }),
        Command::ListSubscriptions => Action::ShowSubscriptions,
        Command::Clear => Action::Dispatch(Msg::ResultsCleared),
        Command::Help => Action::ShowHelp,
        Command::Quit => Action::Quit,
    };
    Ok(action)
}
