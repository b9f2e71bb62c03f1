// Console input - Line commands standing in for clicks and form submits
use crate::application::dashboard_app::{AppEvent, DashboardApp, UserAction};
use crate::application::ports::DisplaySurface;
use crate::domain::command::WifiSettings;
use crate::domain::dashboard::Section;
use crate::domain::relay::RelayId;
use std::io::Write;
use thiserror::Error;
use tracing::warn;

pub const USAGE: &str = "\
commands:
  show <home|devices|settings>
  add <name> <gpio>
  toggle <id>
  delete <id>      then `confirm` or `cancel`
  settings ssid=.. password=.. token=.. server=.. port=..
  help
  quit
wrap names or values containing spaces in double quotes, e.g. add \"Grow Light\" 5";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    Action(UserAction),
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConsoleError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid relay id '{0}'")]
    InvalidId(String),
    #[error("{0}")]
    InvalidSection(String),
    #[error("unknown settings field '{0}'")]
    UnknownField(String),
    #[error("unterminated quote")]
    UnterminatedQuote,
}

/// Whether the event loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one console line to the dashboard. `None` is end of input and
/// stops the loop like `quit`.
pub fn dispatch_line<S: DisplaySurface, W: Write>(
    app: &mut DashboardApp<S>,
    line: Option<&str>,
    out: &mut W,
) -> Flow {
    let Some(line) = line else {
        return Flow::Quit;
    };
    let written = match parse_line(line) {
        Ok(ConsoleInput::Action(action)) => {
            app.handle(AppEvent::User(action));
            Ok(())
        }
        Ok(ConsoleInput::Help) => writeln!(out, "{}", USAGE),
        Ok(ConsoleInput::Quit) => return Flow::Quit,
        Ok(ConsoleInput::Empty) => Ok(()),
        Err(e) => writeln!(out, "{}\n{}", e, USAGE),
    };
    if let Err(e) = written {
        warn!(error = %e, "Failed to write console reply");
    }
    Flow::Continue
}

/// Split on whitespace; double quotes group words and may open mid-word,
/// as in `ssid="My Home"`
fn tokenize(line: &str) -> Result<Vec<String>, ConsoleError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(ConsoleError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

pub fn parse_line(line: &str) -> Result<ConsoleInput, ConsoleError> {
    let tokens = tokenize(line)?;
    let mut words = tokens.iter().map(String::as_str);
    let Some(command) = words.next() else {
        return Ok(ConsoleInput::Empty);
    };

    let action = match command.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(ConsoleInput::Help),
        "quit" | "exit" => return Ok(ConsoleInput::Quit),
        "show" => {
            let name = words.next().ok_or(ConsoleError::MissingArgument("section"))?;
            let section = name.parse::<Section>().map_err(ConsoleError::InvalidSection)?;
            UserAction::ShowSection(section)
        }
        // Missing fields are passed through so the relay dialog can reject them
        "add" => UserAction::AddRelay {
            name: words.next().unwrap_or_default().to_string(),
            gpio: words.next().unwrap_or_default().to_string(),
        },
        "toggle" => UserAction::ToggleRelay(parse_id(words.next())?),
        "delete" => UserAction::DeleteRelay(parse_id(words.next())?),
        "confirm" => UserAction::ConfirmDelete,
        "cancel" => UserAction::CancelDelete,
        "settings" => UserAction::SubmitSettings(parse_settings(words)?),
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };

    Ok(ConsoleInput::Action(action))
}

fn parse_id(word: Option<&str>) -> Result<RelayId, ConsoleError> {
    let word = word.ok_or(ConsoleError::MissingArgument("id"))?;
    word.parse::<u64>()
        .map(RelayId)
        .map_err(|_| ConsoleError::InvalidId(word.to_string()))
}

fn parse_settings<'a>(
    pairs: impl Iterator<Item = &'a str>,
) -> Result<WifiSettings, ConsoleError> {
    let mut form = WifiSettings::default();
    for pair in pairs {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let slot = match key {
            "ssid" => &mut form.ssid,
            "password" => &mut form.password,
            "token" => &mut form.token,
            "server" => &mut form.server,
            "port" => &mut form.port,
            other => return Err(ConsoleError::UnknownField(other.to_string())),
        };
        *slot = value.to_string();
    }
    Ok(form)
}
