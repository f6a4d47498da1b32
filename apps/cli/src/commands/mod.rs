//! Line commands driving the session.

pub mod import;
pub mod results;
pub mod settings;
pub mod share;
pub mod study;

use quiz_core::{EncodeError, Letter, Nav, ReviewFilter};
use std::fmt;
use std::path::PathBuf;

use crate::drafts::Surface;
use crate::render;
use crate::state::AppState;

/// A failed command. The message is shown as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<EncodeError> for CommandError {
    fn from(e: EncodeError) -> Self {
        Self { message: e.to_string() }
    }
}

type Result<T> = std::result::Result<T, CommandError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Collect lines into a surface, the active one when `None`.
    Paste(Option<Surface>),
    Tab(Surface),
    Load(Option<PathBuf>),
    Template,
    Clear,
    Autofix,
    Preview,
    Answer(Letter),
    Next,
    Prev,
    /// 1-based question number.
    Go(usize),
    Flag,
    Show,
    Finish,
    Back,
    Retry,
    Review(ReviewFilter),
    Import,
    Share,
    /// Markup from a file, or the active draft when `None`.
    ShareText(Option<PathBuf>),
    Open(String),
    Export(PathBuf),
    Set { key: String, value: String },
    Tags,
    Reset,
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));
        let word = word.to_ascii_lowercase();

        if let Some(letter) = answer_key(&word) {
            return Ok(Some(Self::Answer(letter)));
        }

        let command = match word.as_str() {
            "paste" if rest.is_empty() => Self::Paste(None),
            "paste" => Self::Paste(Some(surface(rest, "paste [generator|paste]")?)),
            "tab" => Self::Tab(surface(rest, "tab generator|paste")?),
            "load" => Self::Load((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "template" => Self::Template,
            "clear" => Self::Clear,
            "autofix" => Self::Autofix,
            "preview" => Self::Preview,
            "n" | "next" => Self::Next,
            "p" | "prev" => Self::Prev,
            "go" => match rest.parse::<usize>() {
                Ok(k) if k > 0 => Self::Go(k),
                _ => return Err(CommandError::new("usage: go <question number>")),
            },
            "flag" => Self::Flag,
            "show" => Self::Show,
            "finish" => Self::Finish,
            "back" => Self::Back,
            "retry" => Self::Retry,
            "review" => {
                let filter = if rest.is_empty() { "all" } else { rest };
                match ReviewFilter::from_str(&filter.to_ascii_lowercase()) {
                    Some(filter) => Self::Review(filter),
                    None => return Err(CommandError::new("usage: review all|missed|flagged")),
                }
            }
            "import" => Self::Import,
            "share" => Self::Share,
            "share-text" => Self::ShareText((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "open" => Self::Open(required(rest, "open <token|url>")?.to_string()),
            "export" => Self::Export(PathBuf::from(required(rest, "export <file>")?)),
            "set" => match rest.split_once(char::is_whitespace) {
                Some((key, value)) => Self::Set {
                    key: key.to_ascii_lowercase(),
                    value: value.trim().to_string(),
                },
                None => return Err(CommandError::new("usage: set <key> <value>")),
            },
            "tags" => Self::Tags,
            "reset" => Self::Reset,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::new(format!("Unknown command {other:?}. Type `help`."))),
        };
        Ok(Some(command))
    }
}

/// `a`-`d` or `1`-`4`.
fn answer_key(word: &str) -> Option<Letter> {
    let mut chars = word.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    c.to_digit(10)
        .map_or_else(|| Letter::from_char(c), Letter::from_digit)
}

fn surface(rest: &str, usage: &str) -> Result<Surface> {
    Surface::from_str(&rest.to_ascii_lowercase())
        .ok_or_else(|| CommandError::new(format!("usage: {usage}")))
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    if rest.is_empty() {
        Err(CommandError::new(format!("usage: {usage}")))
    } else {
        Ok(rest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    Quit,
}

/// Feed one line of input: paste content while pasting, a command otherwise.
pub fn handle_line(state: &mut AppState, line: &str) -> Outcome {
    if state.is_pasting() {
        if line.trim() == import::PASTE_END {
            return Outcome::Reply(import::finish_paste(state));
        }
        state.push_paste_line(line);
        return Outcome::Reply(String::new());
    }

    match Command::parse(line) {
        Ok(None) => Outcome::Reply(String::new()),
        Ok(Some(command)) => execute(state, command),
        Err(e) => Outcome::Reply(e.message),
    }
}

pub fn execute(state: &mut AppState, command: Command) -> Outcome {
    let result = match command {
        Command::Quit => {
            state.persist();
            return Outcome::Quit;
        }
        Command::Help => Ok(render::HELP.to_string()),
        Command::Paste(surface) => import::paste(state, surface),
        Command::Tab(surface) => import::tab(state, surface),
        Command::Load(path) => import::load(state, path.as_deref()),
        Command::Template => import::template(state),
        Command::Clear => import::clear(state),
        Command::Autofix => import::autofix(state),
        Command::Preview => import::preview(state),
        Command::Answer(letter) => study::answer(state, letter),
        Command::Next => study::navigate(state, Nav::Next),
        Command::Prev => study::navigate(state, Nav::Prev),
        Command::Go(k) => study::navigate(state, Nav::To(k - 1)),
        Command::Flag => study::flag(state),
        Command::Show => Ok(state.render()),
        Command::Finish => results::finish(state),
        Command::Back => results::back(state),
        Command::Retry => results::retry(state),
        Command::Review(filter) => results::review(state, filter),
        Command::Import => results::open_import(state),
        Command::Share => share::share(state),
        Command::ShareText(path) => share::share_text(state, path.as_deref()),
        Command::Open(input) => share::open(state, &input),
        Command::Export(path) => share::export(state, &path),
        Command::Set { key, value } => settings::set(state, &key, &value),
        Command::Tags => settings::tags(state),
        Command::Reset => settings::reset(state),
    };
    Outcome::Reply(result.unwrap_or_else(|e| e.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parsed(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn parses_answer_keys() {
        assert_eq!(parsed("b"), Command::Answer(Letter::B));
        assert_eq!(parsed("D"), Command::Answer(Letter::D));
        assert_eq!(parsed("3"), Command::Answer(Letter::C));
        assert!(Command::parse("5").is_err());
        assert!(Command::parse("e").is_err());
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(parsed("go 3"), Command::Go(3));
        assert_eq!(parsed("load"), Command::Load(None));
        assert_eq!(
            parsed("load quiz.txt"),
            Command::Load(Some(PathBuf::from("quiz.txt")))
        );
        assert_eq!(parsed("review"), Command::Review(ReviewFilter::All));
        assert_eq!(parsed("review Missed"), Command::Review(ReviewFilter::Missed));
        assert_eq!(
            parsed("set Mode test"),
            Command::Set {
                key: "mode".into(),
                value: "test".into()
            }
        );
        assert_eq!(parsed("open #q=p.abc"), Command::Open("#q=p.abc".into()));
        assert_eq!(parsed("paste"), Command::Paste(None));
        assert_eq!(parsed("paste Generator"), Command::Paste(Some(Surface::Generator)));
        assert_eq!(parsed("tab paste"), Command::Tab(Surface::Paste));
        assert_eq!(parsed("share-text"), Command::ShareText(None));
        assert_eq!(
            parsed("share-text quiz.md"),
            Command::ShareText(Some(PathBuf::from("quiz.md")))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert!(Command::parse("go 0").is_err());
        assert!(Command::parse("go x").is_err());
        assert!(Command::parse("review sometimes").is_err());
        assert!(Command::parse("export").is_err());
        assert!(Command::parse("set mode").is_err());
        assert!(Command::parse("tab").is_err());
        assert!(Command::parse("paste sideways").is_err());
        assert!(Command::parse("dance").is_err());
    }
}
