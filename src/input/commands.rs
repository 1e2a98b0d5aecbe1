//! Text commands driving a demo session
//!
//! Parsing is pure: a line of text becomes a `Command` or a `CommandError`.
//! Keywords are case insensitive; arguments are passed through unchanged.

use std::path::PathBuf;

use crate::domain::navigation::ModeTarget;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("'{value}' is not a valid {expected}")]
    InvalidArgument {
        value: String,
        expected: &'static str,
    },
}

/// One user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(ModeTarget),
    Login {
        username: String,
        password: Option<String>,
    },
    Logout,
    Home,
    Page(String),
    Phase(i64),
    NextPhase,
    PreviousPhase,
    Toggle(String),
    Ask(String),
    Refresh,
    Export,
    Show,
    Render(PathBuf),
    Wait,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  start platform|journey   choose a navigation mode
  login <user> [password]  sign in with a demo account
  logout                   sign out and return to the welcome screen
  home                     back to the welcome screen
  page <key>               open a platform page
  phase <n>                jump to a journey phase (1-6)
  next | prev              step through the journey
  toggle <solution>        enable or disable a solution
  ask <text>               ask the AI dashboard builder
  refresh | export         refresh or export the current page
  show                     print the current screen
  render <file.png>        render the current screen to a PNG
  wait                     wait for pending work to finish
  help | quit";

impl Command {
    /// Parses one line of input
    ///
    /// # Returns
    /// `Ok(None)` for blank lines and `#` comments
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        let command = match word.to_ascii_lowercase().as_str() {
            "start" => match args.next().map(str::to_ascii_lowercase).as_deref() {
                Some("platform") => Command::Start(ModeTarget::Platform),
                Some("journey") => Command::Start(ModeTarget::Journey),
                Some(other) => {
                    return Err(CommandError::InvalidArgument {
                        value: other.to_string(),
                        expected: "mode (platform or journey)",
                    });
                }
                None => return Err(missing("start", "a mode (platform or journey)")),
            },
            "login" => {
                let username = args.next().ok_or_else(|| missing("login", "a username"))?;
                Command::Login {
                    username: username.to_string(),
                    password: args.next().map(str::to_string),
                }
            }
            "logout" => Command::Logout,
            "home" | "back" => Command::Home,
            "page" => Command::Page(
                args.next()
                    .ok_or_else(|| missing("page", "a page key"))?
                    .to_string(),
            ),
            "phase" => {
                let value = args.next().ok_or_else(|| missing("phase", "a phase number"))?;
                let phase = value.parse::<i64>().map_err(|_| CommandError::InvalidArgument {
                    value: value.to_string(),
                    expected: "phase number",
                })?;
                Command::Phase(phase)
            }
            "next" => Command::NextPhase,
            "prev" | "previous" => Command::PreviousPhase,
            "toggle" => Command::Toggle(
                args.next()
                    .ok_or_else(|| missing("toggle", "a solution id"))?
                    .to_string(),
            ),
            "ask" => {
                if rest.is_empty() {
                    return Err(missing("ask", "a question"));
                }
                Command::Ask(rest.to_string())
            }
            "refresh" => Command::Refresh,
            "export" => Command::Export,
            "show" => Command::Show,
            "render" => Command::Render(PathBuf::from(
                args.next().ok_or_else(|| missing("render", "an output path"))?,
            )),
            "wait" => Command::Wait,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn missing(command: &'static str, expected: &'static str) -> CommandError {
    CommandError::MissingArgument { command, expected }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# set up the demo").unwrap(), None);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse("START Platform"), Command::Start(ModeTarget::Platform));
        assert_eq!(parse("Next"), Command::NextPhase);
    }

    #[test]
    fn login_with_optional_password() {
        assert_eq!(
            parse("login admin"),
            Command::Login { username: "admin".to_string(), password: None }
        );
        assert_eq!(
            parse("login admin s3cret"),
            Command::Login { username: "admin".to_string(), password: Some("s3cret".to_string()) }
        );
    }

    #[test]
    fn ask_keeps_full_text() {
        assert_eq!(
            parse("ask  Show me downtime analysis"),
            Command::Ask("Show me downtime analysis".to_string())
        );
    }

    #[test]
    fn phase_accepts_out_of_range_numbers() {
        assert_eq!(parse("phase 0"), Command::Phase(0));
        assert_eq!(parse("phase -3"), Command::Phase(-3));
        assert!(matches!(
            Command::parse("phase two"),
            Err(CommandError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn page_key_is_not_normalized() {
        assert_eq!(parse("page Users"), Command::Page("Users".to_string()));
    }

    #[test]
    fn errors_for_missing_and_unknown() {
        assert!(matches!(Command::parse("page"), Err(CommandError::MissingArgument { command: "page", .. })));
        assert!(matches!(Command::parse("start somewhere"), Err(CommandError::InvalidArgument { .. })));
        assert_eq!(Command::parse("dance"), Err(CommandError::Unknown("dance".to_string())));
    }
}
