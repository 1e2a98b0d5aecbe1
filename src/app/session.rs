//! Command dispatch for text-driven sessions
//!
//! Maps each parsed `Command` onto a controller operation and produces the
//! text shown to the user. Shared by the interactive loop and script runner.

use std::fmt::Write;

use tracing::debug;

use crate::app::controller::{AppController, AppError, ViewEffect};
use crate::app::login::Credentials;
use crate::input::{Command, HELP};
use crate::ui::renderer::ScreenRenderer;
use crate::ui::terminal::render_text;
use crate::ui::view::Screen;

/// What the caller should do after a command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to print; may be empty
    Output(String),
    Quit,
}

/// Executes one command against the controller
///
/// # Arguments
/// * `controller` - Session to drive
/// * `command` - Parsed command
///
/// # Returns
/// The reply to show, or an error for operations the current screen rejects
pub async fn execute(controller: &mut AppController, command: Command) -> Result<Reply, AppError> {
    debug!(?command, "executing command");

    let output = match command {
        Command::Start(target) => {
            controller.select_mode(target);
            screen_text(controller)
        }
        Command::Login { username, password } => {
            let mut credentials = Credentials::new(username);
            if let Some(password) = password {
                credentials = credentials.with_password(password);
            }
            controller.login(&credentials)?;
            screen_text(controller)
        }
        Command::Logout => {
            controller.logout();
            screen_text(controller)
        }
        Command::Home => {
            controller.return_home();
            screen_text(controller)
        }
        Command::Page(key) => {
            controller.set_page(&key);
            screen_text(controller)
        }
        Command::Phase(phase) => {
            controller.set_phase(phase);
            screen_text(controller)
        }
        Command::NextPhase => {
            controller.next_phase();
            screen_text(controller)
        }
        Command::PreviousPhase => {
            controller.previous_phase();
            screen_text(controller)
        }
        Command::Toggle(id) => {
            let state = if controller.toggle_solution(&id) {
                "enabled"
            } else {
                "disabled"
            };
            format!("{} {}\n{}", id, state, screen_text(controller))
        }
        Command::Ask(prompt) => {
            controller.ask(&prompt)?;
            "Thinking...".to_string()
        }
        Command::Refresh => {
            controller.refresh()?;
            "Refreshing...".to_string()
        }
        Command::Export => {
            controller.export()?;
            "Exporting...".to_string()
        }
        Command::Show => screen_text(controller),
        Command::Render(path) => {
            let render = &controller.config().render;
            let renderer = ScreenRenderer::from_config(render)?;
            renderer.render_to_png(&controller.screen(), render.width, render.height, &path)?;
            format!("Rendered {} to {}", controller.screen().title(), path.display())
        }
        Command::Wait => {
            let mut out = String::new();
            for effect in controller.settle().await {
                if let Some(note) = describe_effect(controller, &effect) {
                    let _ = writeln!(out, "{}", note);
                }
            }
            out.push_str(&screen_text(controller));
            out
        }
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(Reply::Quit),
    };

    Ok(Reply::Output(output))
}

/// Text for an applied effect, if it is worth a notification
pub fn describe_effect(controller: &AppController, effect: &ViewEffect) -> Option<String> {
    match effect {
        ViewEffect::ChatReply(outcome) => Some(format!("AI: {}", outcome.reply_text())),
        ViewEffect::RefreshCompleted => Some("Refresh complete".to_string()),
        ViewEffect::ExportCompleted(report) => Some(format!("Export ready:\n{}", report)),
        ViewEffect::RevealDialogueLine => match controller.screen() {
            Screen::Journey(view) => view
                .revealed
                .last()
                .map(|line| format!("  {}: \"{}\"", line.speaker, line.text)),
            _ => None,
        },
    }
}

fn screen_text(controller: &AppController) -> String {
    render_text(&controller.screen())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoConfig;
    use crate::domain::navigation::{Mode, ModeTarget, PageKey};
    use crate::ui::view::ScreenKey;

    fn output(reply: Reply) -> String {
        match reply {
            Reply::Output(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    async fn run(controller: &mut AppController, line: &str) -> Result<Reply, AppError> {
        let command = Command::parse(line)?.expect("command line");
        execute(controller, command).await
    }

    #[tokio::test(start_paused = true)]
    async fn login_flow_through_commands() {
        let mut controller = AppController::with_demo_directory(DemoConfig::default());

        let text = output(run(&mut controller, "start platform").await.unwrap());
        assert!(text.contains("Sign in"));

        let text = output(run(&mut controller, "login manager").await.unwrap());
        assert!(text.contains("Sam Okafor"));
        assert_eq!(controller.mode(), Mode::Platform);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_login_is_an_error() {
        let mut controller = AppController::with_demo_directory(DemoConfig::default());
        controller.select_mode(ModeTarget::Platform);

        let result = run(&mut controller, "login nobody").await;
        assert!(matches!(result, Err(AppError::Login(_))));
        assert_eq!(controller.mode(), Mode::Login);
    }

    #[tokio::test(start_paused = true)]
    async fn ask_then_wait_prints_reply() {
        let mut controller = AppController::with_demo_directory(DemoConfig::default());
        run(&mut controller, "start platform").await.unwrap();
        run(&mut controller, "login admin").await.unwrap();
        run(&mut controller, "page dashboard-builder").await.unwrap();
        assert_eq!(controller.mounted(), ScreenKey::Platform(PageKey::DashboardBuilder));

        let text = output(run(&mut controller, "ask Show me downtime analysis").await.unwrap());
        assert_eq!(text, "Thinking...");

        let text = output(run(&mut controller, "wait").await.unwrap());
        assert!(text.contains("AI: Here is a Downtime Analysis dashboard"));
        assert!(!controller.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_reports_new_state() {
        let mut controller = AppController::with_demo_directory(DemoConfig::default());
        let text = output(run(&mut controller, "toggle energy-optimization").await.unwrap());
        assert!(text.starts_with("energy-optimization enabled"));
        let text = output(run(&mut controller, "toggle energy-optimization").await.unwrap());
        assert!(text.starts_with("energy-optimization disabled"));
    }

    #[tokio::test(start_paused = true)]
    async fn render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("welcome.png");
        let mut controller = AppController::with_demo_directory(DemoConfig::default());

        let text = output(execute(&mut controller, Command::Render(path.clone())).await.unwrap());
        assert!(text.starts_with("Rendered Manufacturing Intelligence Platform"));
        assert!(path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn quit_and_help() {
        let mut controller = AppController::with_demo_directory(DemoConfig::default());
        assert_eq!(run(&mut controller, "quit").await.unwrap(), Reply::Quit);
        assert!(output(run(&mut controller, "help").await.unwrap()).contains("start platform|journey"));
    }
}
