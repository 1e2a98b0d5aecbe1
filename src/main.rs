use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use mfg_intel_demo::app::{AppController, AppError, Credentials, Reply, describe_effect, execute};
use mfg_intel_demo::config::DemoConfig;
use mfg_intel_demo::domain::matcher::{DashboardMatcher, MatchOutcome};
use mfg_intel_demo::domain::navigation::ModeTarget;
use mfg_intel_demo::input::Command;
use mfg_intel_demo::ui::{ScreenRenderer, render_text};

#[derive(Parser)]
#[command(name = "mfg-demo")]
#[command(author, version, about = "Manufacturing intelligence platform demo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "MFG_DEMO_CONFIG")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session reading commands from stdin (default)
    Repl,

    /// Run session commands from a file, one per line
    Script {
        /// Script file
        path: PathBuf,
    },

    /// Show which dashboard template a prompt selects
    Ask {
        /// Prompt text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Render one screen to PNG
    Render {
        /// Output file
        #[arg(long)]
        out: PathBuf,

        /// Demo account to sign in with
        #[arg(long)]
        user: Option<String>,

        /// Platform page key
        #[arg(long, conflicts_with = "phase")]
        page: Option<String>,

        /// Journey phase
        #[arg(long, allow_negative_numbers = true)]
        phase: Option<i64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mfg_intel_demo=debug")
    } else {
        EnvFilter::new("mfg_intel_demo=info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = DemoConfig::load_or_default(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => {
            let mut controller = AppController::with_demo_directory(config);
            cmd_repl(&mut controller).await
        }
        Commands::Script { path } => {
            let mut controller = AppController::with_demo_directory(config);
            cmd_script(&mut controller, &path).await
        }
        Commands::Ask { text } => {
            cmd_ask(&text.join(" "));
            Ok(())
        }
        Commands::Render {
            out,
            user,
            page,
            phase,
        } => cmd_render(config, &out, user, page, phase),
    }
}

async fn cmd_repl(controller: &mut AppController) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", render_text(&controller.screen()));
    println!("Type 'help' for commands.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !run_line(controller, &line).await {
                    break;
                }
            }
            Some(effect) = controller.next_update(), if controller.has_pending() => {
                if let Some(note) = describe_effect(controller, &effect) {
                    println!("{}", note);
                }
            }
        }
    }

    Ok(())
}

async fn cmd_script(controller: &mut AppController, path: &Path) -> Result<(), AppError> {
    let script = std::fs::read_to_string(path)?;
    info!(path = %path.display(), "running script");

    for (number, line) in script.lines().enumerate() {
        match Command::parse(line) {
            Ok(Some(command)) => {
                println!("> {}", line.trim());
                match execute(controller, command).await {
                    Ok(Reply::Output(text)) => print_output(&text),
                    Ok(Reply::Quit) => return Ok(()),
                    Err(e) => warn!(line = number + 1, error = %e, "command failed"),
                }
            }
            Ok(None) => {}
            Err(e) => warn!(line = number + 1, error = %e, "invalid command"),
        }
    }

    for effect in controller.settle().await {
        if let Some(note) = describe_effect(controller, &effect) {
            println!("{}", note);
        }
    }
    Ok(())
}

/// Runs one interactive line; false when the session should end
async fn run_line(controller: &mut AppController, line: &str) -> bool {
    let command = match Command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(e) => {
            eprintln!("{}", e);
            return true;
        }
    };

    match execute(controller, command).await {
        Ok(Reply::Output(text)) => {
            print_output(&text);
            true
        }
        Ok(Reply::Quit) => false,
        Err(e) => {
            eprintln!("{}", e);
            true
        }
    }
}

fn print_output(text: &str) {
    if !text.is_empty() {
        println!("{}", text.trim_end());
    }
}

fn cmd_ask(prompt: &str) {
    let outcome = DashboardMatcher::new().match_prompt(prompt);
    println!("{}", outcome.reply_text());
    if let MatchOutcome::Template(template) = outcome {
        for widget in template.widgets {
            println!("  [{}] {}", widget.kind.label(), widget.title);
        }
    }
}

fn cmd_render(
    config: DemoConfig,
    out: &Path,
    user: Option<String>,
    page: Option<String>,
    phase: Option<i64>,
) -> Result<(), AppError> {
    let renderer = ScreenRenderer::from_config(&config.render)?;
    let (width, height) = (config.render.width, config.render.height);
    let mut controller = AppController::with_demo_directory(config);

    if let Some(phase) = phase {
        controller.select_mode(ModeTarget::Journey);
        controller.set_phase(phase);
    } else if user.is_some() || page.is_some() {
        controller.select_mode(ModeTarget::Platform);
        if let Some(user) = user {
            controller.login(&Credentials::new(user))?;
        }
        if let Some(page) = page {
            controller.set_page(&page);
        }
    }

    let screen = controller.screen();
    renderer.render_to_png(&screen, width, height, out)?;
    println!("Rendered {} to {}", screen.title(), out.display());
    Ok(())
}
