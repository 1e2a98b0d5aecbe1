//! Application controller and coordination layer
//!
//! The controller owns the session state, mounts the screen that state
//! selects, and runs the simulated processing steps of the mounted screen
//! on a cancellable task scope. Views never mutate the session; they ask the
//! controller through its typed operations.

use std::mem;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::app::login::{Credentials, DemoDirectory, LoginError, LoginProvider};
use crate::app::state::{SessionState, StateEvent, StateMachine};
use crate::app::tasks::TaskScheduler;
use crate::config::{ConfigError, DemoConfig};
use crate::domain::matcher::{DashboardMatcher, MatchOutcome};
use crate::domain::navigation::{Mode, ModeTarget, PageKey, Phase};
use crate::domain::solutions::{CATALOG, Solution, SolutionSet};
use crate::domain::user::{Role, User};
use crate::input::CommandError;
use crate::ui::journey::build_phase;
use crate::ui::pages::{PageProps, PageView, build_page};
use crate::ui::renderer::RendererError;
use crate::ui::router::{JourneyRouter, PlatformRouter};
use crate::ui::view::{
    LoginView, MountState, NavEntry, PlatformView, Screen, ScreenKey, SolutionToggle, WelcomeView,
};

/// Application errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Login failed: {0}")]
    Login(#[from] LoginError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RendererError),

    #[error("Invalid command: {0}")]
    Command(#[from] CommandError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("'{action}' is not available on the {screen} screen")]
    NotAvailable { action: &'static str, screen: String },

    #[error("'{action}' is already in progress")]
    Busy { action: &'static str },

    #[error("Prompt must not be empty")]
    EmptyPrompt,
}

/// Result of a scheduled step, applied to the mounted screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEffect {
    /// The dashboard builder finished "thinking"
    ChatReply(MatchOutcome),
    /// A page refresh finished
    RefreshCompleted,
    /// An export finished with the given report
    ExportCompleted(String),
    /// One more journey dialogue line becomes visible
    RevealDialogueLine,
}

/// Main application controller
///
/// Operations that mount a screen with scheduled work (journey phases,
/// refresh, export, chat) spawn tokio tasks and must run inside a runtime.
pub struct AppController {
    state: SessionState,
    login: Box<dyn LoginProvider>,
    config: DemoConfig,
    platform_router: PlatformRouter,
    journey_router: JourneyRouter,
    matcher: DashboardMatcher,
    tasks: TaskScheduler<ViewEffect>,
    mounted: ScreenKey,
    mount: MountState,
    /// Scheduled effects of the mounted screen not yet applied
    pending: usize,
    login_error: Option<String>,
}

impl AppController {
    /// Creates a controller at the welcome screen
    ///
    /// # Arguments
    /// * `config` - Demo configuration (timings, accounts)
    /// * `login` - Collaborator resolving credentials to users
    pub fn new(config: DemoConfig, login: Box<dyn LoginProvider>) -> Self {
        Self {
            state: SessionState::default(),
            login,
            config,
            platform_router: PlatformRouter::new(),
            journey_router: JourneyRouter::new(),
            matcher: DashboardMatcher::new(),
            tasks: TaskScheduler::new(),
            mounted: ScreenKey::Welcome,
            mount: MountState::default(),
            pending: 0,
            login_error: None,
        }
    }

    /// Creates a controller that logs in against the configured demo accounts
    pub fn with_demo_directory(config: DemoConfig) -> Self {
        let directory = DemoDirectory::new(&config.accounts);
        Self::new(config, Box::new(directory))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn mount_state(&self) -> &MountState {
        &self.mount
    }

    /// Identity of the mounted screen
    pub fn mounted(&self) -> ScreenKey {
        self.mounted
    }

    /// Whether scheduled work is still outstanding for the mounted screen
    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    /// Processes a state event and remounts if the visible screen changed
    ///
    /// # Returns
    /// The screen mounted after processing
    pub fn process_event(&mut self, event: StateEvent) -> ScreenKey {
        let previous_user = self.state.user.clone();
        let current = mem::take(&mut self.state);
        self.state = StateMachine::process_event(current, event);
        let user_changed = self.state.user != previous_user;
        self.sync_mount(user_changed);
        self.mounted
    }

    pub fn select_mode(&mut self, target: ModeTarget) -> ScreenKey {
        self.process_event(StateEvent::SelectMode(target))
    }

    /// Applies a user supplied by the login collaborator
    ///
    /// Ignored unless the login screen is shown.
    pub fn login_user(&mut self, user: User) -> ScreenKey {
        self.login_error = None;
        self.process_event(StateEvent::LoggedIn(user))
    }

    /// Resolves credentials through the login collaborator and signs in
    ///
    /// On failure the mode is unchanged and the error is shown on the login screen.
    /// Credentials are only accepted while the login screen is shown.
    pub fn login(&mut self, credentials: &Credentials) -> Result<ScreenKey, AppError> {
        self.require_screen("login", |key| key == ScreenKey::Login)?;
        match self.login.authenticate(credentials) {
            Ok(user) => Ok(self.login_user(user)),
            Err(err) => {
                warn!(username = %credentials.username, error = %err, "login rejected");
                self.login_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    pub fn logout(&mut self) -> ScreenKey {
        self.login_error = None;
        self.process_event(StateEvent::LoggedOut)
    }

    pub fn return_home(&mut self) -> ScreenKey {
        self.process_event(StateEvent::ReturnHome)
    }

    /// Toggles a solution
    ///
    /// # Returns
    /// true if the solution is enabled afterwards
    pub fn toggle_solution(&mut self, id: &str) -> bool {
        self.process_event(StateEvent::ToggleSolution(id.to_string()));
        self.state.enabled_solutions.contains(id)
    }

    /// Navigates to a platform page
    ///
    /// # Returns
    /// The page actually resolved for the key and current user
    pub fn set_page(&mut self, key: &str) -> PageKey {
        self.process_event(StateEvent::SetPage(key.to_string()));
        self.resolved_page()
    }

    /// Jumps to a journey phase; any integer is clamped
    pub fn set_phase(&mut self, phase: i64) -> Phase {
        self.process_event(StateEvent::SetPhase(phase));
        self.state.current_phase
    }

    pub fn next_phase(&mut self) -> Phase {
        self.process_event(StateEvent::NextPhase);
        self.state.current_phase
    }

    pub fn previous_phase(&mut self) -> Phase {
        self.process_event(StateEvent::PreviousPhase);
        self.state.current_phase
    }

    /// Page the router resolves for the stored key and current user
    pub fn resolved_page(&self) -> PageKey {
        self.platform_router
            .resolve(&self.state.current_page, self.state.user.as_ref())
    }

    /// Screen that the session state currently selects
    pub fn screen_key(&self) -> ScreenKey {
        match self.state.mode {
            Mode::Welcome => ScreenKey::Welcome,
            Mode::Login => ScreenKey::Login,
            Mode::Platform => ScreenKey::Platform(self.resolved_page()),
            Mode::Journey => ScreenKey::Journey(self.state.current_phase),
        }
    }

    /// Sends a prompt to the dashboard builder
    ///
    /// The reply is delivered after the configured chat delay.
    pub fn ask(&mut self, prompt: &str) -> Result<(), AppError> {
        self.require_screen("ask", |key| key == ScreenKey::Platform(PageKey::DashboardBuilder))?;

        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::EmptyPrompt);
        }
        if self.mount.chat.is_thinking() {
            return Err(AppError::Busy { action: "ask" });
        }

        let outcome = self.matcher.match_prompt(prompt);
        debug!(prompt, ?outcome, "dashboard prompt matched");
        self.mount.chat.push_prompt(prompt);
        self.schedule(self.config.timing.chat_response(), ViewEffect::ChatReply(outcome));
        Ok(())
    }

    /// Starts a simulated refresh of the current platform page
    pub fn refresh(&mut self) -> Result<(), AppError> {
        self.require_screen("refresh", |key| matches!(key, ScreenKey::Platform(_)))?;
        if self.mount.refreshing {
            return Err(AppError::Busy { action: "refresh" });
        }

        self.mount.refreshing = true;
        self.schedule(self.config.timing.refresh(), ViewEffect::RefreshCompleted);
        Ok(())
    }

    /// Starts a simulated export of the current platform page
    ///
    /// The report reflects the page as it is when the export starts.
    pub fn export(&mut self) -> Result<(), AppError> {
        self.require_screen("export", |key| matches!(key, ScreenKey::Platform(_)))?;
        if self.mount.exporting {
            return Err(AppError::Busy { action: "export" });
        }

        let report = self.page_view(self.resolved_page()).to_report();
        self.mount.exporting = true;
        self.schedule(self.config.timing.export(), ViewEffect::ExportCompleted(report));
        Ok(())
    }

    /// Waits for the next scheduled effect of the mounted screen and applies it
    ///
    /// Returns `None` immediately when nothing is pending. Cancel-safe.
    pub async fn next_update(&mut self) -> Option<ViewEffect> {
        if self.pending == 0 {
            return None;
        }
        let effect = self.tasks.recv().await?;
        self.apply(&effect);
        Some(effect)
    }

    /// Applies an already delivered effect without waiting
    pub fn try_next_update(&mut self) -> Option<ViewEffect> {
        let effect = self.tasks.try_recv()?;
        self.apply(&effect);
        Some(effect)
    }

    /// Applies every outstanding effect of the mounted screen
    pub async fn settle(&mut self) -> Vec<ViewEffect> {
        let mut applied = Vec::new();
        while let Some(effect) = self.next_update().await {
            applied.push(effect);
        }
        applied
    }

    /// Builds the view model of the mounted screen
    pub fn screen(&self) -> Screen {
        match self.mounted {
            ScreenKey::Welcome => Screen::Welcome(WelcomeView {
                title: "Manufacturing Intelligence Platform",
                tagline: "Turn plant data into fewer stops, better quality and lower energy cost.",
                options: [
                    ("platform", "Explore the Platform"),
                    ("journey", "Follow a Customer Journey"),
                ],
                signed_in_as: self.state.user.as_ref().map(|u| u.name().to_string()),
            }),
            ScreenKey::Login => Screen::Login(LoginView {
                account_hints: self.login.account_hints(),
                error: self.login_error.clone(),
            }),
            ScreenKey::Platform(page) => Screen::Platform(self.platform_view(page)),
            ScreenKey::Journey(phase) => {
                let stage = self.journey_router.resolve_phase(phase);
                Screen::Journey(build_phase(stage, phase, self.mount.revealed_lines))
            }
        }
    }

    fn platform_view(&self, page: PageKey) -> PlatformView {
        let user = self.state.user.as_ref();
        let nav = PageKey::ALL
            .iter()
            .filter(|key| !key.requires_admin() || user.is_some_and(User::is_admin))
            .map(|key| NavEntry {
                key: *key,
                label: key.label(),
                active: *key == page,
            })
            .collect();

        PlatformView {
            user_name: user.map_or_else(|| "Guest".to_string(), |u| u.name().to_string()),
            role: user.map_or(Role::Viewer, User::role),
            nav,
            solutions: solution_toggles(&self.state.enabled_solutions),
            page: self.page_view(page),
        }
    }

    fn page_view(&self, page: PageKey) -> PageView {
        let accounts: Vec<(String, String)> = self
            .config
            .accounts
            .iter()
            .map(|a| (a.username.clone(), a.role.to_string()))
            .collect();
        let props = PageProps {
            user: self.state.user.as_ref(),
            enabled_solutions: &self.state.enabled_solutions,
            mount: &self.mount,
            accounts: &accounts,
        };
        build_page(page, &props)
    }

    fn require_screen(
        &self,
        action: &'static str,
        allowed: impl Fn(ScreenKey) -> bool,
    ) -> Result<(), AppError> {
        if allowed(self.mounted) {
            Ok(())
        } else {
            Err(AppError::NotAvailable {
                action,
                screen: self.screen().title().to_string(),
            })
        }
    }

    fn schedule(&mut self, delay: std::time::Duration, effect: ViewEffect) {
        self.tasks.schedule_after(delay, effect);
        self.pending += 1;
    }

    fn apply(&mut self, effect: &ViewEffect) {
        self.pending = self.pending.saturating_sub(1);
        match effect {
            ViewEffect::ChatReply(outcome) => self.mount.chat.push_reply(outcome),
            ViewEffect::RefreshCompleted => {
                self.mount.refreshing = false;
                self.mount.refresh_count += 1;
            }
            ViewEffect::ExportCompleted(report) => {
                self.mount.exporting = false;
                self.mount.last_export = Some(report.clone());
            }
            ViewEffect::RevealDialogueLine => {
                self.mount.revealed_lines += 1;
            }
        }
    }

    /// Unmounts the previous screen and mounts the selected one
    ///
    /// Remounts when the selected screen differs or the signed-in user changed.
    fn sync_mount(&mut self, user_changed: bool) {
        let next = self.screen_key();
        if next == self.mounted && !user_changed {
            return;
        }

        let generation = self.tasks.teardown();
        info!(from = ?self.mounted, to = ?next, generation, "screen remounted");
        self.mounted = next;
        self.mount = MountState::default();
        self.pending = 0;
        self.login_error = None;
        self.on_mount();
    }

    fn on_mount(&mut self) {
        if let ScreenKey::Journey(phase) = self.mounted {
            let stage = self.journey_router.resolve_phase(phase);
            let total = stage.dialogue().len();
            self.mount.revealed_lines = total.min(1);

            let remaining = total - self.mount.revealed_lines;
            if remaining > 0 {
                self.tasks.schedule_every(
                    self.config.timing.dialogue_interval(),
                    remaining,
                    |_| ViewEffect::RevealDialogueLine,
                );
                self.pending += remaining;
            }
        }
    }
}

fn solution_toggles(enabled: &SolutionSet) -> Vec<SolutionToggle> {
    let mut toggles: Vec<SolutionToggle> = CATALOG
        .iter()
        .map(|solution| SolutionToggle {
            id: solution.id.to_string(),
            name: solution.name.to_string(),
            enabled: enabled.contains(solution.id),
        })
        .collect();

    // Identifiers outside the catalog are still shown so they can be switched off
    toggles.extend(
        enabled
            .iter()
            .filter(|id| Solution::lookup(id).is_none())
            .map(|id| SolutionToggle {
                id: id.to_string(),
                name: id.to_string(),
                enabled: true,
            }),
    );
    toggles
}

impl Drop for AppController {
    fn drop(&mut self) {
        debug!(pending = self.pending, "controller shutting down");
    }
}
