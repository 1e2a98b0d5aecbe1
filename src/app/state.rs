//! Session state management
//!
//! Defines the session state owned by the controller and the state machine
//! that applies user-initiated events to it. Transitions are pure: the
//! machine takes the current state by value and returns the next one.

use tracing::debug;

use crate::domain::navigation::{Mode, ModeTarget, PageKey, Phase};
use crate::domain::solutions::SolutionSet;
use crate::domain::user::User;

/// In-memory session owned by the orchestrator for one application run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Which top-level screen is shown
    pub mode: Mode,
    /// Signed-in user, absent until a successful login
    pub user: Option<User>,
    /// Requested platform page key, stored verbatim and resolved by the router
    pub current_page: String,
    /// Current journey phase, always clamped
    pub current_phase: Phase,
    /// Solutions enabled for the current session
    pub enabled_solutions: SolutionSet,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: Mode::Welcome,
            user: None,
            current_page: PageKey::DEFAULT.as_str().to_string(),
            current_phase: Phase::default(),
            enabled_solutions: SolutionSet::new(),
        }
    }
}

/// Possible state transition events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    /// A navigation mode was chosen
    SelectMode(ModeTarget),
    /// The login collaborator produced a user
    LoggedIn(User),
    /// User signed out
    LoggedOut,
    /// Back to the welcome screen without signing out
    ReturnHome,
    /// Enable or disable a solution
    ToggleSolution(String),
    /// Navigate to a platform page
    SetPage(String),
    /// Jump to a journey phase (clamped)
    SetPhase(i64),
    /// Advance one journey phase
    NextPhase,
    /// Go back one journey phase
    PreviousPhase,
}

/// State machine for session transitions
pub struct StateMachine;

impl StateMachine {
    /// Processes a state event and returns the new state
    ///
    /// # Arguments
    /// * `state` - Current session state
    /// * `event` - Event to process
    ///
    /// # Returns
    /// New session state after processing the event. Events that make no
    /// sense in the current mode leave the state unchanged.
    pub fn process_event(mut state: SessionState, event: StateEvent) -> SessionState {
        match (state.mode, event) {
            // Platform access is gated behind the login screen unless a user
            // is already signed in (coming back from the journey).
            (Mode::Welcome | Mode::Journey, StateEvent::SelectMode(ModeTarget::Platform)) => {
                state.mode = if state.user.is_some() {
                    Mode::Platform
                } else {
                    Mode::Login
                };
                debug!(mode = %state.mode, "platform selected");
                state
            }

            (Mode::Welcome | Mode::Platform, StateEvent::SelectMode(ModeTarget::Journey)) => {
                state.mode = Mode::Journey;
                debug!("journey selected");
                state
            }

            (Mode::Login, StateEvent::LoggedIn(user)) => {
                // Replace, never merge with whatever was enabled before
                state.enabled_solutions = user.assigned_solutions().clone();
                debug!(user = user.name(), role = %user.role(), "logged in");
                state.user = Some(user);
                state.mode = Mode::Platform;
                state
            }

            (_, StateEvent::LoggedOut) => {
                debug!("logged out, session reset");
                SessionState::default()
            }

            (Mode::Login | Mode::Journey, StateEvent::ReturnHome) => {
                state.mode = Mode::Welcome;
                state
            }

            (_, StateEvent::ToggleSolution(id)) => {
                let enabled = state.enabled_solutions.toggle(&id);
                debug!(solution = %id, enabled, "solution toggled");
                state
            }

            (_, StateEvent::SetPage(key)) => {
                state.current_page = key;
                state
            }

            (_, StateEvent::SetPhase(value)) => {
                state.current_phase = Phase::clamped(value);
                state
            }

            (_, StateEvent::NextPhase) => {
                state.current_phase = state.current_phase.next();
                state
            }

            (_, StateEvent::PreviousPhase) => {
                state.current_phase = state.current_phase.previous();
                state
            }

            // Invalid transitions - ignore event
            (mode, event) => {
                debug!(%mode, ?event, "event ignored in current mode");
                state
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::solutions::{PREDICTIVE_MAINTENANCE, QUALITY_VISION};
    use crate::domain::user::Role;

    fn viewer() -> User {
        User::new(
            "A",
            Role::Viewer,
            [PREDICTIVE_MAINTENANCE].into_iter().collect(),
        )
    }

    fn apply(state: SessionState, events: Vec<StateEvent>) -> SessionState {
        events.into_iter().fold(state, StateMachine::process_event)
    }

    #[test]
    fn default_state_is_welcome() {
        let state = SessionState::default();
        assert_eq!(state.mode, Mode::Welcome);
        assert!(state.user.is_none());
        assert_eq!(state.current_page, "overview");
        assert_eq!(state.current_phase.get(), 1);
        assert!(state.enabled_solutions.is_empty());
    }

    #[test]
    fn platform_selection_requires_login() {
        let state = StateMachine::process_event(
            SessionState::default(),
            StateEvent::SelectMode(ModeTarget::Platform),
        );
        assert_eq!(state.mode, Mode::Login);

        let state = StateMachine::process_event(state, StateEvent::LoggedIn(viewer()));
        assert_eq!(state.mode, Mode::Platform);
        let enabled: Vec<_> = state.enabled_solutions.iter().collect();
        assert_eq!(enabled, vec![PREDICTIVE_MAINTENANCE]);
    }

    #[test]
    fn journey_selection_skips_login() {
        let state = StateMachine::process_event(
            SessionState::default(),
            StateEvent::SelectMode(ModeTarget::Journey),
        );
        assert_eq!(state.mode, Mode::Journey);
        assert!(state.user.is_none());
    }

    #[test]
    fn login_replaces_enabled_solutions() {
        let state = apply(
            SessionState::default(),
            vec![
                StateEvent::ToggleSolution(QUALITY_VISION.to_string()),
                StateEvent::ToggleSolution("custom".to_string()),
                StateEvent::SelectMode(ModeTarget::Platform),
                StateEvent::LoggedIn(viewer()),
            ],
        );
        assert_eq!(&state.enabled_solutions, viewer().assigned_solutions());
    }

    #[test]
    fn login_only_accepted_on_login_screen() {
        let welcome = SessionState::default();
        let state = StateMachine::process_event(welcome.clone(), StateEvent::LoggedIn(viewer()));
        assert_eq!(state, welcome);

        let journey = StateMachine::process_event(welcome, StateEvent::SelectMode(ModeTarget::Journey));
        let state = StateMachine::process_event(journey.clone(), StateEvent::LoggedIn(viewer()));
        assert_eq!(state, journey);

        let platform = apply(
            SessionState::default(),
            vec![
                StateEvent::SelectMode(ModeTarget::Platform),
                StateEvent::LoggedIn(viewer()),
            ],
        );
        let other = User::new("B", Role::Admin, SolutionSet::new());
        let state = StateMachine::process_event(platform.clone(), StateEvent::LoggedIn(other));
        assert_eq!(state, platform);
    }

    #[test]
    fn logout_resets_everything() {
        let state = apply(
            SessionState::default(),
            vec![
                StateEvent::SelectMode(ModeTarget::Platform),
                StateEvent::LoggedIn(viewer()),
                StateEvent::ToggleSolution(QUALITY_VISION.to_string()),
                StateEvent::SetPage("quality".to_string()),
                StateEvent::SetPhase(5),
                StateEvent::LoggedOut,
            ],
        );
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn logout_from_welcome_is_harmless() {
        let state = StateMachine::process_event(SessionState::default(), StateEvent::LoggedOut);
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn set_phase_clamps() {
        let state = StateMachine::process_event(SessionState::default(), StateEvent::SetPhase(0));
        assert_eq!(state.current_phase.get(), 1);
        let state = StateMachine::process_event(state, StateEvent::SetPhase(7));
        assert_eq!(state.current_phase.get(), 6);
        let state = StateMachine::process_event(state, StateEvent::NextPhase);
        assert_eq!(state.current_phase.get(), 6);
    }

    #[test]
    fn set_page_stores_key_verbatim() {
        let state = StateMachine::process_event(
            SessionState::default(),
            StateEvent::SetPage("no-such-page".to_string()),
        );
        assert_eq!(state.current_page, "no-such-page");
    }

    #[test]
    fn return_home_keeps_user_and_skips_login_on_reentry() {
        let state = apply(
            SessionState::default(),
            vec![
                StateEvent::SelectMode(ModeTarget::Platform),
                StateEvent::LoggedIn(viewer()),
                StateEvent::SelectMode(ModeTarget::Journey),
                StateEvent::ReturnHome,
            ],
        );
        assert_eq!(state.mode, Mode::Welcome);
        assert!(state.user.is_some());

        let state = StateMachine::process_event(state, StateEvent::SelectMode(ModeTarget::Platform));
        assert_eq!(state.mode, Mode::Platform);
    }

    #[test]
    fn invalid_transitions_are_ignored() {
        let login = StateMachine::process_event(
            SessionState::default(),
            StateEvent::SelectMode(ModeTarget::Platform),
        );
        // No journey jump from the login screen
        let state = StateMachine::process_event(login.clone(), StateEvent::SelectMode(ModeTarget::Journey));
        assert_eq!(state, login);

        // Platform is only left through logout
        let platform = StateMachine::process_event(login, StateEvent::LoggedIn(viewer()));
        let state = StateMachine::process_event(platform.clone(), StateEvent::ReturnHome);
        assert_eq!(state, platform);
    }
}
