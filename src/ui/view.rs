//! Mounted screens and their per-mount state
//!
//! A `Screen` is the complete view model of what is currently shown. It is
//! rebuilt from session state whenever it is needed; only `MountState`
//! survives between builds, and only until the screen is unmounted.

use crate::domain::navigation::{PageKey, Phase};
use crate::domain::user::Role;
use crate::ui::chat::ChatTranscript;
use crate::ui::journey::PhaseView;
use crate::ui::pages::PageView;

/// Ephemeral state owned by the mounted screen
///
/// Reset on every remount, together with the task scope that feeds it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MountState {
    pub chat: ChatTranscript,
    pub refreshing: bool,
    pub refresh_count: u32,
    pub exporting: bool,
    pub last_export: Option<String>,
    pub revealed_lines: usize,
}

/// Identity of a mounted screen; a change means unmount + mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKey {
    Welcome,
    Login,
    Platform(PageKey),
    Journey(Phase),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeView {
    pub title: &'static str,
    pub tagline: &'static str,
    pub options: [(&'static str, &'static str); 2],
    /// Name of a user still signed in after leaving the platform
    pub signed_in_as: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginView {
    pub account_hints: Vec<String>,
    pub error: Option<String>,
}

/// Navigation entry in the platform sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub key: PageKey,
    pub label: &'static str,
    pub active: bool,
}

/// Solution toggle in the platform header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionToggle {
    pub id: String,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformView {
    pub user_name: String,
    pub role: Role,
    pub nav: Vec<NavEntry>,
    pub solutions: Vec<SolutionToggle>,
    pub page: PageView,
}

/// Everything currently shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Welcome(WelcomeView),
    Login(LoginView),
    Platform(PlatformView),
    Journey(PhaseView),
}

impl Screen {
    /// Short title for window captions and notifications
    pub fn title(&self) -> &str {
        match self {
            Screen::Welcome(view) => view.title,
            Screen::Login(_) => "Sign in",
            Screen::Platform(view) => view.page.title,
            Screen::Journey(view) => view.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_mount_state_has_greeting_only() {
        let mount = MountState::default();
        assert_eq!(mount.chat.messages().len(), 1);
        assert!(!mount.refreshing);
        assert_eq!(mount.revealed_lines, 0);
    }
}
