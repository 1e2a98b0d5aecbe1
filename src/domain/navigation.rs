//! Navigation primitives: screen modes, platform page keys and journey phases
//!
//! Everything here is pure data. Transitions between values live in
//! `app::state`, lookups from keys to content live in `ui::router`.

use std::fmt;

/// Top-level screen selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Landing screen offering both navigation modes
    #[default]
    Welcome,
    /// Authentication gate in front of the platform tour
    Login,
    /// Feature tour, requires a signed-in user
    Platform,
    /// Scripted customer journey narrative
    Journey,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Welcome => "welcome",
            Mode::Login => "login",
            Mode::Platform => "platform",
            Mode::Journey => "journey",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Targets offered by the welcome screen
///
/// Only these two values can be selected; anything else is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTarget {
    Platform,
    Journey,
}

/// Keys of the six platform pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageKey {
    Overview,
    Production,
    Maintenance,
    Quality,
    DashboardBuilder,
    Users,
}

impl PageKey {
    /// Page shown whenever a requested key cannot be honoured
    pub const DEFAULT: PageKey = PageKey::Overview;

    /// Pages in navigation order
    pub const ALL: [PageKey; 6] = [
        PageKey::Overview,
        PageKey::Production,
        PageKey::Maintenance,
        PageKey::Quality,
        PageKey::DashboardBuilder,
        PageKey::Users,
    ];

    /// Routing key as stored in the session
    pub fn as_str(&self) -> &'static str {
        match self {
            PageKey::Overview => "overview",
            PageKey::Production => "production",
            PageKey::Maintenance => "maintenance",
            PageKey::Quality => "quality",
            PageKey::DashboardBuilder => "dashboard-builder",
            PageKey::Users => "users",
        }
    }

    /// Human readable navigation label
    pub fn label(&self) -> &'static str {
        match self {
            PageKey::Overview => "Overview",
            PageKey::Production => "Production",
            PageKey::Maintenance => "Maintenance",
            PageKey::Quality => "Quality",
            PageKey::DashboardBuilder => "AI Dashboard Builder",
            PageKey::Users => "User Management",
        }
    }

    /// Whether the page is restricted to administrators
    pub fn requires_admin(&self) -> bool {
        matches!(self, PageKey::Users)
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer journey phase, always within `[Phase::FIRST, Phase::LAST]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Phase(u8);

impl Phase {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 6;

    /// Builds a phase from any integer, clamping into the valid range
    ///
    /// # Arguments
    /// * `value` - Requested phase number, possibly out of range
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::FIRST), i64::from(Self::LAST));
        // In range after the clamp above.
        Self(clamped as u8)
    }

    /// Returns the phase number
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Next phase, saturating at the last one
    pub fn next(&self) -> Self {
        Self::clamped(i64::from(self.0) + 1)
    }

    /// Previous phase, saturating at the first one
    pub fn previous(&self) -> Self {
        Self::clamped(i64::from(self.0) - 1)
    }

    pub fn is_first(&self) -> bool {
        self.0 == Self::FIRST
    }

    pub fn is_last(&self) -> bool {
        self.0 == Self::LAST
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self(Self::FIRST)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_clamps_out_of_range_values() {
        assert_eq!(Phase::clamped(0).get(), 1);
        assert_eq!(Phase::clamped(7).get(), 6);
        assert_eq!(Phase::clamped(-40).get(), 1);
        assert_eq!(Phase::clamped(i64::MAX).get(), 6);
        assert_eq!(Phase::clamped(4).get(), 4);
    }

    #[test]
    fn phase_stepping_saturates() {
        let last = Phase::clamped(6);
        assert!(last.is_last());
        assert_eq!(last.next(), last);

        let first = Phase::default();
        assert!(first.is_first());
        assert_eq!(first.previous(), first);
        assert_eq!(first.next().get(), 2);
    }

    #[test]
    fn only_user_management_requires_admin() {
        let restricted: Vec<_> = PageKey::ALL.iter().filter(|k| k.requires_admin()).collect();
        assert_eq!(restricted, vec![&PageKey::Users]);
    }

    #[test]
    fn default_mode_is_welcome() {
        assert_eq!(Mode::default(), Mode::Welcome);
        assert_eq!(Mode::Journey.to_string(), "journey");
    }
}
