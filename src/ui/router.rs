//! Key-to-component lookups for platform pages and journey phases
//!
//! Both routers are explicit tables with a fallback entry. Unknown input
//! never produces an error, only the fallback.

use tracing::debug;

use crate::domain::navigation::{PageKey, Phase};
use crate::domain::user::User;
use crate::ui::journey::JourneyStage;

/// Maps a page key string to a platform page
#[derive(Debug, Clone)]
pub struct PlatformRouter {
    routes: Vec<(&'static str, PageKey)>,
    fallback: PageKey,
}

impl PlatformRouter {
    pub fn new() -> Self {
        Self {
            routes: PageKey::ALL.iter().map(|key| (key.as_str(), *key)).collect(),
            fallback: PageKey::DEFAULT,
        }
    }

    /// Resolves a page key for the given user
    ///
    /// # Arguments
    /// * `key` - Requested page key, matched exactly
    /// * `user` - Signed-in user, consulted for admin-only pages
    ///
    /// # Returns
    /// The matching page; the fallback for unknown keys and for admin-only
    /// pages requested by anyone but an admin.
    pub fn resolve(&self, key: &str, user: Option<&User>) -> PageKey {
        let Some(page) = self.lookup(key) else {
            debug!(key, fallback = %self.fallback, "unknown page key");
            return self.fallback;
        };

        if page.requires_admin() && !user.is_some_and(User::is_admin) {
            debug!(key, fallback = %self.fallback, "admin page requested without admin role");
            return self.fallback;
        }

        page
    }

    fn lookup(&self, key: &str) -> Option<PageKey> {
        self.routes
            .iter()
            .find(|(route, _)| *route == key)
            .map(|(_, page)| *page)
    }
}

impl Default for PlatformRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a phase number to a journey stage
#[derive(Debug, Clone)]
pub struct JourneyRouter {
    stages: [(u8, JourneyStage); 6],
    fallback: JourneyStage,
}

impl JourneyRouter {
    pub fn new() -> Self {
        Self {
            stages: [
                (1, JourneyStage::Discovery),
                (2, JourneyStage::Assessment),
                (3, JourneyStage::Pilot),
                (4, JourneyStage::Integration),
                (5, JourneyStage::Scale),
                (6, JourneyStage::Results),
            ],
            fallback: JourneyStage::Discovery,
        }
    }

    /// Resolves a phase number, falling back to the first stage when out of range
    pub fn resolve(&self, phase: i64) -> JourneyStage {
        self.stages
            .iter()
            .find(|(number, _)| i64::from(*number) == phase)
            .map(|(_, stage)| *stage)
            .unwrap_or_else(|| {
                debug!(phase, "phase out of range, using first stage");
                self.fallback
            })
    }

    pub fn resolve_phase(&self, phase: Phase) -> JourneyStage {
        self.resolve(i64::from(phase.get()))
    }
}

impl Default for JourneyRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::solutions::SolutionSet;
    use crate::domain::user::Role;

    fn user(role: Role) -> User {
        User::new("A", role, SolutionSet::new())
    }

    #[test]
    fn known_keys_resolve_to_their_page() {
        let router = PlatformRouter::new();
        for key in PageKey::ALL.iter().filter(|k| !k.requires_admin()) {
            assert_eq!(router.resolve(key.as_str(), None), *key);
        }
    }

    #[test]
    fn unknown_keys_resolve_to_overview() {
        let router = PlatformRouter::new();
        let admin = user(Role::Admin);
        for key in ["", "Overview", "settings", "users ", "../users", "dashboard_builder"] {
            assert_eq!(router.resolve(key, Some(&admin)), PageKey::Overview, "key {:?}", key);
        }
    }

    #[test]
    fn users_page_requires_admin() {
        let router = PlatformRouter::new();
        assert_eq!(router.resolve("users", Some(&user(Role::Viewer))), PageKey::Overview);
        assert_eq!(router.resolve("users", Some(&user(Role::Manager))), PageKey::Overview);
        assert_eq!(router.resolve("users", None), PageKey::Overview);
        assert_eq!(router.resolve("users", Some(&user(Role::Admin))), PageKey::Users);
    }

    #[test]
    fn phases_map_to_stages_in_order() {
        let router = JourneyRouter::new();
        for (index, stage) in JourneyStage::ALL.iter().enumerate() {
            assert_eq!(router.resolve(index as i64 + 1), *stage);
        }
    }

    #[test]
    fn out_of_range_phase_falls_back_to_first_stage() {
        let router = JourneyRouter::new();
        for phase in [0, 7, -1, 100] {
            assert_eq!(router.resolve(phase), JourneyStage::Discovery);
        }
    }
}
