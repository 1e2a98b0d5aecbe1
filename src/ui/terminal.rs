//! Plain-text rendering of a screen for terminal output

use std::fmt::Write;

use crate::ui::journey::PhaseView;
use crate::ui::view::{PlatformView, Screen};

const RULE: &str = "------------------------------------------------------------";

/// Renders the screen as plain text
pub fn render_text(screen: &Screen) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_screen(&mut out, screen);
    out
}

fn write_screen(out: &mut String, screen: &Screen) -> std::fmt::Result {
    match screen {
        Screen::Welcome(view) => {
            writeln!(out, "{}\n{}\n{}", RULE, view.title, view.tagline)?;
            if let Some(name) = &view.signed_in_as {
                writeln!(out, "Signed in as {}", name)?;
            }
            for (key, label) in &view.options {
                writeln!(out, "  [start {}] {}", key, label)?;
            }
            Ok(())
        }
        Screen::Login(view) => {
            writeln!(out, "{}\nSign in to the platform", RULE)?;
            if let Some(error) = &view.error {
                writeln!(out, "! {}", error)?;
            }
            writeln!(out, "Demo accounts: {}", view.account_hints.join(", "))
        }
        Screen::Platform(view) => write_platform(out, view),
        Screen::Journey(view) => write_journey(out, view),
    }
}

fn write_platform(out: &mut String, view: &PlatformView) -> std::fmt::Result {
    writeln!(out, "{}\n{} ({})", RULE, view.user_name, view.role)?;

    let nav: Vec<String> = view
        .nav
        .iter()
        .map(|entry| {
            if entry.active {
                format!("*{}*", entry.key)
            } else {
                entry.key.to_string()
            }
        })
        .collect();
    writeln!(out, "Pages: {}", nav.join(" | "))?;

    let solutions: Vec<String> = view
        .solutions
        .iter()
        .map(|s| format!("{}{}", if s.enabled { "+" } else { "-" }, s.id))
        .collect();
    writeln!(out, "Solutions: {}", solutions.join(" "))?;

    let page = &view.page;
    writeln!(out, "{}\n{}\n{}", RULE, page.title, page.subtitle)?;
    if page.status.refreshing {
        writeln!(out, "(refreshing...)")?;
    } else if page.status.refresh_count > 0 {
        writeln!(out, "(refreshed {}x)", page.status.refresh_count)?;
    }
    if page.status.exporting {
        writeln!(out, "(exporting...)")?;
    }

    for section in &page.sections {
        match section.solution {
            Some(solution) => writeln!(out, "\n## {} [{}]", section.heading, solution)?,
            None => writeln!(out, "\n## {}", section.heading)?,
        }
        for row in &section.rows {
            writeln!(out, "  - {}", row)?;
        }
    }
    Ok(())
}

fn write_journey(out: &mut String, view: &PhaseView) -> std::fmt::Result {
    writeln!(out, "{}\nPhase {} of 6: {}", RULE, view.phase, view.title)?;
    writeln!(out, "{}", view.narrative)?;
    for highlight in view.highlights {
        writeln!(out, "  * {}", highlight)?;
    }
    writeln!(out)?;
    for line in &view.revealed {
        writeln!(out, "  {}: \"{}\"", line.speaker, line.text)?;
    }
    if !view.is_dialogue_complete() {
        writeln!(out, "  ...")?;
    }

    let mut controls = Vec::new();
    if view.can_go_back {
        controls.push("prev");
    }
    if view.can_go_forward {
        controls.push("next");
    }
    controls.push("home");
    writeln!(out, "[{}]", controls.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::navigation::Phase;
    use crate::ui::journey::{JourneyStage, build_phase};
    use crate::ui::view::{LoginView, WelcomeView};

    #[test]
    fn welcome_lists_both_modes() {
        let text = render_text(&Screen::Welcome(WelcomeView {
            title: "Title",
            tagline: "Tagline",
            options: [("platform", "Platform"), ("journey", "Journey")],
            signed_in_as: None,
        }));
        assert!(text.contains("[start platform]"));
        assert!(text.contains("[start journey]"));
    }

    #[test]
    fn login_shows_error() {
        let text = render_text(&Screen::Login(LoginView {
            account_hints: vec!["admin".to_string()],
            error: Some("No demo account named 'x'".to_string()),
        }));
        assert!(text.contains("! No demo account"));
        assert!(text.contains("Demo accounts: admin"));
    }

    #[test]
    fn journey_marks_incomplete_dialogue() {
        let view = build_phase(JourneyStage::Discovery, Phase::default(), 1);
        let text = render_text(&Screen::Journey(view));
        assert!(text.contains("Phase 1 of 6: Discovery"));
        assert!(text.contains("  ..."));
        assert!(text.contains("[next | home]"));
    }
}
