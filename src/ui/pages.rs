//! Platform page components
//!
//! Each page is a pure builder from props to a `PageView`. Sample figures are
//! hardcoded; sections tied to a solution only appear while it is enabled.

use crate::domain::matcher::{
    DOWNTIME_TEMPLATE, DashboardTemplate, ENERGY_TEMPLATE, OEE_TEMPLATE, QUALITY_TEMPLATE,
    TemplateKind,
};
use crate::domain::navigation::PageKey;
use crate::domain::solutions::{
    CATALOG, ENERGY_OPTIMIZATION, PREDICTIVE_MAINTENANCE, PRODUCTION_SCHEDULING, QUALITY_VISION,
    SolutionSet,
};
use crate::domain::user::User;
use crate::ui::chat::{Author, SUGGESTIONS};
use crate::ui::view::MountState;

/// Props handed to a page by the orchestrator
#[derive(Debug, Clone, Copy)]
pub struct PageProps<'a> {
    pub user: Option<&'a User>,
    pub enabled_solutions: &'a SolutionSet,
    pub mount: &'a MountState,
    /// Usernames listed on the user management page
    pub accounts: &'a [(String, String)],
}

/// Block of content on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub rows: Vec<String>,
    /// Solution that unlocked this section, if any
    pub solution: Option<&'static str>,
}

impl Section {
    fn new(heading: impl Into<String>, rows: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            heading: heading.into(),
            rows: rows.into_iter().map(Into::into).collect(),
            solution: None,
        }
    }

    fn unlocked_by(mut self, solution: &'static str) -> Self {
        self.solution = Some(solution);
        self
    }
}

/// Refresh/export indicators shared by all pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageStatus {
    pub refreshing: bool,
    pub refresh_count: u32,
    pub exporting: bool,
}

/// Rendered content of a platform page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub key: PageKey,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub sections: Vec<Section>,
    pub status: PageStatus,
}

impl PageView {
    /// CSV-style report of the page content, as produced by the export action
    pub fn to_report(&self) -> String {
        let mut report = format!("# {} report\nsection,item\n", self.title);
        for section in &self.sections {
            for row in &section.rows {
                report.push_str(&format!("{},{}\n", csv_field(&section.heading), csv_field(row)));
            }
        }
        report
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Builds the page for a resolved key
pub fn build_page(key: PageKey, props: &PageProps<'_>) -> PageView {
    let (title, subtitle, sections) = match key {
        PageKey::Overview => (
            "Plant Overview",
            "Key indicators across all lines",
            overview_sections(props),
        ),
        PageKey::Production => (
            "Live Production",
            "Line status and throughput, refreshed every shift",
            production_sections(props),
        ),
        PageKey::Maintenance => (
            "Maintenance",
            "Asset health and upcoming interventions",
            maintenance_sections(props),
        ),
        PageKey::Quality => (
            "Quality",
            "Defect rates and inspection results",
            quality_sections(props),
        ),
        PageKey::DashboardBuilder => (
            "AI Dashboard Builder",
            "Describe a dashboard in plain language",
            builder_sections(props),
        ),
        PageKey::Users => (
            "User Management",
            "Accounts and roles with platform access",
            users_sections(props),
        ),
    };

    PageView {
        key,
        title,
        subtitle,
        sections,
        status: PageStatus {
            refreshing: props.mount.refreshing,
            refresh_count: props.mount.refresh_count,
            exporting: props.mount.exporting,
        },
    }
}

fn overview_sections(props: &PageProps<'_>) -> Vec<Section> {
    let mut sections = vec![Section::new(
        "Key indicators",
        [
            "OEE: 78.4% (+2.1 pts vs last week)",
            "Throughput: 12,480 units/day",
            "Unplanned downtime: 3.2 h this week",
            "Energy intensity: 1.84 kWh/unit",
        ],
    )];

    let toggles = CATALOG.iter().map(|solution| {
        let state = if props.enabled_solutions.contains(solution.id) {
            "enabled"
        } else {
            "disabled"
        };
        format!("[{}] {} ({}): {}", state, solution.name, solution.id, solution.summary)
    });
    sections.push(Section::new("Solutions", toggles));

    if props.enabled_solutions.contains(ENERGY_OPTIMIZATION) {
        sections.push(
            Section::new(
                "Energy savings",
                ["Peak load shifted: 420 kW", "Projected monthly saving: $18,300"],
            )
            .unlocked_by(ENERGY_OPTIMIZATION),
        );
    }

    sections
}

fn production_sections(props: &PageProps<'_>) -> Vec<Section> {
    let mut sections = vec![Section::new(
        "Line status",
        [
            "Press Line 1: running, 412 units/h",
            "Press Line 2: running, 398 units/h",
            "Weld Cell A: changeover, back in 14 min",
            "Assembly Line 3: running, 256 units/h",
        ],
    )];

    if props.enabled_solutions.contains(PRODUCTION_SCHEDULING) {
        sections.push(
            Section::new(
                "Schedule optimizer",
                [
                    "Order #4471 moved to Line 1 to avoid planned repair on Line 2",
                    "Schedule adherence: 96%",
                ],
            )
            .unlocked_by(PRODUCTION_SCHEDULING),
        );
    }

    sections
}

fn maintenance_sections(props: &PageProps<'_>) -> Vec<Section> {
    let mut sections = vec![Section::new(
        "Asset health",
        [
            "Press 2 main drive: 71% health",
            "Compressor C-3: 88% health",
            "Weld robot R-7: 93% health",
            "Conveyor CV-12: 64% health",
        ],
    )];

    if props.enabled_solutions.contains(PREDICTIVE_MAINTENANCE) {
        sections.push(
            Section::new(
                "AI failure predictions",
                [
                    "Conveyor CV-12 gearbox: failure likely in 6 days (87% confidence)",
                    "Press 2 main bearing: wear trend rising, inspect within 12 days",
                ],
            )
            .unlocked_by(PREDICTIVE_MAINTENANCE),
        );
    }

    sections
}

fn quality_sections(props: &PageProps<'_>) -> Vec<Section> {
    let mut sections = vec![Section::new(
        "Defect rates",
        [
            "First pass yield: 97.1%",
            "Surface scratches: 0.9%",
            "Dimensional out-of-tolerance: 0.6%",
            "Weld porosity: 0.4%",
        ],
    )];

    if props.enabled_solutions.contains(QUALITY_VISION) {
        sections.push(
            Section::new(
                "Vision inspection",
                [
                    "Parts inspected today: 48,210",
                    "Auto-rejected: 212 (die crack pattern on Press 1)",
                ],
            )
            .unlocked_by(QUALITY_VISION),
        );
    }

    sections
}

fn template_for(kind: TemplateKind) -> &'static DashboardTemplate {
    match kind {
        TemplateKind::Oee => &OEE_TEMPLATE,
        TemplateKind::Downtime => &DOWNTIME_TEMPLATE,
        TemplateKind::Energy => &ENERGY_TEMPLATE,
        TemplateKind::Quality => &QUALITY_TEMPLATE,
    }
}

fn builder_sections(props: &PageProps<'_>) -> Vec<Section> {
    let chat = &props.mount.chat;
    let mut transcript: Vec<String> = chat
        .messages()
        .iter()
        .map(|message| {
            let who = match message.author {
                Author::User => "You",
                Author::Assistant => "Assistant",
            };
            format!("{}: {}", who, message.text)
        })
        .collect();
    if chat.is_thinking() {
        transcript.push("Assistant is thinking...".to_string());
    }

    let mut sections = vec![Section::new("Conversation", transcript)];

    if let Some(kind) = chat.latest_template() {
        let template = template_for(kind);
        sections.push(Section::new(
            format!("Dashboard: {}", template.title),
            template
                .widgets
                .iter()
                .map(|w| format!("{} ({})", w.title, w.kind.label())),
        ));
    } else {
        sections.push(Section::new("Try asking", SUGGESTIONS));
    }

    sections
}

fn users_sections(props: &PageProps<'_>) -> Vec<Section> {
    let rows = props
        .accounts
        .iter()
        .map(|(username, role)| format!("{} ({})", username, role));
    vec![Section::new("Accounts", rows)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_for(key: PageKey, enabled: &SolutionSet) -> PageView {
        let mount = MountState::default();
        let props = PageProps {
            user: None,
            enabled_solutions: enabled,
            mount: &mount,
            accounts: &[],
        };
        build_page(key, &props)
    }

    fn headings(view: &PageView) -> Vec<&str> {
        view.sections.iter().map(|s| s.heading.as_str()).collect()
    }

    #[test]
    fn predictions_only_with_predictive_maintenance() {
        let without = view_for(PageKey::Maintenance, &SolutionSet::new());
        assert!(!headings(&without).contains(&"AI failure predictions"));

        let enabled: SolutionSet = [PREDICTIVE_MAINTENANCE].into_iter().collect();
        let with = view_for(PageKey::Maintenance, &enabled);
        let section = with.sections.last().unwrap();
        assert_eq!(section.heading, "AI failure predictions");
        assert_eq!(section.solution, Some(PREDICTIVE_MAINTENANCE));
    }

    #[test]
    fn vision_section_follows_quality_vision() {
        let enabled: SolutionSet = [QUALITY_VISION].into_iter().collect();
        assert!(headings(&view_for(PageKey::Quality, &enabled)).contains(&"Vision inspection"));
        assert!(!headings(&view_for(PageKey::Quality, &SolutionSet::new())).contains(&"Vision inspection"));
    }

    #[test]
    fn overview_lists_every_solution_with_state() {
        let enabled: SolutionSet = [ENERGY_OPTIMIZATION].into_iter().collect();
        let view = view_for(PageKey::Overview, &enabled);
        let toggles = &view.sections[1];
        assert_eq!(toggles.rows.len(), CATALOG.len());
        assert!(toggles.rows.iter().any(|r| r.starts_with("[enabled] Energy Optimization")));
        assert!(headings(&view).contains(&"Energy savings"));
    }

    #[test]
    fn builder_shows_suggestions_before_first_dashboard() {
        let view = view_for(PageKey::DashboardBuilder, &SolutionSet::new());
        assert_eq!(headings(&view), vec!["Conversation", "Try asking"]);
    }

    #[test]
    fn report_is_csv_with_escaping() {
        let view = view_for(PageKey::Production, &SolutionSet::new());
        let report = view.to_report();
        assert!(report.starts_with("# Live Production report\nsection,item\n"));
        assert!(report.contains("Line status,\"Press Line 1: running, 412 units/h\""));
    }
}
