//! Keyword matching for the AI dashboard builder
//!
//! Free text is compared case-insensitively against ordered keyword groups.
//! The first group with any keyword contained in the text selects its canned
//! dashboard template. There is no ranking and no multi-match handling.

/// Reply used when no keyword group matches
pub const CLARIFICATION_MESSAGE: &str = "I can build dashboards for OEE, downtime, energy consumption or quality. \
     Could you tell me which of these you would like to explore?";

/// Kind of widget placed on a generated dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Kpi,
    LineChart,
    BarChart,
    Gauge,
    Table,
    Heatmap,
}

impl WidgetKind {
    pub fn label(&self) -> &'static str {
        match self {
            WidgetKind::Kpi => "KPI",
            WidgetKind::LineChart => "line chart",
            WidgetKind::BarChart => "bar chart",
            WidgetKind::Gauge => "gauge",
            WidgetKind::Table => "table",
            WidgetKind::Heatmap => "heatmap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Widget {
    pub title: &'static str,
    pub kind: WidgetKind,
}

/// Identifies one of the four canned templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Oee,
    Downtime,
    Energy,
    Quality,
}

/// A canned dashboard returned by the matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardTemplate {
    pub kind: TemplateKind,
    pub title: &'static str,
    pub description: &'static str,
    pub widgets: &'static [Widget],
}

pub const OEE_TEMPLATE: DashboardTemplate = DashboardTemplate {
    kind: TemplateKind::Oee,
    title: "OEE Performance",
    description: "Availability, performance and quality rolled up per line and shift",
    widgets: &[
        Widget { title: "Plant OEE", kind: WidgetKind::Gauge },
        Widget { title: "OEE by line", kind: WidgetKind::BarChart },
        Widget { title: "OEE trend (30 days)", kind: WidgetKind::LineChart },
        Widget { title: "Top losses", kind: WidgetKind::Table },
    ],
};

pub const DOWNTIME_TEMPLATE: DashboardTemplate = DashboardTemplate {
    kind: TemplateKind::Downtime,
    title: "Downtime Analysis",
    description: "Unplanned stops, their causes and predicted failures",
    widgets: &[
        Widget { title: "Downtime hours", kind: WidgetKind::Kpi },
        Widget { title: "Stops by cause", kind: WidgetKind::BarChart },
        Widget { title: "MTBF / MTTR trend", kind: WidgetKind::LineChart },
        Widget { title: "At-risk assets", kind: WidgetKind::Table },
    ],
};

pub const ENERGY_TEMPLATE: DashboardTemplate = DashboardTemplate {
    kind: TemplateKind::Energy,
    title: "Energy Consumption",
    description: "Consumption per line against tariff windows and production volume",
    widgets: &[
        Widget { title: "kWh per unit", kind: WidgetKind::Kpi },
        Widget { title: "Hourly load profile", kind: WidgetKind::LineChart },
        Widget { title: "Consumption by area", kind: WidgetKind::Heatmap },
        Widget { title: "Peak demand", kind: WidgetKind::Gauge },
    ],
};

pub const QUALITY_TEMPLATE: DashboardTemplate = DashboardTemplate {
    kind: TemplateKind::Quality,
    title: "Quality Control",
    description: "First pass yield, defect Pareto and inspection results",
    widgets: &[
        Widget { title: "First pass yield", kind: WidgetKind::Kpi },
        Widget { title: "Defect Pareto", kind: WidgetKind::BarChart },
        Widget { title: "Defect rate by shift", kind: WidgetKind::LineChart },
        Widget { title: "Recent rejects", kind: WidgetKind::Table },
    ],
};

/// Result of matching a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Template(&'static DashboardTemplate),
    Clarification,
}

impl MatchOutcome {
    /// Assistant reply text for this outcome
    pub fn reply_text(&self) -> String {
        match self {
            MatchOutcome::Template(template) => format!(
                "Here is a {} dashboard: {}.",
                template.title, template.description
            ),
            MatchOutcome::Clarification => CLARIFICATION_MESSAGE.to_string(),
        }
    }

    pub fn template(&self) -> Option<&'static DashboardTemplate> {
        match self {
            MatchOutcome::Template(template) => Some(template),
            MatchOutcome::Clarification => None,
        }
    }
}

#[derive(Debug, Clone)]
struct KeywordGroup {
    keywords: &'static [&'static str],
    template: &'static DashboardTemplate,
}

/// First-match keyword lookup over a fixed list of groups
#[derive(Debug, Clone)]
pub struct DashboardMatcher {
    groups: Vec<KeywordGroup>,
}

impl DashboardMatcher {
    /// Creates the matcher with the four built-in keyword groups, in priority order
    pub fn new() -> Self {
        Self {
            groups: vec![
                KeywordGroup { keywords: &["oee"], template: &OEE_TEMPLATE },
                KeywordGroup { keywords: &["downtime", "failure"], template: &DOWNTIME_TEMPLATE },
                KeywordGroup { keywords: &["energy", "consumption"], template: &ENERGY_TEMPLATE },
                KeywordGroup { keywords: &["quality", "defect"], template: &QUALITY_TEMPLATE },
            ],
        }
    }

    /// Matches free text against the keyword groups
    ///
    /// # Arguments
    /// * `input` - User prompt, any casing
    ///
    /// # Returns
    /// The template of the first matching group, or `Clarification`
    pub fn match_prompt(&self, input: &str) -> MatchOutcome {
        let lowered = input.to_lowercase();
        self.groups
            .iter()
            .find(|group| group.keywords.iter().any(|kw| lowered.contains(kw)))
            .map(|group| MatchOutcome::Template(group.template))
            .unwrap_or(MatchOutcome::Clarification)
    }
}

impl Default for DashboardMatcher {
    fn default() -> Self {
        Self::new()
    }
}
