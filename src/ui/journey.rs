//! Customer journey phase components
//!
//! Six fixed stages of the scripted sales narrative. Each stage has a short
//! narrative and dialogue lines that are revealed one at a time while the
//! phase is mounted.

use crate::domain::navigation::Phase;

/// One scripted line of dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueLine {
    pub speaker: &'static str,
    pub text: &'static str,
}

/// Stage of the customer journey, one per phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JourneyStage {
    Discovery,
    Assessment,
    Pilot,
    Integration,
    Scale,
    Results,
}

impl JourneyStage {
    /// Stages in phase order
    pub const ALL: [JourneyStage; 6] = [
        JourneyStage::Discovery,
        JourneyStage::Assessment,
        JourneyStage::Pilot,
        JourneyStage::Integration,
        JourneyStage::Scale,
        JourneyStage::Results,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            JourneyStage::Discovery => "Discovery",
            JourneyStage::Assessment => "Data Assessment",
            JourneyStage::Pilot => "Pilot Line",
            JourneyStage::Integration => "Systems Integration",
            JourneyStage::Scale => "Plant-wide Scale-out",
            JourneyStage::Results => "Results",
        }
    }

    pub fn narrative(&self) -> &'static str {
        match self {
            JourneyStage::Discovery => {
                "A mid-size automotive supplier is losing margin to unplanned stops on its stamping lines."
            }
            JourneyStage::Assessment => {
                "Historian, MES and maintenance logs are connected to measure where time is really lost."
            }
            JourneyStage::Pilot => {
                "Predictive maintenance goes live on Press Line 2 with vibration and thermal sensors."
            }
            JourneyStage::Integration => {
                "Alerts flow into the CMMS and the scheduler re-sequences orders around planned repairs."
            }
            JourneyStage::Scale => {
                "The model is rolled out to all four lines and quality vision is added at end of line."
            }
            JourneyStage::Results => {
                "Twelve months in, the plant reports fewer stops, higher OEE and a lower energy bill."
            }
        }
    }

    pub fn highlights(&self) -> &'static [&'static str] {
        match self {
            JourneyStage::Discovery => &["14% unplanned downtime", "OEE at 61%", "Reactive maintenance culture"],
            JourneyStage::Assessment => &["3 data sources connected", "18 months of history", "Top 5 loss drivers identified"],
            JourneyStage::Pilot => &["42 sensors installed", "First failure predicted 9 days ahead", "Zero unplanned stops on Line 2"],
            JourneyStage::Integration => &["CMMS work orders automated", "Schedule adherence 96%", "Spare parts pre-staged"],
            JourneyStage::Scale => &["4 lines monitored", "Vision inspection at 120 parts/min", "Energy peaks shifted"],
            JourneyStage::Results => &["Downtime -38%", "OEE 61% to 78%", "Payback in 7 months"],
        }
    }

    pub fn dialogue(&self) -> &'static [DialogueLine] {
        match self {
            JourneyStage::Discovery => &[
                DialogueLine {
                    speaker: "Plant Manager",
                    text: "We lost eleven shifts last quarter to press failures nobody saw coming.",
                },
                DialogueLine {
                    speaker: "Solutions Lead",
                    text: "What does a single hour of stoppage cost you on those lines?",
                },
                DialogueLine {
                    speaker: "Plant Manager",
                    text: "Around eighteen thousand, before overtime to catch up.",
                },
                DialogueLine {
                    speaker: "Solutions Lead",
                    text: "Then let's start by measuring exactly where that time goes.",
                },
            ],
            JourneyStage::Assessment => &[
                DialogueLine {
                    speaker: "Data Engineer",
                    text: "The historian has vibration data, but it was never linked to work orders.",
                },
                DialogueLine {
                    speaker: "Solutions Lead",
                    text: "Once it is, the failure signatures become visible.",
                },
                DialogueLine {
                    speaker: "Data Engineer",
                    text: "Bearing wear on Press 2 shows up almost two weeks before a stop.",
                },
            ],
            JourneyStage::Pilot => &[
                DialogueLine {
                    speaker: "Maintenance Lead",
                    text: "The model flagged the main drive bearing on Tuesday.",
                },
                DialogueLine {
                    speaker: "Solutions Lead",
                    text: "And the inspection confirmed it?",
                },
                DialogueLine {
                    speaker: "Maintenance Lead",
                    text: "Yes. We swapped it during the weekend changeover instead of mid-shift.",
                },
            ],
            JourneyStage::Integration => &[
                DialogueLine {
                    speaker: "Planner",
                    text: "Work orders now open themselves with the right parts attached.",
                },
                DialogueLine {
                    speaker: "Solutions Lead",
                    text: "The scheduler already moved Thursday's rush order off Line 2.",
                },
                DialogueLine {
                    speaker: "Planner",
                    text: "That used to take me half a day on the phone.",
                },
            ],
            JourneyStage::Scale => &[
                DialogueLine {
                    speaker: "Quality Manager",
                    text: "Vision inspection caught a die crack our sampling would have missed.",
                },
                DialogueLine {
                    speaker: "Energy Lead",
                    text: "Shifting compressor load saved us the peak tariff three days this week.",
                },
                DialogueLine {
                    speaker: "Plant Manager",
                    text: "Every line is on the same dashboard now.",
                },
            ],
            JourneyStage::Results => &[
                DialogueLine {
                    speaker: "CFO",
                    text: "The numbers held up through the audit.",
                },
                DialogueLine {
                    speaker: "Plant Manager",
                    text: "Downtime is down by more than a third.",
                },
                DialogueLine {
                    speaker: "Solutions Lead",
                    text: "And the next plant is already asking for the same roll-out.",
                },
            ],
        }
    }
}

/// Rendered content of the mounted journey phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseView {
    pub phase: Phase,
    pub stage: JourneyStage,
    pub title: &'static str,
    pub narrative: &'static str,
    pub highlights: &'static [&'static str],
    /// Dialogue revealed so far
    pub revealed: Vec<DialogueLine>,
    pub total_lines: usize,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

impl PhaseView {
    pub fn is_dialogue_complete(&self) -> bool {
        self.revealed.len() >= self.total_lines
    }
}

/// Builds the view for a stage
///
/// # Arguments
/// * `stage` - Stage resolved by the journey router
/// * `phase` - Current phase, used for the back/forward controls
/// * `revealed_lines` - How many dialogue lines are visible
pub fn build_phase(stage: JourneyStage, phase: Phase, revealed_lines: usize) -> PhaseView {
    let dialogue = stage.dialogue();
    let shown = revealed_lines.min(dialogue.len());
    PhaseView {
        phase,
        stage,
        title: stage.title(),
        narrative: stage.narrative(),
        highlights: stage.highlights(),
        revealed: dialogue[..shown].to_vec(),
        total_lines: dialogue.len(),
        can_go_back: !phase.is_first(),
        can_go_forward: !phase.is_last(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stage_has_dialogue() {
        for stage in JourneyStage::ALL {
            assert!(!stage.dialogue().is_empty(), "{:?} has no dialogue", stage);
            assert!(!stage.highlights().is_empty());
        }
    }

    #[test]
    fn revealed_lines_are_capped() {
        let view = build_phase(JourneyStage::Pilot, Phase::clamped(3), 99);
        assert_eq!(view.revealed.len(), view.total_lines);
        assert!(view.is_dialogue_complete());
    }

    #[test]
    fn navigation_controls_follow_phase_bounds() {
        let first = build_phase(JourneyStage::Discovery, Phase::clamped(1), 1);
        assert!(!first.can_go_back);
        assert!(first.can_go_forward);

        let last = build_phase(JourneyStage::Results, Phase::clamped(6), 1);
        assert!(last.can_go_back);
        assert!(!last.can_go_forward);
    }
}
