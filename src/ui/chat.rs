//! Transcript of the AI dashboard builder conversation

use crate::domain::matcher::{MatchOutcome, TemplateKind};

pub const GREETING: &str = "Hi! Describe the dashboard you need and I'll assemble it from live plant data.";

pub const SUGGESTIONS: [&str; 4] = [
    "Show me OEE by line",
    "Show me downtime analysis",
    "Track energy consumption per shift",
    "Which defects are trending?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
    /// Template attached to an assistant reply
    pub template: Option<TemplateKind>,
}

/// Messages exchanged on the dashboard builder page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    thinking: bool,
}

impl ChatTranscript {
    /// Starts a transcript with the assistant greeting
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                author: Author::Assistant,
                text: GREETING.to_string(),
                template: None,
            }],
            thinking: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a reply is being "prepared"
    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    /// Appends the user's prompt and marks the assistant as thinking
    pub fn push_prompt(&mut self, prompt: &str) {
        self.messages.push(ChatMessage {
            author: Author::User,
            text: prompt.to_string(),
            template: None,
        });
        self.thinking = true;
    }

    /// Appends the assistant reply for a match outcome
    pub fn push_reply(&mut self, outcome: &MatchOutcome) {
        self.messages.push(ChatMessage {
            author: Author::Assistant,
            text: outcome.reply_text(),
            template: outcome.template().map(|t| t.kind),
        });
        self.thinking = false;
    }

    /// Kind of the most recently generated dashboard
    pub fn latest_template(&self) -> Option<TemplateKind> {
        self.messages.iter().rev().find_map(|m| m.template)
    }
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}
