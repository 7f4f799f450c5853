use serde::{Deserialize, Serialize};

use crate::constants::{CONNECTION_LOST_MESSAGE, MALFORMED_PAYLOAD_MESSAGE};
use crate::flow::assessment::Assessment;
use crate::flow::controller::SessionTicket;
use crate::flow::cursor::Cursor;
use crate::flow::selection::TextSelection;

/// How the learner starts a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputMode {
    /// A topic; the generator writes the passage.
    #[default]
    Topic,
    /// A passage of the learner's own, with hand-picked target words.
    Text,
    /// A complete session payload, no generator involved.
    Forge,
}

/// Current screen of the flow. Each variant carries only the state that
/// screen needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle { error: Option<FlowFailure> },
    TextSelection(TextSelection),
    Generating { ticket: SessionTicket },
    ParagraphPreview,
    LearningSequence(Cursor),
    ParagraphReview { acknowledged: bool },
    FinalAssessment(Assessment),
    SessionComplete { score: usize, total: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseKind {
    Idle,
    TextSelection,
    Generating,
    ParagraphPreview,
    LearningSequence,
    ParagraphReview,
    FinalAssessment,
    SessionComplete,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Idle { .. } => PhaseKind::Idle,
            Self::TextSelection(_) => PhaseKind::TextSelection,
            Self::Generating { .. } => PhaseKind::Generating,
            Self::ParagraphPreview => PhaseKind::ParagraphPreview,
            Self::LearningSequence(_) => PhaseKind::LearningSequence,
            Self::ParagraphReview { .. } => PhaseKind::ParagraphReview,
            Self::FinalAssessment(_) => PhaseKind::FinalAssessment,
            Self::SessionComplete { .. } => PhaseKind::SessionComplete,
        }
    }
}

impl PhaseKind {
    /// Every edge the flow may take. Anything else is a bug or a stale
    /// request from the presentation layer.
    pub fn can_transition_to(self, next: PhaseKind) -> bool {
        use PhaseKind::*;
        matches!(
            (self, next),
            (Idle, TextSelection)
                | (Idle, Generating)
                | (Idle, ParagraphPreview)
                | (Idle, Idle)
                | (TextSelection, Idle)
                | (TextSelection, Generating)
                | (Generating, ParagraphPreview)
                | (Generating, Idle)
                | (ParagraphPreview, LearningSequence)
                | (LearningSequence, LearningSequence)
                | (LearningSequence, ParagraphPreview)
                | (LearningSequence, ParagraphReview)
                | (ParagraphReview, ParagraphReview)
                | (ParagraphReview, FinalAssessment)
                | (FinalAssessment, FinalAssessment)
                | (FinalAssessment, SessionComplete)
                | (SessionComplete, LearningSequence)
                | (SessionComplete, Idle)
        )
    }
}

/// Why the last attempt to start a session ended back at the input screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowFailure {
    MalformedPayload,
    ConnectionLost,
}

impl FlowFailure {
    pub fn for_mode(mode: InputMode) -> Self {
        match mode {
            InputMode::Forge => Self::MalformedPayload,
            InputMode::Topic | InputMode::Text => Self::ConnectionLost,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::MalformedPayload => MALFORMED_PAYLOAD_MESSAGE,
            Self::ConnectionLost => CONNECTION_LOST_MESSAGE,
        }
    }
}
