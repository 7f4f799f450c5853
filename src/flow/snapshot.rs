use serde::Serialize;
use uuid::Uuid;

use crate::flow::assessment::QuestionView;
use crate::flow::controller::{FlowController, SessionTicket};
use crate::flow::pages::PageView;
use crate::flow::paragraph::{segments, Segment};
use crate::flow::phase::{InputMode, Phase, PhaseKind};
use crate::flow::selection::Token;

const PREVIEW_ACCENT: &str = "#00F0FF";
const REVIEW_ACCENT: &str = "#FFD700";

/// Everything the presentation layer needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSnapshot {
    pub phase: PhaseKind,
    pub mode: InputMode,
    pub ticket: SessionTicket,
    pub session_id: Option<Uuid>,
    pub input: String,
    pub error: Option<String>,
    pub topic: Option<String>,
    pub word_count: usize,
    pub mood_color: String,
    pub images_ready: usize,
    pub view: ScreenView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "camelCase")]
pub enum ScreenView {
    Idle,
    #[serde(rename_all = "camelCase")]
    TextSelection {
        text: String,
        locked: bool,
        tokens: Vec<Token>,
        selected: Vec<String>,
    },
    Generating,
    #[serde(rename_all = "camelCase")]
    Paragraph {
        review: bool,
        acknowledged: bool,
        accent_color: &'static str,
        segments: Vec<Segment>,
    },
    Learning(PageView),
    Assessment(QuestionView),
    #[serde(rename_all = "camelCase")]
    Complete { score: usize, total: usize },
}

impl FlowController {
    pub fn snapshot(&self) -> FlowSnapshot {
        let session = self.session();
        FlowSnapshot {
            phase: self.phase_kind(),
            mode: self.mode(),
            ticket: self.ticket(),
            session_id: self.session_id(),
            input: self.input().to_string(),
            error: self.last_error().map(|f| f.message().to_string()),
            topic: session.map(|s| s.topic.clone()),
            word_count: session.map_or(0, |s| s.len()),
            mood_color: self.mood_color(),
            images_ready: self.images().len(),
            view: self.screen(),
        }
    }

    fn screen(&self) -> ScreenView {
        let session = self.session();
        match self.phase() {
            Phase::Idle { .. } => ScreenView::Idle,
            Phase::TextSelection(sel) => ScreenView::TextSelection {
                text: sel.text().to_string(),
                locked: sel.is_locked(),
                tokens: sel.tokens(),
                selected: sel.selected().to_vec(),
            },
            Phase::Generating { .. } => ScreenView::Generating,
            Phase::ParagraphPreview => ScreenView::Paragraph {
                review: false,
                acknowledged: false,
                accent_color: PREVIEW_ACCENT,
                segments: session
                    .map(|s| segments(&s.full_text, &s.words))
                    .unwrap_or_default(),
            },
            Phase::ParagraphReview { acknowledged } => ScreenView::Paragraph {
                review: true,
                acknowledged: *acknowledged,
                accent_color: REVIEW_ACCENT,
                segments: session
                    .map(|s| segments(&s.full_text, &s.words))
                    .unwrap_or_default(),
            },
            Phase::LearningSequence(cursor) => session
                .and_then(|s| {
                    let entry = s.word(cursor.word_index)?;
                    let image = self.images().get(cursor.word_index);
                    PageView::build(entry, *cursor, s.len(), image)
                })
                .map_or(ScreenView::Idle, ScreenView::Learning),
            Phase::FinalAssessment(assessment) => session
                .and_then(|s| assessment.view(s))
                .map_or(ScreenView::Idle, ScreenView::Assessment),
            Phase::SessionComplete { score, total } => ScreenView::Complete {
                score: *score,
                total: *total,
            },
        }
    }

    /// Fraction of the learning sequence reached, or `None` outside it.
    pub fn progress(&self) -> Option<f64> {
        let count = self.session().map_or(0, |s| s.len());
        self.cursor().map(|c| c.progress(count))
    }
}
