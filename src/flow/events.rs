use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::audio::SoundCue;
use crate::flow::controller::SessionTicket;
use crate::flow::phase::PhaseKind;

/// Notifications pushed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FlowEvent {
    #[serde(rename_all = "camelCase")]
    Phase {
        phase: PhaseKind,
        ticket: SessionTicket,
        at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Mood { color: String },
    #[serde(rename_all = "camelCase")]
    Sound { cue: SoundCue },
    #[serde(rename_all = "camelCase")]
    Image { ticket: SessionTicket, index: usize },
}

impl FlowEvent {
    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Phase { .. } => "phase",
            Self::Mood { .. } => "mood",
            Self::Sound { .. } => "sound",
            Self::Image { .. } => "image",
        }
    }
}
