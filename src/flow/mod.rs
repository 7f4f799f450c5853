//! Session flow: the phase machine that walks a learner through one
//! generated session, and the screen state each phase carries.

pub mod assessment;
pub mod controller;
pub mod cursor;
pub mod events;
pub mod pages;
pub mod paragraph;
pub mod phase;
pub mod selection;
pub mod snapshot;

pub use controller::{Completion, FlowController, GenerationRequest, ImageJob, SessionTicket, Submitted};
pub use cursor::Cursor;
pub use phase::{FlowFailure, InputMode, Phase, PhaseKind};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("input must not be empty")]
    EmptyInput,
    #[error("'{action}' is not allowed during {phase:?}")]
    InvalidTransition {
        phase: PhaseKind,
        action: &'static str,
    },
    #[error("select at least one word")]
    SelectionEmpty,
    #[error("text is locked; unlock it to edit")]
    SelectionLocked,
    #[error("lock the text before selecting words")]
    SelectionUnlocked,
    #[error("this question has already been answered")]
    AlreadyAnswered,
    #[error("answer the current question first")]
    NotAnswered,
    #[error("'{0}' is not one of the options")]
    UnknownOption(String),
    #[error("page {0} is out of range")]
    PageOutOfRange(usize),
    #[error("no session is loaded")]
    NoSession,
}
