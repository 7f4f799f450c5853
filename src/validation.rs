//! Input and session validation shared by the flow controller, the manual
//! payload path and the generation client.

use crate::constants::{
    GLOW_SPREAD_MAX, GLOW_SPREAD_MIN, MAX_NATIVE_CONTEXTS, MIN_NATIVE_CONTEXTS, QUIZ_OPTION_COUNT,
};
use crate::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("payload is not a valid session: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid session field {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl SessionError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Returns the trimmed submission, or `None` when there is nothing to submit.
pub fn non_blank(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Checks the invariants every session must hold before the controller
/// accepts it. Mood colors are already checked by their type during parsing.
pub fn validate_session(session: &Session) -> Result<(), SessionError> {
    if session.words.is_empty() {
        return Err(SessionError::invalid("words", "at least one word is required"));
    }

    for (i, word) in session.words.iter().enumerate() {
        let path = |field: &str| format!("words[{i}].{field}");

        if word.word.trim().is_empty() {
            return Err(SessionError::invalid(path("word"), "must not be empty"));
        }
        if word.definition.trim().is_empty() {
            return Err(SessionError::invalid(path("definition"), "must not be empty"));
        }

        if let Some(intensity) = word.glow_intensity {
            if !(0.0..=1.0).contains(&intensity) {
                return Err(SessionError::invalid(
                    path("glowIntensity"),
                    format!("{intensity} is outside 0.0..=1.0"),
                ));
            }
        }
        if let Some(spread) = word.glow_spread {
            if !(GLOW_SPREAD_MIN..=GLOW_SPREAD_MAX).contains(&spread) {
                return Err(SessionError::invalid(
                    path("glowSpread"),
                    format!("{spread} is outside {GLOW_SPREAD_MIN}..={GLOW_SPREAD_MAX}"),
                ));
            }
        }

        let contexts = word.native_contexts.len();
        if !(MIN_NATIVE_CONTEXTS..=MAX_NATIVE_CONTEXTS).contains(&contexts) {
            return Err(SessionError::invalid(
                path("nativeContexts"),
                format!(
                    "expected {MIN_NATIVE_CONTEXTS}-{MAX_NATIVE_CONTEXTS} entries, got {contexts}"
                ),
            ));
        }

        let Some(quiz) = word.assessed_quiz() else {
            return Err(SessionError::invalid(path("quiz"), "a quiz item is required"));
        };
        if quiz.options.len() != QUIZ_OPTION_COUNT {
            return Err(SessionError::invalid(
                path("quiz[0].options"),
                format!(
                    "expected exactly {QUIZ_OPTION_COUNT} options, got {}",
                    quiz.options.len()
                ),
            ));
        }
        if !quiz.options.iter().any(|o| o == &quiz.answer) {
            return Err(SessionError::invalid(
                path("quiz[0].answer"),
                "answer must be one of the options",
            ));
        }
    }

    Ok(())
}
