use serde::Serialize;

use crate::flow::FlowError;
use crate::validation::non_blank;

/// Word picker for "analyze text" mode: edit the passage, lock it, then pick
/// the target words by toggling tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSelection {
    text: String,
    locked: bool,
    selected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub text: String,
    /// Cleaned form used for selection; `None` for whitespace and punctuation.
    pub word: Option<String>,
    pub selected: bool,
}

/// Keeps ASCII letters, digits and hyphens.
pub fn clean_word(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Splits on whitespace runs, keeping the runs as their own tokens.
fn split_keeping_whitespace(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            parts.push(&text[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

impl TextSelection {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locked: false,
            selected: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn edit(&mut self, text: impl Into<String>) -> Result<(), FlowError> {
        if self.locked {
            return Err(FlowError::SelectionLocked);
        }
        self.text = text.into();
        Ok(())
    }

    pub fn lock(&mut self) -> Result<(), FlowError> {
        if non_blank(&self.text).is_none() {
            return Err(FlowError::EmptyInput);
        }
        self.locked = true;
        Ok(())
    }

    /// Back to editing; the selection is dropped.
    pub fn unlock(&mut self) {
        self.locked = false;
        self.selected.clear();
    }

    /// Toggles the cleaned form of `token`. Returns whether it is now
    /// selected; tokens with nothing selectable are ignored.
    pub fn toggle(&mut self, token: &str) -> Result<bool, FlowError> {
        if !self.locked {
            return Err(FlowError::SelectionUnlocked);
        }
        let word = clean_word(token);
        if word.is_empty() {
            return Ok(false);
        }
        if let Some(pos) = self.selected.iter().position(|w| *w == word) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(word);
            Ok(true)
        }
    }

    pub fn tokens(&self) -> Vec<Token> {
        split_keeping_whitespace(&self.text)
            .into_iter()
            .map(|part| {
                let cleaned = clean_word(part);
                let word = (!cleaned.is_empty()).then_some(cleaned);
                let selected = word
                    .as_ref()
                    .is_some_and(|w| self.selected.iter().any(|s| s == w));
                Token {
                    text: part.to_string(),
                    word,
                    selected,
                }
            })
            .collect()
    }

    /// The passage and the chosen words, ready for generation.
    pub fn analyze(&self) -> Result<(String, Vec<String>), FlowError> {
        if !self.locked {
            return Err(FlowError::SelectionUnlocked);
        }
        if self.selected.is_empty() {
            return Err(FlowError::SelectionEmpty);
        }
        Ok((self.text.clone(), self.selected.clone()))
    }
}
