use serde::{Deserialize, Serialize};

use crate::constants::{LAST_PAGE, PAGES_PER_WORD};

/// Position inside the learning sequence: which word, and which of its
/// sub-views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub word_index: usize,
    pub page: usize,
}

/// Result of moving a cursor one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStep {
    Moved(Cursor),
    /// Stepped forward off the last page of the last word.
    PastEnd,
    /// Stepped back off the first page of the first word.
    BeforeStart,
}

impl Cursor {
    pub const ORIGIN: Cursor = Cursor {
        word_index: 0,
        page: 0,
    };

    pub fn new(word_index: usize, page: usize) -> Self {
        Self { word_index, page }
    }

    /// Next page, rolling over to page 0 of the next word.
    pub fn advance(self, word_count: usize) -> CursorStep {
        if self.page < LAST_PAGE {
            CursorStep::Moved(Cursor::new(self.word_index, self.page + 1))
        } else {
            self.next_word(word_count)
        }
    }

    /// Previous page, rolling back to the last page of the previous word.
    pub fn retreat(self) -> CursorStep {
        if self.page > 0 {
            CursorStep::Moved(Cursor::new(self.word_index, self.page - 1))
        } else {
            self.previous_word()
        }
    }

    pub fn next_word(self, word_count: usize) -> CursorStep {
        if self.word_index + 1 < word_count {
            CursorStep::Moved(Cursor::new(self.word_index + 1, 0))
        } else {
            CursorStep::PastEnd
        }
    }

    pub fn previous_word(self) -> CursorStep {
        if self.word_index > 0 {
            CursorStep::Moved(Cursor::new(self.word_index - 1, LAST_PAGE))
        } else {
            CursorStep::BeforeStart
        }
    }

    /// Zero-based position across the whole sequence.
    pub fn global_step(self) -> usize {
        self.word_index * PAGES_PER_WORD + self.page
    }

    /// Fraction of the sequence reached, counting the current page as seen.
    pub fn progress(self, word_count: usize) -> f64 {
        if word_count == 0 {
            return 0.0;
        }
        let total = word_count * PAGES_PER_WORD;
        (self.global_step() + 1) as f64 / total as f64
    }

    pub fn is_last(self, word_count: usize) -> bool {
        word_count > 0 && self.word_index == word_count - 1 && self.page == LAST_PAGE
    }
}
