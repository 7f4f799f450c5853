use serde::Serialize;

use crate::flow::cursor::Cursor;
use crate::session::{FontVibe, NativeContext, RelatedWord, WordEntry};

/// The seven sub-views of a word, by page index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WordPage {
    /// Word, phonetic, definition and origin.
    Hero,
    /// Generated image and the sarcastic definition.
    Visual,
    /// Where a native context is used: label, description, significance.
    Context { context: usize },
    /// A native context's example sentence.
    Practice { context: usize },
    /// First synonym and first antonym.
    Polarities,
}

impl WordPage {
    pub fn from_index(page: usize) -> Option<Self> {
        match page {
            0 => Some(Self::Hero),
            1 => Some(Self::Visual),
            2 | 3 => Some(Self::Context { context: page - 2 }),
            4 | 5 => Some(Self::Practice { context: page - 4 }),
            6 => Some(Self::Polarities),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlowStyle {
    pub intensity: f64,
    pub spread: f64,
}

/// Read-only slice of the session for the current learning screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub cursor: Cursor,
    pub page: WordPage,
    pub total_words: usize,
    pub is_first_word: bool,
    pub is_last_word: bool,
    pub progress: f64,
    pub word: String,
    pub mood_color: String,
    pub font_vibe: FontVibe,
    pub glow: GlowStyle,
    pub body: PageBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageBody {
    #[serde(rename_all = "camelCase")]
    Hero {
        phonetic: String,
        definition: String,
        origin: String,
    },
    #[serde(rename_all = "camelCase")]
    Visual {
        /// `None` while the image is still being generated.
        image_url: Option<String>,
        sarcastic_definition: String,
    },
    #[serde(rename_all = "camelCase")]
    Context {
        label: String,
        description: String,
        significance: String,
    },
    #[serde(rename_all = "camelCase")]
    Practice {
        sentence: String,
        significance: String,
    },
    #[serde(rename_all = "camelCase")]
    Polarities {
        synonym: Option<RelatedWord>,
        antonym: Option<RelatedWord>,
    },
}

fn context_or_blank(entry: &WordEntry, index: usize) -> NativeContext {
    entry
        .native_contexts
        .get(index)
        .cloned()
        .unwrap_or_else(|| NativeContext {
            label: String::new(),
            description: String::new(),
            sentence: String::new(),
            connotation: String::new(),
            significance: String::new(),
        })
}

impl PageView {
    pub fn build(
        entry: &WordEntry,
        cursor: Cursor,
        total_words: usize,
        image_url: Option<&str>,
    ) -> Option<Self> {
        let page = WordPage::from_index(cursor.page)?;
        let body = match page {
            WordPage::Hero => PageBody::Hero {
                phonetic: entry.phonetic.clone(),
                definition: entry.definition.clone(),
                origin: entry.origin.clone(),
            },
            WordPage::Visual => PageBody::Visual {
                image_url: image_url.map(str::to_string),
                sarcastic_definition: entry.sarcastic_definition.clone(),
            },
            WordPage::Context { context } => {
                let ctx = context_or_blank(entry, context);
                PageBody::Context {
                    label: ctx.label,
                    description: ctx.description,
                    significance: ctx.significance,
                }
            }
            WordPage::Practice { context } => {
                let ctx = context_or_blank(entry, context);
                PageBody::Practice {
                    sentence: ctx.sentence,
                    significance: ctx.significance,
                }
            }
            WordPage::Polarities => PageBody::Polarities {
                synonym: entry.synonyms.first().cloned(),
                antonym: entry.antonyms.first().cloned(),
            },
        };

        Some(Self {
            cursor,
            page,
            total_words,
            is_first_word: cursor.word_index == 0,
            is_last_word: cursor.word_index + 1 == total_words,
            progress: cursor.progress(total_words),
            word: entry.word.clone(),
            mood_color: entry.mood_color.to_string(),
            font_vibe: entry.font_vibe,
            glow: GlowStyle {
                intensity: entry.glow_intensity_or_default(),
                spread: entry.glow_spread_or_default(),
            },
            body,
        })
    }
}
