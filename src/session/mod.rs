pub mod manual;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GLOW_INTENSITY, DEFAULT_GLOW_SPREAD};
use crate::mood::MoodColor;

/// One generated vocabulary lesson. Immutable once installed in the
/// controller; a new lesson replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub topic: String,
    pub full_text: String,
    pub words: Vec<WordEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub sarcastic_definition: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub context_sentence: String,
    pub mood_color: MoodColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow_intensity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow_spread: Option<f64>,
    #[serde(default)]
    pub font_vibe: FontVibe,
    pub native_contexts: Vec<NativeContext>,
    #[serde(default)]
    pub usage_guide: String,
    #[serde(default)]
    pub synonyms: Vec<RelatedWord>,
    #[serde(default)]
    pub antonyms: Vec<RelatedWord>,
    #[serde(default)]
    pub psychological_trigger: String,
    #[serde(default)]
    pub visual_prompt: String,
    #[serde(default)]
    pub meme_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quiz: Vec<QuizItem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FontVibe {
    Serif,
    Mono,
    #[default]
    Sans,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeContext {
    pub label: String,
    pub description: String,
    pub sentence: String,
    pub connotation: String,
    pub significance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedWord {
    pub word: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
}

impl Session {
    pub fn word(&self, index: usize) -> Option<&WordEntry> {
        self.words.get(index)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordEntry {
    /// The item asked in the final assessment.
    pub fn assessed_quiz(&self) -> Option<&QuizItem> {
        self.quiz.first()
    }

    pub fn glow_intensity_or_default(&self) -> f64 {
        self.glow_intensity.unwrap_or(DEFAULT_GLOW_INTENSITY)
    }

    pub fn glow_spread_or_default(&self) -> f64 {
        self.glow_spread.unwrap_or(DEFAULT_GLOW_SPREAD)
    }
}

impl QuizItem {
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.answer
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_vibe_uses_upper_case_tags() {
        assert_eq!(serde_json::to_string(&FontVibe::Mono).unwrap(), "\"MONO\"");
        let parsed: FontVibe = serde_json::from_str("\"SERIF\"").unwrap();
        assert_eq!(parsed, FontVibe::Serif);
    }

    #[test]
    fn optional_fields_fall_back() {
        let raw = serde_json::json!({
            "word": "lucid",
            "definition": "clear",
            "moodColor": "#00F0FF",
            "nativeContexts": [],
            "quiz": []
        });
        let entry: WordEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.font_vibe, FontVibe::Sans);
        assert_eq!(entry.glow_intensity_or_default(), DEFAULT_GLOW_INTENSITY);
        assert_eq!(entry.glow_spread_or_default(), DEFAULT_GLOW_SPREAD);
        assert!(entry.image_url.is_none());
        assert!(entry.assessed_quiz().is_none());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let session = fixtures::session(1);
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("fullText").is_some());
        let word = &json["words"][0];
        assert_eq!(word["moodColor"], "#00F0FF");
        assert!(word.get("sarcasticDefinition").is_some());
        assert!(word.get("nativeContexts").is_some());
        assert!(word.get("imageUrl").is_none());
    }
}
