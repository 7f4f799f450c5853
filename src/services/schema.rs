//! Response schema and system instruction sent with every session request.

use serde_json::{json, Value};

pub const SYSTEM_INSTRUCTION: &str = "You are an elite linguist. Ensure all moodColors are distinct \
and high-contrast neon. Options must be exactly 2. Set glowIntensity between 0.4 and 0.8 and \
glowSpread between 80 and 150 by default.";

fn related_word() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "word": { "type": "STRING" },
            "definition": { "type": "STRING", "description": "Max 8 words. Clean meaning." }
        },
        "required": ["word", "definition"]
    })
}

fn word_entry() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "word": { "type": "STRING" },
            "definition": { "type": "STRING", "description": "Max 12 words." },
            "sarcasticDefinition": { "type": "STRING", "description": "Short, witty, punchy." },
            "phonetic": { "type": "STRING" },
            "origin": { "type": "STRING" },
            "contextSentence": { "type": "STRING" },
            "moodColor": { "type": "STRING", "description": "Vibrant neon HEX (e.g. #00F0FF)." },
            "glowIntensity": { "type": "NUMBER", "description": "0.0 to 1.0 brightness." },
            "glowSpread": { "type": "NUMBER", "description": "10 to 200 spread radius." },
            "fontVibe": { "type": "STRING", "description": "One of: SERIF, MONO, SANS." },
            "nativeContexts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "label": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "sentence": { "type": "STRING" },
                        "connotation": { "type": "STRING" },
                        "significance": { "type": "STRING" }
                    },
                    "required": ["label", "description", "sentence", "connotation", "significance"]
                }
            },
            "usageGuide": { "type": "STRING" },
            "synonyms": { "type": "ARRAY", "items": related_word() },
            "antonyms": { "type": "ARRAY", "items": related_word() },
            "visualPrompt": { "type": "STRING" },
            "quiz": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "answer": { "type": "STRING" },
                        "explanation": { "type": "STRING" }
                    },
                    "required": ["question", "options", "answer", "explanation"]
                }
            }
        },
        "required": ["word", "definition", "moodColor", "nativeContexts", "quiz"]
    })
}

pub fn session_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topic": { "type": "STRING" },
            "fullText": { "type": "STRING" },
            "words": { "type": "ARRAY", "items": word_entry() }
        },
        "required": ["topic", "fullText", "words"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_core_fields() {
        let schema = session_schema();
        assert_eq!(schema["required"], json!(["topic", "fullText", "words"]));
        let word = &schema["properties"]["words"]["items"];
        assert!(word["required"]
            .as_array()
            .unwrap()
            .contains(&json!("quiz")));
        assert_eq!(word["properties"]["synonyms"]["items"]["type"], "OBJECT");
    }
}
