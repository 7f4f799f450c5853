//! Offline stand-in for the generator: a deterministic session built from the
//! request alone.

use crate::flow::{GenerationRequest, InputMode};
use crate::flow::selection::clean_word;
use crate::mood::MoodColor;
use crate::session::{FontVibe, NativeContext, QuizItem, RelatedWord, Session, WordEntry};

const PALETTE: [&str; 6] = ["#00F0FF", "#FF00E5", "#39FF14", "#FFD700", "#FF3131", "#BD00FF"];
const MAX_WORDS: usize = 3;
const FALLBACK_WORD: &str = "lexicon";

/// 1x1 transparent PNG.
pub const MOCK_IMAGE: &str =
    "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

fn pick_words(request: &GenerationRequest) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let source: Vec<String> = if request.manual_words.is_empty() {
        request
            .input
            .split_whitespace()
            .map(clean_word)
            .filter(|w| w.len() >= 4)
            .collect()
    } else {
        request.manual_words.iter().map(|w| clean_word(w)).collect()
    };
    for word in source {
        if word.is_empty() || words.iter().any(|w| w.eq_ignore_ascii_case(&word)) {
            continue;
        }
        words.push(word);
        if words.len() == MAX_WORDS {
            break;
        }
    }
    if words.is_empty() {
        words.push(FALLBACK_WORD.to_string());
    }
    words
}

fn entry(word: &str, index: usize, decoy: &str) -> WordEntry {
    let color = MoodColor::parse(PALETTE[index % PALETTE.len()]).unwrap_or_default();
    let vibe = match index % 3 {
        0 => FontVibe::Serif,
        1 => FontVibe::Mono,
        _ => FontVibe::Sans,
    };
    WordEntry {
        word: word.to_string(),
        definition: format!("The working sense of '{word}'."),
        sarcastic_definition: format!("What people say when they mean {word} but want to sound clever."),
        phonetic: format!("/{}/", word.to_ascii_lowercase()),
        origin: "Offline forge".to_string(),
        context_sentence: format!("Everyone in the room felt the {word}."),
        mood_color: color,
        glow_intensity: Some(0.6),
        glow_spread: Some(120.0),
        font_vibe: vibe,
        native_contexts: vec![
            NativeContext {
                label: "Academic".to_string(),
                description: format!("{word} in papers and lectures"),
                sentence: format!("The study treats {word} as a central term."),
                connotation: "precise".to_string(),
                significance: "marks expertise".to_string(),
            },
            NativeContext {
                label: "Everyday".to_string(),
                description: format!("{word} in casual talk"),
                sentence: format!("Honestly, that was a lot of {word}."),
                connotation: "loose".to_string(),
                significance: "marks familiarity".to_string(),
            },
        ],
        usage_guide: format!("Reach for '{word}' when the plain word feels too small."),
        synonyms: vec![RelatedWord {
            word: format!("{word}-like"),
            definition: "close in meaning".to_string(),
        }],
        antonyms: vec![RelatedWord {
            word: format!("non-{word}"),
            definition: "the opposite idea".to_string(),
        }],
        psychological_trigger: String::new(),
        visual_prompt: format!("an abstract neon sculpture of {word}"),
        meme_template: String::new(),
        image_url: None,
        quiz: vec![QuizItem {
            question: format!("Which word was this session's entry number {}?", index + 1),
            options: vec![word.to_string(), decoy.to_string()],
            answer: word.to_string(),
            explanation: format!("'{word}' was word {} of the session.", index + 1),
        }],
    }
}

pub fn mock_session(request: &GenerationRequest) -> Session {
    let words = pick_words(request);
    let entries: Vec<WordEntry> = words
        .iter()
        .enumerate()
        .map(|(i, w)| entry(w, i, &format!("{w}ish")))
        .collect();

    let topic = request.input.trim();
    let full_text = match request.mode {
        InputMode::Text => topic.to_string(),
        InputMode::Topic | InputMode::Forge => {
            let mentions = words
                .iter()
                .map(|w| format!("Notice how {w} shapes the picture."))
                .collect::<Vec<_>>()
                .join(" ");
            format!("A short tour of {topic}. {mentions}")
        }
    };

    Session {
        topic: topic.chars().take(80).collect(),
        full_text,
        words: entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::SessionTicket;
    use crate::validation::validate_session;

    fn request(mode: InputMode, input: &str, manual: &[&str]) -> GenerationRequest {
        GenerationRequest {
            ticket: SessionTicket(1),
            mode,
            input: input.to_string(),
            manual_words: manual.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn topic_session_is_valid() {
        let session = mock_session(&request(InputMode::Topic, "photosynthesis", &[]));
        validate_session(&session).unwrap();
        assert_eq!(session.words[0].word, "photosynthesis");
        assert!(session.full_text.contains("photosynthesis"));
    }

    #[test]
    fn text_session_uses_manual_words_and_keeps_text() {
        let text = "The serene lake mirrored an ephemeral sky.";
        let session = mock_session(&request(InputMode::Text, text, &["serene", "ephemeral"]));
        validate_session(&session).unwrap();
        assert_eq!(session.full_text, text);
        let words: Vec<_> = session.words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["serene", "ephemeral"]);
        assert_ne!(session.words[0].mood_color, session.words[1].mood_color);
    }

    #[test]
    fn short_input_falls_back() {
        let session = mock_session(&request(InputMode::Topic, "a b", &[]));
        assert_eq!(session.words[0].word, FALLBACK_WORD);
    }

    #[test]
    fn word_count_is_capped() {
        let session = mock_session(&request(
            InputMode::Topic,
            "alpha bravo charlie delta echo",
            &[],
        ));
        assert_eq!(session.len(), MAX_WORDS);
    }
}
