use serde::Serialize;

use crate::session::WordEntry;

/// A run of paragraph text. `target` is the index of the session word this
/// run spells, when it is a highlighted occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    pub target: Option<usize>,
}

/// Byte length of the prefix of `text` that spells `word` ignoring case, if
/// any. Folding is per character and Unicode-aware, so `Élan` matches `élan`.
fn match_len(text: &str, word: &str) -> Option<usize> {
    let mut rest = text.char_indices();
    let mut end = 0;
    for wc in word.chars() {
        let (i, tc) = rest.next()?;
        if tc != wc && !tc.to_lowercase().eq(wc.to_lowercase()) {
            return None;
        }
        end = i + tc.len_utf8();
    }
    Some(end)
}

/// Splits `text` so that every case-insensitive occurrence of a target word
/// becomes its own segment. At a given position the earliest-listed word
/// wins. Joining all segment texts gives back `text` unchanged.
pub fn segments(text: &str, words: &[WordEntry]) -> Vec<Segment> {
    let targets: Vec<(usize, &str)> = words
        .iter()
        .enumerate()
        .map(|(i, w)| (i, w.word.as_str()))
        .filter(|(_, w)| !w.is_empty())
        .collect();

    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        let hit = targets
            .iter()
            .find_map(|&(index, word)| match_len(&text[pos..], word).map(|len| (index, len)));

        match hit {
            Some((index, len)) => {
                if plain_start < pos {
                    out.push(Segment {
                        text: text[plain_start..pos].to_string(),
                        target: None,
                    });
                }
                let end = pos + len;
                out.push(Segment {
                    text: text[pos..end].to_string(),
                    target: Some(index),
                });
                pos = end;
                plain_start = end;
            }
            None => {
                pos += text[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < text.len() {
        out.push(Segment {
            text: text[plain_start..].to_string(),
            target: None,
        });
    }
    out
}
