//! Mood color and the single-writer signal that carries it.
//!
//! The flow controller is the only writer. The particle field and the page
//! accent styling read the current value once per frame through a
//! [`MoodReader`]; nothing caches it across frames.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::constants::DEFAULT_MOOD_COLOR;

/// A `#RRGGBB` color, kept in the spelling it arrived with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MoodColor {
    raw: String,
    rgb: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid mood color '{0}': expected '#' followed by 6 hex digits")]
pub struct InvalidMoodColor(pub String);

impl MoodColor {
    pub fn parse(raw: &str) -> Result<Self, InvalidMoodColor> {
        let digits = raw
            .strip_prefix('#')
            .filter(|d| d.len() == 6)
            .ok_or_else(|| InvalidMoodColor(raw.to_string()))?;
        let mut rgb = [0_u8; 3];
        hex::decode_to_slice(digits, &mut rgb).map_err(|_| InvalidMoodColor(raw.to_string()))?;
        Ok(Self {
            raw: raw.to_string(),
            rgb,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    pub fn white() -> Self {
        Self {
            raw: "#FFFFFF".to_string(),
            rgb: [0xFF, 0xFF, 0xFF],
        }
    }
}

impl Default for MoodColor {
    fn default() -> Self {
        // DEFAULT_MOOD_COLOR is a valid literal
        Self {
            raw: DEFAULT_MOOD_COLOR.to_string(),
            rgb: [0x00, 0xF0, 0xFF],
        }
    }
}

impl FromStr for MoodColor {
    type Err = InvalidMoodColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MoodColor {
    type Error = InvalidMoodColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MoodColor> for String {
    fn from(value: MoodColor) -> Self {
        value.raw
    }
}

impl fmt::Display for MoodColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Creates the writer/reader pair, starting at the default color.
pub fn mood_signal() -> (MoodPublisher, MoodReader) {
    let (tx, rx) = watch::channel(MoodColor::default());
    (MoodPublisher { tx }, MoodReader { rx })
}

#[derive(Debug)]
pub struct MoodPublisher {
    tx: watch::Sender<MoodColor>,
}

impl MoodPublisher {
    /// Publishes `color`. Returns `true` only when the value actually changed;
    /// subscribers are not woken for a repeat of the current color.
    pub fn publish(&self, color: &MoodColor) -> bool {
        self.tx.send_if_modified(|current| {
            if current == color {
                false
            } else {
                *current = color.clone();
                true
            }
        })
    }

    pub fn current(&self) -> MoodColor {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> MoodReader {
        MoodReader {
            rx: self.tx.subscribe(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoodReader {
    rx: watch::Receiver<MoodColor>,
}

impl MoodReader {
    pub fn current(&self) -> MoodColor {
        self.rx.borrow().clone()
    }

    /// Waits for the next published change. Returns `None` once the publisher
    /// is gone.
    pub async fn changed(&mut self) -> Option<MoodColor> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
