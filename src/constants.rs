/// Sub-views per word: hero, visual, four context pages, polarities.
pub const PAGES_PER_WORD: usize = 7;

/// Index of the last sub-view of a word.
pub const LAST_PAGE: usize = PAGES_PER_WORD - 1;

/// Mood color used before any session is loaded.
pub const DEFAULT_MOOD_COLOR: &str = "#00F0FF";

/// Glow intensity used when a word leaves it unset.
pub const DEFAULT_GLOW_INTENSITY: f64 = 1.0;

/// Glow spread used when a word leaves it unset.
pub const DEFAULT_GLOW_SPREAD: f64 = 120.0;

pub const GLOW_SPREAD_MIN: f64 = 10.0;
pub const GLOW_SPREAD_MAX: f64 = 200.0;

pub const MIN_NATIVE_CONTEXTS: usize = 2;
pub const MAX_NATIVE_CONTEXTS: usize = 4;

/// Every quiz item offers exactly this many options.
pub const QUIZ_OPTION_COUNT: usize = 2;

/// Suffix appended to a word's visual prompt for image generation.
pub const IMAGE_PROMPT_STYLE: &str = "3D render, octane, cinematic, vibrant.";

/// Failure message for a manual payload that does not parse.
pub const MALFORMED_PAYLOAD_MESSAGE: &str = "JSON error.";

/// Failure message for a generation call that did not come back.
pub const CONNECTION_LOST_MESSAGE: &str = "Connection lost.";

/// Capacity of the flow event broadcast channel.
pub const FLOW_EVENT_CAPACITY: usize = 256;
