//! Lexicon Prime: a vocabulary-learning session engine. A generated (or
//! hand-written) session is walked word by word through seven sub-views,
//! reviewed as a highlighted paragraph and closed with a short quiz, while an
//! ambient particle field follows the active word's mood color.
//!
//! The binary serves the engine to a presentation layer over HTTP and SSE.

pub mod audio;
pub mod config;
pub mod constants;
pub mod extractors;
pub mod field;
pub mod flow;
pub mod logging;
pub mod mood;
pub mod response;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod validation;
