//! Manual ("forge") payloads: a pre-built session as JSON, bypassing the
//! generator entirely.

use crate::session::Session;
use crate::validation::{validate_session, SessionError};

/// Parses and validates a raw session payload.
pub fn parse_payload(raw: &str) -> Result<Session, SessionError> {
    let session: Session = serde_json::from_str(raw.trim())?;
    validate_session(&session)?;
    Ok(session)
}

/// Serializes a session into the payload format accepted by [`parse_payload`].
pub fn export_payload(session: &Session) -> Result<String, SessionError> {
    Ok(serde_json::to_string_pretty(session)?)
}
