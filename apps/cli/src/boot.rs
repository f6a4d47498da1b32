//! Choosing the session to start with.

use quiz_core::{token_from_fragment, Session, ShareCodec};
use tracing::{info, warn};

use crate::db::KeyValueStore;
use crate::persist;

/// Where the starting session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootSource {
    Fragment,
    Persisted,
    Default,
}

impl BootSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fragment => "fragment",
            Self::Persisted => "persisted",
            Self::Default => "default",
        }
    }
}

/// A share token (bare, `#q=...` fragment, or full URL) takes priority over
/// the persisted session, which takes priority over a fresh one. An opened
/// token replaces the persisted record.
pub fn boot(
    fragment: Option<&str>,
    codec: &ShareCodec,
    store: &dyn KeyValueStore,
) -> (Session, BootSource) {
    if let Some(session) = fragment.and_then(|input| open_shared(input, codec)) {
        persist::save(store, &session);
        return (session, BootSource::Fragment);
    }

    if let Some(session) = persist::load(store) {
        return (session, BootSource::Persisted);
    }

    (Session::default(), BootSource::Default)
}

/// Decode a share link, accepting it only when it carries questions.
pub fn open_shared(input: &str, codec: &ShareCodec) -> Option<Session> {
    let input = input.trim();
    let token = token_from_fragment(input).unwrap_or(input);
    match codec.try_decode(token) {
        Ok(session) if session.has_questions() => {
            info!("opened shared session");
            Some(session)
        }
        Ok(_) => {
            warn!("shared session has no questions");
            None
        }
        Err(e) => {
            warn!(error = %e, "failed to decode share token");
            None
        }
    }
}
