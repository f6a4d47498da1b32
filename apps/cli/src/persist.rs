//! Versioned session record, and the authoring drafts beside it, on top of a
//! [`KeyValueStore`].
//!
//! Persistence is best-effort. Every failure is logged and reported as
//! `false`/`None`; the session in memory stays authoritative.

use quiz_core::Session;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::db::KeyValueStore;
use crate::drafts::Drafts;

pub const STORAGE_KEY: &str = "quizcraft_state_v1";
pub const RECORD_VERSION: u32 = 1;
pub const DRAFTS_KEY: &str = "quizcraft_drafts_v1";

#[derive(Serialize)]
struct RecordRef<'a> {
    version: u32,
    session: &'a Session,
}

#[derive(Deserialize)]
struct StoredRecord {
    version: u32,
    session: serde_json::Value,
}

/// Write `session` under [`STORAGE_KEY`].
pub fn save(store: &dyn KeyValueStore, session: &Session) -> bool {
    let record = RecordRef {
        version: RECORD_VERSION,
        session,
    };
    let json = match serde_json::to_string(&record) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "failed to serialize session");
            return false;
        }
    };
    match store.set(STORAGE_KEY, &json) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "failed to persist session");
            false
        }
    }
}

/// Read the persisted session. Anything but a valid current-version record
/// counts as absent.
pub fn load(store: &dyn KeyValueStore) -> Option<Session> {
    let raw = match store.get(STORAGE_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(error = %e, "failed to read persisted session");
            return None;
        }
    };

    let record: StoredRecord = match serde_json::from_str(&raw) {
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "ignoring undecodable persisted record");
            return None;
        }
    };
    if record.version != RECORD_VERSION {
        debug!(version = record.version, "ignoring persisted record from another version");
        return None;
    }

    let session: Session = match serde_json::from_value(record.session) {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "ignoring persisted record with invalid session");
            return None;
        }
    };
    if let Err(e) = session.validate() {
        warn!(error = %e, "ignoring persisted session that breaks invariants");
        return None;
    }
    Some(session)
}

/// Remove the persisted record.
pub fn clear(store: &dyn KeyValueStore) -> bool {
    match store.remove(STORAGE_KEY) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "failed to clear persisted session");
            false
        }
    }
}

/// Write the authoring drafts under [`DRAFTS_KEY`].
pub fn save_drafts(store: &dyn KeyValueStore, drafts: &Drafts) -> bool {
    let json = match serde_json::to_string(drafts) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "failed to serialize drafts");
            return false;
        }
    };
    match store.set(DRAFTS_KEY, &json) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "failed to persist drafts");
            false
        }
    }
}

/// Read the saved drafts, empty when absent or unreadable.
pub fn load_drafts(store: &dyn KeyValueStore) -> Drafts {
    let raw = match store.get(DRAFTS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Drafts::default(),
        Err(e) => {
            warn!(error = %e, "failed to read drafts");
            return Drafts::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring undecodable drafts");
        Drafts::default()
    })
}
