//! Share links and snapshot export.

use quiz_core::{export_snapshot, share_url};
use std::fs;
use std::path::Path;
use tracing::warn;

use super::{CommandError, Result};
use crate::boot::open_shared;
use crate::render;
use crate::state::AppState;

/// Link to the whole current session.
pub fn share(state: &mut AppState) -> Result<String> {
    if !state.session().has_questions() {
        return Err(CommandError::new("Load a quiz before sharing."));
    }
    let token = state.codec().encode(state.session())?;
    Ok(share_url(&state.config().share_base_url, &token))
}

/// Link to a fresh session over the markup in `path`, or in the active
/// draft.
pub fn share_text(state: &mut AppState, path: Option<&Path>) -> Result<String> {
    let text = match path {
        Some(path) => fs::read_to_string(path)?,
        None => state.draft().to_string(),
    };
    let session = state.shared_session(&text).map_err(|report| {
        CommandError::new(render::rejected(&report, state.config().max_diagnostics))
    })?;
    let token = state.codec().encode(&session)?;
    Ok(share_url(&state.config().share_base_url, &token))
}

/// Replace the current session with a shared one.
pub fn open(state: &mut AppState, input: &str) -> Result<String> {
    let session = open_shared(input, state.codec())
        .ok_or_else(|| CommandError::new("Could not open that share link."))?;
    state.replace_session(session);
    Ok(format!("Opened shared quiz.\n\n{}", state.render()))
}

pub fn export(state: &mut AppState, path: &Path) -> Result<String> {
    let written = export_snapshot(state.session())
        .map_err(CommandError::from)
        .and_then(|json| fs::write(path, json).map_err(CommandError::from));
    match written {
        Ok(()) => Ok(format!("Exported to {}", path.display())),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "export failed");
            Err(CommandError::new("Export failed."))
        }
    }
}
