//! Getting markup in.

use quiz_core::{parse, preview as import_preview, LoadOutcome};
use std::fs;
use std::path::Path;

use super::{CommandError, Result};
use crate::drafts::Surface;
use crate::render;
use crate::state::AppState;

/// Line that ends paste mode.
pub const PASTE_END: &str = ".";

pub fn paste(state: &mut AppState, surface: Option<Surface>) -> Result<String> {
    if let Some(surface) = surface {
        state.select_surface(surface);
    }
    state.start_paste();
    Ok(format!(
        "Paste quiz markup into the {} tab. Finish with a line containing only \"{PASTE_END}\".",
        state.drafts().active().as_str()
    ))
}

pub fn finish_paste(state: &mut AppState) -> String {
    state.end_paste();
    format!("{}\n`load` to start, `autofix` to clean up.", report(state))
}

pub fn tab(state: &mut AppState, surface: Surface) -> Result<String> {
    state.select_surface(surface);
    Ok(format!("{}\n{}", render::surfaces(state.drafts()), report(state)))
}

/// Start a quiz from `path`, or from the active draft when no path is given.
pub fn load(state: &mut AppState, path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        let text = fs::read_to_string(path)?;
        state.set_draft(text);
    }
    if state.draft().trim().is_empty() {
        return Err(CommandError::new(
            "Nothing to load. Use `paste` or `load <file>` first.",
        ));
    }

    match state.load_draft() {
        LoadOutcome::Loaded { questions } => Ok(format!(
            "Loaded {questions} question(s).\n\n{}",
            state.render()
        )),
        LoadOutcome::Rejected(report) => Err(CommandError::new(render::rejected(
            &report,
            state.config().max_diagnostics,
        ))),
    }
}

/// Replace the active draft with a skeleton block.
pub fn template(state: &mut AppState) -> Result<String> {
    let surface = state.drafts().active();
    state.set_draft(surface.template().to_string());
    Ok(format!(
        "Template inserted into the {} tab.\n{}",
        surface.as_str(),
        surface.template().trim_end()
    ))
}

pub fn clear(state: &mut AppState) -> Result<String> {
    state.set_draft(String::new());
    Ok(format!("Cleared the {} tab.", state.drafts().active().as_str()))
}

pub fn autofix(state: &mut AppState) -> Result<String> {
    let fixed = quiz_core::autofix(state.draft());
    state.set_draft(fixed);
    Ok(format!("Autofix applied.\n{}", report(state)))
}

pub fn preview(state: &mut AppState) -> Result<String> {
    Ok(report(state))
}

fn report(state: &AppState) -> String {
    let parsed = parse(state.draft());
    render::import_report(
        import_preview(state.draft(), &parsed),
        &parsed,
        state.config().max_diagnostics,
    )
}
