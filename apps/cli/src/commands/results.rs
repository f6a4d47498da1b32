//! Route changes around the results screen.

use quiz_core::{Action, ReviewFilter, Route};

use super::{CommandError, Result};
use crate::state::AppState;

pub fn finish(state: &mut AppState) -> Result<String> {
    if state.session().route() != Route::Quiz {
        return Err(CommandError::new("No quiz in progress."));
    }
    state.dispatch(Action::Finish);
    Ok(state.render())
}

/// Return to the quiz without changing it.
pub fn back(state: &mut AppState) -> Result<String> {
    if state.session().route() == Route::Quiz || !state.session().has_questions() {
        return Err(CommandError::new("Nothing to go back to."));
    }
    state.dispatch(Action::Resume);
    Ok(state.render())
}

pub fn retry(state: &mut AppState) -> Result<String> {
    if state.session().route() != Route::Results {
        return Err(CommandError::new("Finish the quiz first."));
    }
    state.dispatch(Action::Retry);
    Ok(state.render())
}

pub fn review(state: &mut AppState, filter: ReviewFilter) -> Result<String> {
    if state.session().route() != Route::Results {
        return Err(CommandError::new("Finish the quiz first."));
    }
    let matched = state.review(filter);

    let screen = state.render();
    if matched {
        Ok(screen)
    } else {
        Ok(format!("Nothing matched; reviewing the current set.\n\n{screen}"))
    }
}

pub fn open_import(state: &mut AppState) -> Result<String> {
    state.dispatch(Action::OpenImport);
    Ok(state.render())
}
