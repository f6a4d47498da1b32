//! Answering and moving around.

use quiz_core::{Action, Letter, Nav, Route};

use super::{CommandError, Result};
use crate::state::AppState;

fn require_quiz(state: &AppState) -> Result<String> {
    if state.session().route() != Route::Quiz {
        return Err(CommandError::new("No quiz in progress."));
    }
    state
        .session()
        .current_question()
        .map(|q| q.id.clone())
        .ok_or_else(|| CommandError::new("No quiz in progress."))
}

pub fn answer(state: &mut AppState, letter: Letter) -> Result<String> {
    let question_id = require_quiz(state)?;
    if state.session().answer(&question_id).is_some() {
        return Err(CommandError::new("Already answered."));
    }
    state.dispatch(Action::Choose {
        question_id,
        letter,
    });
    Ok(state.render())
}

pub fn navigate(state: &mut AppState, nav: Nav) -> Result<String> {
    require_quiz(state)?;
    state.dispatch(Action::Navigate(nav));
    Ok(state.render())
}

pub fn flag(state: &mut AppState) -> Result<String> {
    let question_id = require_quiz(state)?;
    state.dispatch(Action::ToggleFlag { question_id });
    Ok(state.render())
}
