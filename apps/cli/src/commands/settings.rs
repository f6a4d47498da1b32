//! Session settings, tags and reset.

use quiz_core::{Action, Mode, OptionFeedback};

use super::{CommandError, Result};
use crate::render;
use crate::state::AppState;

pub fn set(state: &mut AppState, key: &str, value: &str) -> Result<String> {
    let mut settings = state.session().settings().clone();
    let lowered = value.to_ascii_lowercase();

    match key {
        "mode" => {
            settings.mode = Mode::from_str(&lowered)
                .ok_or_else(|| CommandError::new("mode must be study or test"))?;
        }
        "timer" => settings.timer_on = switch(key, &lowered)?,
        "shuffle-questions" => settings.shuffle_questions = switch(key, &lowered)?,
        "shuffle-answers" => settings.shuffle_answers = switch(key, &lowered)?,
        "feedback" => {
            settings.option_feedback = OptionFeedback::from_str(&lowered)
                .ok_or_else(|| CommandError::new("feedback must be all or correct_only"))?;
        }
        "tag" => {
            settings.tag_filter = match lowered.as_str() {
                "none" | "all" => None,
                _ if state.session().all_tags().iter().any(|t| t == value) => {
                    Some(value.to_string())
                }
                _ => return Err(CommandError::new(format!("Unknown tag {value:?}."))),
            };
        }
        other => return Err(CommandError::new(format!("Unknown setting {other:?}."))),
    }

    let summary = render::settings(&settings);
    state.dispatch(Action::Configure(settings));
    Ok(summary)
}

fn switch(key: &str, value: &str) -> Result<bool> {
    match value {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(CommandError::new(format!("{key} must be on or off"))),
    }
}

pub fn tags(state: &mut AppState) -> Result<String> {
    let tags = state.session().all_tags();
    if tags.is_empty() {
        Ok("No tags.".to_string())
    } else {
        Ok(tags.join(", "))
    }
}

pub fn reset(state: &mut AppState) -> Result<String> {
    state.reset();
    Ok(format!("Session reset.\n\n{}", state.render()))
}
