//! Quiz-taking session: the state machine over Import, Quiz and Results.
//!
//! A [`Session`] is a plain value. User actions are [`Action`]s applied with
//! [`reduce`] (or [`Session::apply`]); nothing here touches global state,
//! performs I/O or fails. Calls that make no sense in the current state are
//! no-ops.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::context::SessionContext;
use crate::error::SessionError;
use crate::parser::parse_with;
use crate::types::{
    Answer, Letter, ParseReport, Question, Quiz, QuizSource, ReviewFilter, Route, Score, Settings,
};

/// Movement within the current ordering. Results are clamped, never wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Prev,
    Next,
    By(isize),
    To(usize),
}

/// A user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Choose { question_id: String, letter: Letter },
    ToggleFlag { question_id: String },
    Navigate(Nav),
    Finish,
    /// Return to the quiz from Results or Import without changing anything.
    Resume,
    Retry,
    Review(ReviewFilter),
    OpenImport,
    Tick,
    Configure(Settings),
    Reset,
}

/// Outcome of trying to start a session from markup.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { questions: usize },
    /// Diagnostics were found, or there was nothing to load.
    Rejected(ParseReport),
}

/// Apply `action` to `session` and return the new state.
pub fn reduce(mut session: Session, action: Action, ctx: &mut SessionContext) -> Session {
    session.apply(action, ctx);
    session
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    route: Route,
    quiz: Option<Quiz>,
    ordering: Vec<usize>,
    position: usize,
    answers: BTreeMap<String, Answer>,
    flags: BTreeSet<String>,
    settings: Settings,
    started_at: Option<DateTime<Utc>>,
    elapsed_ms: i64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and, if it is clean and non-empty, start a fresh attempt.
    /// The current session is left untouched on rejection.
    pub fn load(&mut self, text: &str, source: QuizSource, ctx: &mut SessionContext) -> LoadOutcome {
        let report = parse_with(text, ctx.ids());
        if !report.is_clean() || report.questions.is_empty() {
            return LoadOutcome::Rejected(report);
        }

        let questions = report.questions.len();
        let quiz = Quiz::new(report.questions, source, ctx.now());
        self.activate(quiz, ctx);
        LoadOutcome::Loaded { questions }
    }

    /// A fresh session with default settings over `text`, for sharing
    /// without disturbing the caller's own session.
    pub fn shared_from_text(text: &str, ctx: &mut SessionContext) -> Result<Self, ParseReport> {
        let report = parse_with(text, ctx.ids());
        if !report.is_clean() || report.questions.is_empty() {
            return Err(report);
        }

        let now = ctx.now();
        let quiz = Quiz::new(report.questions, QuizSource::SharedText, now);
        Ok(Self {
            route: Route::Quiz,
            ordering: (0..quiz.len()).collect(),
            quiz: Some(quiz),
            started_at: Some(now),
            ..Self::default()
        })
    }

    pub fn apply(&mut self, action: Action, ctx: &mut SessionContext) {
        match action {
            Action::Choose {
                question_id,
                letter,
            } => self.choose(&question_id, letter, ctx.now()),
            Action::ToggleFlag { question_id } => self.toggle_flag(&question_id),
            Action::Navigate(nav) => self.navigate(nav),
            Action::Finish => self.finish(),
            Action::Resume => self.resume(),
            Action::Retry => self.retry(ctx),
            Action::Review(filter) => {
                self.review(filter);
            }
            Action::OpenImport => self.open_import(),
            Action::Tick => self.tick(ctx.now()),
            Action::Configure(settings) => self.settings = settings,
            Action::Reset => *self = Self::default(),
        }
    }

    fn activate(&mut self, quiz: Quiz, ctx: &mut SessionContext) {
        self.ordering = (0..quiz.len()).collect();
        self.quiz = Some(quiz);
        self.begin_attempt(ctx);
    }

    fn begin_attempt(&mut self, ctx: &mut SessionContext) {
        if self.settings.shuffle_questions {
            self.ordering.shuffle(ctx.rng());
        }
        self.position = 0;
        self.answers.clear();
        self.flags.clear();
        self.started_at = Some(ctx.now());
        self.elapsed_ms = 0;
        self.route = Route::Quiz;
    }

    /// Record the first pick for a question. Later picks are ignored.
    pub fn choose(&mut self, question_id: &str, letter: Letter, now: DateTime<Utc>) {
        if self.answers.contains_key(question_id) {
            return;
        }
        let Some(question) = self.quiz.as_ref().and_then(|quiz| quiz.question(question_id)) else {
            return;
        };
        let answer = Answer {
            pick: letter,
            correct: letter == question.answer,
            answered_at: now,
        };
        self.answers.insert(question_id.to_string(), answer);
    }

    pub fn toggle_flag(&mut self, question_id: &str) {
        let known = self
            .quiz
            .as_ref()
            .is_some_and(|quiz| quiz.question(question_id).is_some());
        if !known {
            return;
        }
        if !self.flags.remove(question_id) {
            self.flags.insert(question_id.to_string());
        }
    }

    pub fn navigate(&mut self, nav: Nav) {
        let Some(last) = self.ordering.len().checked_sub(1) else {
            return;
        };
        let target = match nav {
            Nav::Prev => self.position.saturating_sub(1),
            Nav::Next => self.position.saturating_add(1),
            Nav::By(delta) => self.position.saturating_add_signed(delta),
            Nav::To(index) => index,
        };
        self.position = target.min(last);
    }

    pub fn finish(&mut self) {
        if self.route == Route::Quiz {
            self.route = Route::Results;
        }
    }

    pub fn resume(&mut self) {
        if self.route != Route::Quiz && self.quiz.is_some() {
            self.route = Route::Quiz;
        }
    }

    pub fn open_import(&mut self) {
        self.route = Route::Import;
    }

    /// Start over on the same quiz.
    pub fn retry(&mut self, ctx: &mut SessionContext) {
        if self.route != Route::Results {
            return;
        }
        if let Some(quiz) = &self.quiz {
            self.ordering = (0..quiz.len()).collect();
        }
        self.begin_attempt(ctx);
    }

    /// Revisit a subset of questions. An empty subset keeps the current
    /// ordering. Returns whether any question matched `filter`.
    pub fn review(&mut self, filter: ReviewFilter) -> bool {
        if self.route != Route::Results {
            return false;
        }
        let Some(quiz) = &self.quiz else {
            return false;
        };

        let subset: Vec<usize> = quiz
            .questions
            .iter()
            .enumerate()
            .filter(|(_, q)| match filter {
                ReviewFilter::All => true,
                ReviewFilter::Missed => self.answers.get(&q.id).is_some_and(|a| !a.correct),
                ReviewFilter::Flagged => self.flags.contains(&q.id),
            })
            .map(|(idx, _)| idx)
            .collect();

        let matched = !subset.is_empty();
        if matched {
            self.ordering = subset;
        }
        self.position = 0;
        self.route = Route::Quiz;
        matched
    }

    /// Refresh the elapsed time from the anchor.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if self.route != Route::Quiz || !self.settings.timer_on {
            return;
        }
        if let Some(started_at) = self.started_at {
            self.elapsed_ms = (now - started_at).num_milliseconds().max(0);
        }
    }

    pub fn score(&self) -> Score {
        let Some(quiz) = &self.quiz else {
            return Score::default();
        };
        let total = quiz.len();
        let (right, wrong) = quiz
            .questions
            .iter()
            .filter_map(|q| self.answers.get(&q.id))
            .fold((0, 0), |(right, wrong), answer| {
                if answer.correct {
                    (right + 1, wrong)
                } else {
                    (right, wrong + 1)
                }
            });
        Score {
            right,
            wrong,
            unanswered: total - right - wrong,
            total,
        }
    }

    /// Sorted distinct tags across the quiz.
    pub fn all_tags(&self) -> Vec<String> {
        let tags: BTreeSet<&str> = self
            .quiz
            .iter()
            .flat_map(|quiz| quiz.questions.iter())
            .flat_map(|q| q.tags.iter().map(String::as_str))
            .collect();
        tags.into_iter().map(str::to_string).collect()
    }

    /// Check the structural invariants of a session from an untrusted source.
    pub fn validate(&self) -> Result<(), SessionError> {
        let Some(quiz) = &self.quiz else {
            return match self.route {
                Route::Import => Ok(()),
                Route::Quiz => Err(SessionError::MissingQuiz("quiz")),
                Route::Results => Err(SessionError::MissingQuiz("results")),
            };
        };
        if quiz.is_empty() {
            return Err(SessionError::EmptyQuiz);
        }
        if self.ordering.is_empty() {
            return Err(SessionError::EmptyOrdering);
        }

        let mut seen = HashSet::new();
        for &index in &self.ordering {
            if index >= quiz.len() {
                return Err(SessionError::IndexOutOfRange {
                    index,
                    len: quiz.len(),
                });
            }
            if !seen.insert(index) {
                return Err(SessionError::DuplicateIndex(index));
            }
        }
        if self.position >= self.ordering.len() {
            return Err(SessionError::PositionOutOfRange {
                position: self.position,
                len: self.ordering.len(),
            });
        }
        Ok(())
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn has_questions(&self) -> bool {
        self.quiz.as_ref().is_some_and(|quiz| !quiz.is_empty())
    }

    pub fn ordering(&self) -> &[usize] {
        &self.ordering
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current_question(&self) -> Option<&Question> {
        let index = *self.ordering.get(self.position)?;
        self.quiz.as_ref()?.questions.get(index)
    }

    pub fn answers(&self) -> &BTreeMap<String, Answer> {
        &self.answers
    }

    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }

    pub fn is_flagged(&self, question_id: &str) -> bool {
        self.flags.contains(question_id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed_ms
    }
}
