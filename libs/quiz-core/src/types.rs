//! Core types for quiz sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DiagnosticKind;

/// One of the four answer letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    /// All letters in canonical order.
    pub const ALL: [Letter; 4] = [Letter::A, Letter::B, Letter::C, Letter::D];

    /// Match a single character, case-insensitively.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    /// Parse a trimmed value such as `"b"` or `" B "`. Anything longer than
    /// one letter is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        let mut chars = value.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    /// Map a 1-based keyboard digit (1-4) to a letter.
    pub fn from_digit(digit: u32) -> Option<Self> {
        match digit {
            1..=4 => Some(Self::ALL[(digit - 1) as usize]),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A value for each of the four letters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerLetter<T> {
    #[serde(rename = "A")]
    pub a: T,
    #[serde(rename = "B")]
    pub b: T,
    #[serde(rename = "C")]
    pub c: T,
    #[serde(rename = "D")]
    pub d: T,
}

impl<T> PerLetter<T> {
    pub fn get(&self, letter: Letter) -> &T {
        match letter {
            Letter::A => &self.a,
            Letter::B => &self.b,
            Letter::C => &self.c,
            Letter::D => &self.d,
        }
    }

    pub fn get_mut(&mut self, letter: Letter) -> &mut T {
        match letter {
            Letter::A => &mut self.a,
            Letter::B => &mut self.b,
            Letter::C => &mut self.c,
            Letter::D => &mut self.d,
        }
    }

    /// Iterate in canonical A-D order.
    pub fn iter(&self) -> impl Iterator<Item = (Letter, &T)> {
        Letter::ALL.into_iter().map(move |letter| (letter, self.get(letter)))
    }
}

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub choices: PerLetter<String>,
    pub answer: Letter,
    /// Why the correct answer is correct.
    pub rationale: String,
    /// Feedback for each individual option.
    pub option_rationales: PerLetter<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl Question {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A line-addressed markup defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based index of the block the defect was found in.
    pub q_index: usize,
    /// 1-based source line.
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(q_index: usize, line: usize, kind: DiagnosticKind) -> Self {
        Self {
            q_index,
            line,
            kind,
        }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} (line {}): {}", self.q_index, self.line, self.kind)
    }
}

/// Everything one parse pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub questions: Vec<Question>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseReport {
    /// True when a session may be activated from this report.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Block and question counts shown while the user is still editing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPreview {
    pub blocks: usize,
    pub valid: usize,
}

/// Where a quiz's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizSource {
    Generator,
    Paste,
    SharedText,
}

impl QuizSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generator => "generator",
            Self::Paste => "paste",
            Self::SharedText => "shared-text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizMeta {
    pub source: QuizSource,
    pub created_at: DateTime<Utc>,
}

/// An immutable, loaded set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<Question>,
    pub meta: QuizMeta,
}

impl Quiz {
    pub fn new(questions: Vec<Question>, source: QuizSource, created_at: DateTime<Utc>) -> Self {
        Self {
            questions,
            meta: QuizMeta { source, created_at },
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// A recorded pick. Never changes once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub pick: Letter,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Import,
    Quiz,
    Results,
}

impl Default for Route {
    fn default() -> Self {
        Self::Import
    }
}

/// Feedback mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Correctness shows as soon as a question is answered.
    Study,
    /// Correctness stays hidden until results.
    Test,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Study
    }
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Test => "test",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "study" => Some(Self::Study),
            "test" => Some(Self::Test),
            _ => None,
        }
    }
}

/// How much rationale is shown once feedback is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionFeedback {
    All,
    CorrectOnly,
}

impl Default for OptionFeedback {
    fn default() -> Self {
        Self::All
    }
}

impl OptionFeedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::CorrectOnly => "correct_only",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "correct_only" | "correct" => Some(Self::CorrectOnly),
            _ => None,
        }
    }
}

/// Per-session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub mode: Mode,
    pub timer_on: bool,
    pub shuffle_questions: bool,
    pub shuffle_answers: bool,
    pub option_feedback: OptionFeedback,
    /// Restricts the progress map to one tag. `None` shows everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            timer_on: true,
            shuffle_questions: false,
            shuffle_answers: false,
            option_feedback: OptionFeedback::default(),
            tag_filter: None,
        }
    }
}

/// Which questions a review pass revisits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewFilter {
    All,
    Missed,
    Flagged,
}

impl ReviewFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "missed" => Some(Self::Missed),
            "flagged" => Some(Self::Flagged),
            _ => None,
        }
    }
}

/// Tally over the whole quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub right: usize,
    pub wrong: usize,
    pub unanswered: usize,
    pub total: usize,
}

impl Score {
    /// Rounded share of right answers, 0 for an empty quiz.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.right as f64 / self.total as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_parse_is_case_insensitive() {
        assert_eq!(Letter::parse("b"), Some(Letter::B));
        assert_eq!(Letter::parse(" B "), Some(Letter::B));
        assert_eq!(Letter::parse("E"), None);
        assert_eq!(Letter::parse("AB"), None);
        assert_eq!(Letter::parse(""), None);
    }

    #[test]
    fn letter_from_digit() {
        assert_eq!(Letter::from_digit(1), Some(Letter::A));
        assert_eq!(Letter::from_digit(4), Some(Letter::D));
        assert_eq!(Letter::from_digit(0), None);
        assert_eq!(Letter::from_digit(5), None);
    }

    #[test]
    fn per_letter_serializes_with_letter_keys() {
        let map = PerLetter {
            a: 1,
            b: 2,
            c: 3,
            d: 4,
        };
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"A":1,"B":2,"C":3,"D":4}"#);
    }

    #[test]
    fn percentage_rounds_and_handles_empty() {
        let score = Score {
            right: 2,
            wrong: 1,
            unanswered: 0,
            total: 3,
        };
        assert_eq!(score.percentage(), 67);
        assert_eq!(Score::default().percentage(), 0);
    }

    #[test]
    fn settings_default_matches_fresh_session() {
        let settings = Settings::default();
        assert_eq!(settings.mode, Mode::Study);
        assert!(settings.timer_on);
        assert!(!settings.shuffle_questions);
        assert_eq!(settings.option_feedback, OptionFeedback::All);
        assert_eq!(settings.tag_filter, None);
    }
}
