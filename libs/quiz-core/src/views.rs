//! Read-only projections of a session for display.
//!
//! These decide what a screen may show. They never change what is stored:
//! correctness is recorded eagerly, and only its exposure is gated by mode.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::session::Session;
use crate::time::format_elapsed;
use crate::types::{Answer, Letter, Mode, OptionFeedback, PerLetter, Question, Route, Score};

/// Explanation shown once a question's outcome may be revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback<'a> {
    pub correct_letter: Letter,
    pub picked: Option<Letter>,
    /// `None` when the question was not answered.
    pub was_correct: Option<bool>,
    pub rationale: &'a str,
    /// Present only when option feedback is set to show every letter.
    pub option_rationales: Option<&'a PerLetter<String>>,
}

/// The question under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView<'a> {
    /// 1-based position within the ordering.
    pub number: usize,
    pub of: usize,
    pub question: &'a Question,
    /// Order to render the choices in. Identity unless answer shuffling is on.
    pub letters: [Letter; 4],
    pub picked: Option<Letter>,
    pub flagged: bool,
    pub feedback: Option<Feedback<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    Unanswered,
    /// Answered, outcome hidden until results.
    Answered,
    Correct,
    Incorrect,
}

/// One square of the progress map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressCell {
    /// 0-based position within the ordering, usable with `Nav::To`.
    pub position: usize,
    pub question_id: String,
    pub status: CellStatus,
    pub flagged: bool,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry<'a> {
    pub number: usize,
    pub question: &'a Question,
    pub answer: Option<&'a Answer>,
    pub flagged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView<'a> {
    pub score: Score,
    pub percentage: u32,
    /// `m:ss`, only when the timer is on.
    pub elapsed: Option<String>,
    pub entries: Vec<ReviewEntry<'a>>,
}

/// Render order for the four letters. A fresh permutation each call when
/// shuffling is on; the letters themselves never change identity.
pub fn displayed_letters<R: Rng + ?Sized>(shuffle: bool, rng: &mut R) -> [Letter; 4] {
    let mut letters = Letter::ALL;
    if shuffle {
        letters.shuffle(rng);
    }
    letters
}

impl Session {
    /// Whether correctness and rationale for `question` may be shown now.
    pub fn is_revealed(&self, question: &Question) -> bool {
        if self.route() == Route::Results {
            return true;
        }
        match self.settings().mode {
            Mode::Study => self.answer(&question.id).is_some(),
            Mode::Test => false,
        }
    }

    pub fn feedback<'a>(&'a self, question: &'a Question) -> Option<Feedback<'a>> {
        if !self.is_revealed(question) {
            return None;
        }
        let answer = self.answer(&question.id);
        let option_rationales = match self.settings().option_feedback {
            OptionFeedback::All => Some(&question.option_rationales),
            OptionFeedback::CorrectOnly => None,
        };
        Some(Feedback {
            correct_letter: question.answer,
            picked: answer.map(|a| a.pick),
            was_correct: answer.map(|a| a.correct),
            rationale: &question.rationale,
            option_rationales,
        })
    }

    pub fn question_view<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<QuestionView<'_>> {
        let question = self.current_question()?;
        Some(QuestionView {
            number: self.position() + 1,
            of: self.ordering().len(),
            question,
            letters: displayed_letters(self.settings().shuffle_answers, rng),
            picked: self.answer(&question.id).map(|a| a.pick),
            flagged: self.is_flagged(&question.id),
            feedback: self.feedback(question),
        })
    }

    /// Cells for the current ordering, restricted to the tag filter.
    pub fn progress_map(&self) -> Vec<ProgressCell> {
        let Some(quiz) = self.quiz() else {
            return Vec::new();
        };
        let tag_filter = self.settings().tag_filter.as_deref();

        self.ordering()
            .iter()
            .enumerate()
            .filter_map(|(position, &index)| quiz.questions.get(index).map(|q| (position, q)))
            .filter(|(_, q)| tag_filter.map_or(true, |tag| q.has_tag(tag)))
            .map(|(position, q)| {
                let status = match self.answer(&q.id) {
                    None => CellStatus::Unanswered,
                    Some(_) if !self.is_revealed(q) => CellStatus::Answered,
                    Some(a) if a.correct => CellStatus::Correct,
                    Some(_) => CellStatus::Incorrect,
                };
                ProgressCell {
                    position,
                    question_id: q.id.clone(),
                    status,
                    flagged: self.is_flagged(&q.id),
                    current: position == self.position(),
                }
            })
            .collect()
    }

    pub fn results_view(&self) -> ResultsView<'_> {
        let score = self.score();
        let entries = self
            .quiz()
            .map(|quiz| {
                quiz.questions
                    .iter()
                    .enumerate()
                    .map(|(idx, q)| ReviewEntry {
                        number: idx + 1,
                        question: q,
                        answer: self.answer(&q.id),
                        flagged: self.is_flagged(&q.id),
                    })
                    .collect()
            })
            .unwrap_or_default();

        ResultsView {
            score,
            percentage: score.percentage(),
            elapsed: self
                .settings()
                .timer_on
                .then(|| format_elapsed(self.elapsed_ms())),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SessionContext;
    use crate::session::tests::{ctx, quiz_text, TWO_PLUS_TWO};
    use crate::session::Action;
    use crate::types::{QuizSource, Settings};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn with_settings(settings: Settings, text: &str) -> (Session, SessionContext) {
        let mut ctx = ctx();
        let mut session = Session::new();
        session.apply(Action::Configure(settings), &mut ctx);
        session.load(text, QuizSource::Paste, &mut ctx);
        (session, ctx)
    }

    #[test]
    fn study_mode_reveals_after_answer() {
        let (mut session, ctx) = with_settings(Settings::default(), TWO_PLUS_TWO);
        let id = session.current_question().unwrap().id.clone();
        let q = session.current_question().unwrap().clone();
        assert_eq!(session.feedback(&q), None);

        session.choose(&id, Letter::A, ctx.now());
        let feedback = session.feedback(&q).unwrap();
        assert_eq!(feedback.correct_letter, Letter::B);
        assert_eq!(feedback.picked, Some(Letter::A));
        assert_eq!(feedback.was_correct, Some(false));
        assert_eq!(feedback.rationale, "Because 2+2 equals 4.");
        assert!(feedback.option_rationales.is_some());
    }

    #[test]
    fn test_mode_hides_until_results() {
        let settings = Settings {
            mode: Mode::Test,
            ..Settings::default()
        };
        let (mut session, ctx) = with_settings(settings, TWO_PLUS_TWO);
        let q = session.current_question().unwrap().clone();
        session.choose(&q.id, Letter::B, ctx.now());

        assert_eq!(session.feedback(&q), None);
        assert_eq!(session.progress_map()[0].status, CellStatus::Answered);
        // Stored eagerly regardless of what is shown.
        assert!(session.answer(&q.id).unwrap().correct);

        session.finish();
        assert_eq!(session.feedback(&q).unwrap().was_correct, Some(true));
    }

    #[test]
    fn correct_only_feedback_omits_option_rationales() {
        let settings = Settings {
            option_feedback: OptionFeedback::CorrectOnly,
            ..Settings::default()
        };
        let (mut session, ctx) = with_settings(settings, TWO_PLUS_TWO);
        let q = session.current_question().unwrap().clone();
        session.choose(&q.id, Letter::B, ctx.now());
        assert_eq!(session.feedback(&q).unwrap().option_rationales, None);
    }

    #[test]
    fn shuffled_letters_are_a_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            let mut letters = displayed_letters(true, &mut rng);
            letters.sort();
            assert_eq!(letters, Letter::ALL);
        }
        assert_eq!(displayed_letters(false, &mut rng), Letter::ALL);
    }

    #[test]
    fn shuffled_display_keeps_canonical_answers() {
        let settings = Settings {
            shuffle_answers: true,
            ..Settings::default()
        };
        let (mut session, ctx) = with_settings(settings, TWO_PLUS_TWO);
        let mut rng = StdRng::seed_from_u64(11);
        let view = session.question_view(&mut rng).unwrap();
        let id = view.question.id.clone();
        let shown_first = view.letters[0];

        session.choose(&id, shown_first, ctx.now());
        let answer = session.answer(&id).unwrap();
        assert_eq!(answer.pick, shown_first);
        assert_eq!(answer.correct, shown_first == Letter::B);
    }

    #[test]
    fn progress_map_respects_tag_filter() {
        let settings = Settings {
            tag_filter: Some("odd".into()),
            ..Settings::default()
        };
        let (session, _ctx) = with_settings(settings, &quiz_text(4));
        let cells = session.progress_map();
        let positions: Vec<_> = cells.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1, 3]);
        assert!(cells.iter().all(|c| !c.current));
        assert_eq!(session.ordering(), &[0, 1, 2, 3]);
    }

    #[test]
    fn progress_map_marks_outcomes_in_study_mode() {
        let (mut session, ctx) = with_settings(Settings::default(), &quiz_text(4));
        let ids: Vec<_> = session
            .quiz()
            .unwrap()
            .questions
            .iter()
            .map(|q| q.id.clone())
            .collect();
        session.choose(&ids[0], Letter::A, ctx.now());
        session.choose(&ids[1], Letter::A, ctx.now());
        session.toggle_flag(&ids[2]);

        let cells = session.progress_map();
        assert_eq!(cells[0].status, CellStatus::Correct);
        assert!(cells[0].current);
        assert_eq!(cells[1].status, CellStatus::Incorrect);
        assert_eq!(cells[2].status, CellStatus::Unanswered);
        assert!(cells[2].flagged);
    }

    #[test]
    fn results_view_summarizes() {
        let (mut session, ctx) = with_settings(Settings::default(), &quiz_text(4));
        let id = session.quiz().unwrap().questions[0].id.clone();
        session.choose(&id, Letter::A, ctx.now());
        session.finish();

        let view = session.results_view();
        assert_eq!(view.score.right, 1);
        assert_eq!(view.percentage, 25);
        assert_eq!(view.elapsed.as_deref(), Some("0:00"));
        assert_eq!(view.entries.len(), 4);
        assert!(view.entries[0].answer.is_some());
        assert!(view.entries[1].answer.is_none());
    }
}
