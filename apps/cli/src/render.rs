//! Plain-text screens.

use quiz_core::{
    CellStatus, ImportPreview, ParseReport, ProgressCell, QuestionView, ResultsView, Route,
    Session, Settings,
};
use rand::Rng;
use std::fmt::Write;

use crate::drafts::{Drafts, Surface};

pub const HELP: &str = "\
Import:   tab generator|paste | paste [generator|paste] | load [file] | template
          autofix | preview | clear
Quiz:     a-d or 1-4 | n | p | go <k> | flag | show | finish
Results:  back | retry | review all|missed|flagged
Share:    share | share-text [file] | open <token|url> | export <file>
Settings: set mode study|test | set timer on|off | set shuffle-questions on|off
          set shuffle-answers on|off | set feedback all|correct_only | set tag <tag>|none
Other:    tags | import | reset | help | quit";

pub fn screen<R: Rng + ?Sized>(session: &Session, rng: &mut R) -> String {
    match session.route() {
        Route::Import => import_screen(session),
        Route::Quiz => match session.question_view(rng) {
            Some(view) => {
                let elapsed = session
                    .settings()
                    .timer_on
                    .then(|| quiz_core::format_elapsed(session.elapsed_ms()));
                format!(
                    "{}\n{}",
                    question(&view, elapsed.as_deref()),
                    progress(&session.progress_map())
                )
            }
            None => import_screen(session),
        },
        Route::Results => results(&session.results_view()),
    }
}

fn import_screen(session: &Session) -> String {
    let mut out = String::from("Import a quiz: `paste` to enter markup or `load <file>`.");
    if let Some(quiz) = session.quiz() {
        let _ = write!(
            out,
            "\nA quiz with {} question(s) is loaded; `back` returns to it.",
            quiz.len()
        );
    }
    out
}

pub fn question(view: &QuestionView<'_>, elapsed: Option<&str>) -> String {
    let mut out = format!("Question {} of {}", view.number, view.of);
    if view.flagged {
        out.push_str("  [flagged]");
    }
    if let Some(elapsed) = elapsed {
        let _ = write!(out, "  {elapsed}");
    }
    let _ = write!(out, "\n{}\n", view.question.prompt);

    for letter in view.letters {
        let marker = if view.picked == Some(letter) { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {letter}) {}",
            view.question.choices.get(letter)
        );
    }

    if let Some(feedback) = &view.feedback {
        match feedback.was_correct {
            Some(true) => out.push_str("Correct.\n"),
            Some(false) => {
                let _ = writeln!(out, "Incorrect. The answer is {}.", feedback.correct_letter);
            }
            None => {
                let _ = writeln!(out, "Not answered. The answer is {}.", feedback.correct_letter);
            }
        }
        let _ = writeln!(out, "Why: {}", feedback.rationale);
        if let Some(rationales) = feedback.option_rationales {
            for (letter, text) in rationales.iter() {
                let _ = writeln!(out, "  {letter}: {text}");
            }
        }
    } else if view.picked.is_some() {
        out.push_str("Answer recorded.\n");
    }

    if let Some(evidence) = &view.question.evidence {
        let _ = writeln!(out, "Evidence: {evidence}");
    }
    out.truncate(out.trim_end().len());
    out
}

/// One bracketed cell per question: `=` right, `x` wrong, `?` answered but
/// hidden, `*` flagged, `>` current.
pub fn progress(cells: &[ProgressCell]) -> String {
    cells
        .iter()
        .map(|cell| {
            let status = match cell.status {
                CellStatus::Unanswered => ' ',
                CellStatus::Answered => '?',
                CellStatus::Correct => '=',
                CellStatus::Incorrect => 'x',
            };
            let current = if cell.current { ">" } else { "" };
            let flag = if cell.flagged { "*" } else { "" };
            format!("{current}[{}{status}{flag}]", cell.position + 1)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn results(view: &ResultsView<'_>) -> String {
    let score = view.score;
    let mut out = format!(
        "Results: {}/{} ({}%)  right {}  wrong {}  unanswered {}",
        score.right, score.total, view.percentage, score.right, score.wrong, score.unanswered
    );
    if let Some(elapsed) = &view.elapsed {
        let _ = write!(out, "  time {elapsed}");
    }
    out.push('\n');

    for entry in &view.entries {
        let outcome = match entry.answer {
            Some(answer) if answer.correct => format!("right ({})", answer.pick),
            Some(answer) => format!("wrong ({}, answer {})", answer.pick, entry.question.answer),
            None => format!("unanswered (answer {})", entry.question.answer),
        };
        let flag = if entry.flagged { " *" } else { "" };
        let _ = writeln!(
            out,
            "{:>3}. {}  {}{flag}",
            entry.number, entry.question.prompt, outcome
        );
    }
    out.push_str("`review all|missed|flagged`, `retry`, or `back`.");
    out
}

/// Which surface is active and how much text each holds.
pub fn surfaces(drafts: &Drafts) -> String {
    let describe = |surface: Surface| {
        let lines = drafts.text(surface).lines().count();
        let marker = if drafts.active() == surface { "*" } else { "" };
        match lines {
            0 => format!("{marker}{} (empty)", surface.as_str()),
            n => format!("{marker}{} ({n} line(s))", surface.as_str()),
        }
    };
    format!(
        "Tabs: {} | {}",
        describe(Surface::Generator),
        describe(Surface::Paste)
    )
}

/// Counts and the first `max` diagnostics for a draft.
pub fn import_report(preview: ImportPreview, report: &ParseReport, max: usize) -> String {
    let mut out = format!(
        "{} block(s), {} valid question(s), {} problem(s).",
        preview.blocks,
        preview.valid,
        report.diagnostics.len()
    );
    for diagnostic in report.diagnostics.iter().take(max) {
        let _ = write!(out, "\n  {diagnostic}");
    }
    if report.diagnostics.len() > max {
        let _ = write!(out, "\n  ...and {} more", report.diagnostics.len() - max);
    }
    out
}

/// Why a draft could not be started.
pub fn rejected(report: &ParseReport, max: usize) -> String {
    if report.diagnostics.is_empty() {
        return "No questions found.".to_string();
    }
    let mut out = String::from("Fix these problems before starting:");
    for diagnostic in report.diagnostics.iter().take(max) {
        let _ = write!(out, "\n  {diagnostic}");
    }
    if report.diagnostics.len() > max {
        let _ = write!(out, "\n  ...and {} more", report.diagnostics.len() - max);
    }
    out
}

pub fn settings(settings: &Settings) -> String {
    let on_off = |on: bool| if on { "on" } else { "off" };
    format!(
        "mode {}, timer {}, shuffle-questions {}, shuffle-answers {}, feedback {}, tag {}",
        settings.mode.as_str(),
        on_off(settings.timer_on),
        on_off(settings.shuffle_questions),
        on_off(settings.shuffle_answers),
        settings.option_feedback.as_str(),
        settings.tag_filter.as_deref().unwrap_or("none"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quiz_core::{parse, preview, Diagnostic, DiagnosticKind, Letter};

    #[test]
    fn progress_symbols() {
        let cells = vec![
            ProgressCell {
                position: 0,
                question_id: "q-1".into(),
                status: CellStatus::Correct,
                flagged: false,
                current: false,
            },
            ProgressCell {
                position: 1,
                question_id: "q-2".into(),
                status: CellStatus::Answered,
                flagged: true,
                current: true,
            },
            ProgressCell {
                position: 2,
                question_id: "q-3".into(),
                status: CellStatus::Unanswered,
                flagged: false,
                current: false,
            },
        ];
        assert_eq!(progress(&cells), "[1=] >[2?*] [3 ]");
    }

    #[test]
    fn import_report_caps_diagnostics() {
        let report = ParseReport {
            questions: Vec::new(),
            diagnostics: (1..=4)
                .map(|i| Diagnostic::new(i, i * 10, DiagnosticKind::MissingChoice(Letter::C)))
                .collect(),
        };
        let text = import_report(ImportPreview { blocks: 4, valid: 0 }, &report, 2);
        assert_eq!(
            text,
            "4 block(s), 0 valid question(s), 4 problem(s).\n  \
             Q1 (line 10): Missing choice C)\n  \
             Q2 (line 20): Missing choice C)\n  \
             ...and 2 more"
        );
    }

    #[test]
    fn surfaces_line_marks_active_tab() {
        let mut drafts = Drafts::default();
        assert_eq!(surfaces(&drafts), "Tabs: *generator (empty) | paste (empty)");

        drafts.select(Surface::Paste);
        drafts.current_mut().push_str("Q: x\nA) y\n");
        assert_eq!(surfaces(&drafts), "Tabs: generator (empty) | *paste (2 line(s))");
    }

    #[test]
    fn rejected_empty_draft() {
        let report = parse("");
        assert_eq!(rejected(&report, 8), "No questions found.");
        assert_eq!(preview("", &report), ImportPreview::default());
    }
}
