//! Parser for pasted quiz markup.
//!
//! # Format
//! ```text
//! Q: What is 2+2?
//! A) 3
//! B) 4
//! C) 5
//! D) 6
//! ANS: B
//! EXP_CORRECT: Because 2+2 equals 4.
//!   Continuation lines are indented by two spaces.
//! EXP_A: Too low.
//! EXP_B: Correct sum.
//! EXP_C: Too high.
//! EXP_D: Too high.
//! EVID: Chapter 1
//! TAGS: arithmetic, warmup
//! ---
//! ```
//!
//! Every block is checked on its own, so one pass reports the defects of all
//! blocks. A block with any diagnostic yields no question.

use crate::error::DiagnosticKind;
use crate::ids::{IdGenerator, RandomIds};
use crate::types::{Diagnostic, ImportPreview, Letter, ParseReport, PerLetter, Question};

/// Line that closes a block.
pub const SEPARATOR: &str = "---";

/// Prefix marking a continuation of the previous field.
pub(crate) const INDENT: &str = "  ";
const QUOTE_LIMIT: usize = 80;

/// Parse markup into questions and diagnostics using random ids.
pub fn parse(text: &str) -> ParseReport {
    parse_with(text, &RandomIds::default())
}

/// Parse markup, drawing question ids from `ids`.
pub fn parse_with(text: &str, ids: &dyn IdGenerator) -> ParseReport {
    let text = text.replace("\r\n", "\n");
    let mut report = ParseReport::default();

    for (idx, block) in split_blocks(&text).into_iter().enumerate() {
        let mut builder = BlockBuilder::new(idx + 1, block.first_line());
        for line in block.lines {
            builder.process_line(line);
        }
        match builder.build(ids) {
            Ok(question) => report.questions.push(question),
            Err(diagnostics) => report.diagnostics.extend(diagnostics),
        }
    }

    report
}

/// Number of separator lines in `text`.
pub fn count_blocks(text: &str) -> usize {
    text.replace("\r\n", "\n")
        .split('\n')
        .filter(|line| is_separator(line))
        .count()
}

/// Counts shown beside the import editor.
pub fn preview(text: &str, report: &ParseReport) -> ImportPreview {
    ImportPreview {
        blocks: count_blocks(text),
        valid: report.questions.len(),
    }
}

pub(crate) fn is_separator(line: &str) -> bool {
    line.trim() == SEPARATOR
}

#[derive(Debug, Clone, Copy)]
struct SourceLine<'a> {
    number: usize,
    text: &'a str,
}

struct Block<'a> {
    lines: Vec<SourceLine<'a>>,
}

impl Block<'_> {
    fn first_line(&self) -> usize {
        self.lines.first().map_or(1, |line| line.number)
    }
}

fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for (idx, line) in text.split('\n').enumerate() {
        if is_separator(line) {
            close_block(&mut blocks, &mut current);
            continue;
        }
        current.push(SourceLine {
            number: idx + 1,
            text: line,
        });
    }
    close_block(&mut blocks, &mut current);

    blocks
}

fn close_block<'a>(blocks: &mut Vec<Block<'a>>, current: &mut Vec<SourceLine<'a>>) {
    let lines = std::mem::take(current);
    if lines.iter().any(|line| !line.text.trim().is_empty()) {
        blocks.push(Block { lines });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Question,
    Choice(Letter),
    Answer,
    Rationale,
    OptionRationale(Letter),
    Tags,
    Evidence,
}

enum LineType<'a> {
    Field(Field, &'a str),
    Unrecognized,
}

struct BlockBuilder<'a> {
    q_index: usize,
    first_line: usize,
    prompt: String,
    choices: PerLetter<String>,
    answer: String,
    rationale: String,
    option_rationales: PerLetter<String>,
    tags: Vec<String>,
    evidence: String,
    last: Option<Field>,
    /// Non-blank, non-continuation lines, used to point diagnostics at a line.
    markers: Vec<SourceLine<'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> BlockBuilder<'a> {
    fn new(q_index: usize, first_line: usize) -> Self {
        Self {
            q_index,
            first_line,
            prompt: String::new(),
            choices: PerLetter::default(),
            answer: String::new(),
            rationale: String::new(),
            option_rationales: PerLetter::default(),
            tags: Vec::new(),
            evidence: String::new(),
            last: None,
            markers: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn process_line(&mut self, line: SourceLine<'a>) {
        if line.text.trim().is_empty() {
            return;
        }

        if let (Some(field), Some(extra)) = (self.last, line.text.strip_prefix(INDENT)) {
            self.continue_field(field, extra);
            return;
        }

        self.markers.push(line);
        let trimmed = line.text.trim();
        match Self::parse_line(trimmed) {
            LineType::Field(field, value) => self.set_field(field, value),
            LineType::Unrecognized => self.diagnostics.push(Diagnostic::new(
                self.q_index,
                line.number,
                DiagnosticKind::UnrecognizedLine(quote(trimmed)),
            )),
        }
    }

    fn parse_line(trimmed: &str) -> LineType<'_> {
        if let Some((key, value)) = split_key(trimmed) {
            if let Some(field) = field_for_key(&key) {
                return LineType::Field(field, value);
            }
        }
        if let Some((letter, value)) = split_choice(trimmed) {
            return LineType::Field(Field::Choice(letter), value);
        }
        LineType::Unrecognized
    }

    fn set_field(&mut self, field: Field, value: &str) {
        match field {
            Field::Question => self.prompt = value.to_string(),
            Field::Choice(letter) => *self.choices.get_mut(letter) = value.to_string(),
            Field::Answer => self.answer = value.trim().to_uppercase(),
            Field::Rationale => self.rationale = value.to_string(),
            Field::OptionRationale(letter) => {
                *self.option_rationales.get_mut(letter) = value.to_string()
            }
            Field::Tags => self.tags = split_tags(value).collect(),
            Field::Evidence => self.evidence = value.to_string(),
        }
        self.last = Some(field);
    }

    fn continue_field(&mut self, field: Field, extra: &str) {
        match field {
            Field::Question => append_line(&mut self.prompt, extra),
            Field::Rationale => append_line(&mut self.rationale, extra),
            Field::OptionRationale(letter) => {
                append_line(self.option_rationales.get_mut(letter), extra)
            }
            Field::Evidence => append_line(&mut self.evidence, extra),
            Field::Tags => self.tags.extend(split_tags(extra)),
            // Single-line fields swallow indented follow-ups.
            Field::Answer | Field::Choice(_) => {}
        }
    }

    /// First marker line starting with any of `prefixes`, else the block's
    /// first line.
    fn line_for(&self, prefixes: &[&str]) -> usize {
        self.markers
            .iter()
            .find(|line| {
                let upper = line.text.trim().to_uppercase();
                prefixes.iter().any(|p| upper.starts_with(p))
            })
            .map_or(self.first_line, |line| line.number)
    }

    fn require(&mut self, ok: bool, prefixes: &[&str], kind: DiagnosticKind) {
        if !ok {
            let line = self.line_for(prefixes);
            self.diagnostics
                .push(Diagnostic::new(self.q_index, line, kind));
        }
    }

    fn validate(&mut self) -> Option<Letter> {
        self.require(
            !self.prompt.trim().is_empty(),
            &["Q:"],
            DiagnosticKind::MissingQuestion,
        );
        for letter in Letter::ALL {
            let ok = !self.choices.get(letter).trim().is_empty();
            let markers = [format!("{letter})"), format!("{letter}:")];
            self.require(
                ok,
                &[markers[0].as_str(), markers[1].as_str()],
                DiagnosticKind::MissingChoice(letter),
            );
        }
        let answer = Letter::parse(&self.answer);
        self.require(
            answer.is_some(),
            &["ANS:", "ANSWER:"],
            DiagnosticKind::InvalidAnswer,
        );
        self.require(
            !self.rationale.trim().is_empty(),
            &["EXP_CORRECT:", "EXPLAIN:"],
            DiagnosticKind::MissingRationale,
        );
        for letter in Letter::ALL {
            let ok = !self.option_rationales.get(letter).trim().is_empty();
            let marker = format!("EXP_{letter}:");
            self.require(
                ok,
                &[marker.as_str()],
                DiagnosticKind::MissingOptionRationale(letter),
            );
        }
        answer
    }

    fn build(mut self, ids: &dyn IdGenerator) -> Result<Question, Vec<Diagnostic>> {
        let answer = self.validate();
        let answer = match answer {
            Some(answer) if self.diagnostics.is_empty() => answer,
            _ => return Err(self.diagnostics),
        };

        Ok(Question {
            id: ids.next_id(),
            prompt: self.prompt,
            choices: self.choices,
            answer,
            rationale: self.rationale,
            option_rationales: self.option_rationales,
            tags: self.tags,
            evidence: Some(self.evidence).filter(|e| !e.trim().is_empty()),
        })
    }
}

/// `KEY: value` where KEY is letters and underscores. The key comes back
/// uppercased.
fn split_key(line: &str) -> Option<(String, &str)> {
    let colon = line.find(':')?;
    let key = line[..colon].trim_end();
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
        return None;
    }
    Some((key.to_ascii_uppercase(), line[colon + 1..].trim_start()))
}

fn field_for_key(key: &str) -> Option<Field> {
    match key {
        "Q" => Some(Field::Question),
        "ANS" | "ANSWER" => Some(Field::Answer),
        "EXP_CORRECT" | "EXPLAIN" => Some(Field::Rationale),
        "TAGS" => Some(Field::Tags),
        "EVID" => Some(Field::Evidence),
        _ => key
            .strip_prefix("EXP_")
            .and_then(Letter::parse)
            .map(Field::OptionRationale),
    }
}

/// `A) text` or `a: text`.
fn split_choice(line: &str) -> Option<(Letter, &str)> {
    let mut chars = line.chars();
    let letter = chars.next().and_then(Letter::from_char)?;
    let rest = chars.as_str().trim_start();
    let rest = rest.strip_prefix(')').or_else(|| rest.strip_prefix(':'))?;
    Some((letter, rest.trim_start()))
}

fn split_tags(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
}

fn append_line(field: &mut String, extra: &str) {
    if !field.is_empty() {
        field.push('\n');
    }
    field.push_str(extra);
}

fn quote(line: &str) -> String {
    if line.chars().count() > QUOTE_LIMIT {
        let mut quoted: String = line.chars().take(QUOTE_LIMIT).collect();
        quoted.push('…');
        quoted
    } else {
        line.to_string()
    }
}
