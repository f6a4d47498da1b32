//! Best-effort cleanup of pasted markup before parsing.
//!
//! Rewrites misspelled or oddly cased keys at the start of a line to their
//! canonical form and makes sure the text ends with a separator. Indented
//! continuation lines are left as written. Nothing is validated here; the
//! parser remains the authority.

use std::borrow::Cow;

use crate::parser::{is_separator, INDENT, SEPARATOR};

/// Keys recognized at line start (compared uppercased) and their canonical form.
const KEY_REWRITES: &[(&str, &str)] = &[
    ("Q", "Q"),
    ("ANS", "ANS"),
    ("ANSWER", "ANS"),
    ("EXP_CORRECT", "EXP_CORRECT"),
    ("EXPLAIN", "EXP_CORRECT"),
    ("EXPLANATION", "EXP_CORRECT"),
    ("EXP_A", "EXP_A"),
    ("EXP_B", "EXP_B"),
    ("EXP_C", "EXP_C"),
    ("EXP_D", "EXP_D"),
    ("TAGS", "TAGS"),
    ("TAG", "TAGS"),
    ("EVID", "EVID"),
    ("EVIDENCE", "EVID"),
];

/// Return a cleaned-up copy of `text`.
pub fn autofix(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let mut in_block = false;
    let fixed = normalized
        .split('\n')
        .map(|line| {
            if is_separator(line) {
                in_block = false;
                return Cow::Borrowed(line);
            }
            if line.trim().is_empty() || (in_block && line.starts_with(INDENT)) {
                return Cow::Borrowed(line);
            }
            in_block = true;
            fix_line(line)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let trimmed = fixed.trim();
    if !trimmed.is_empty() && !trimmed.ends_with(SEPARATOR) {
        format!("{trimmed}\n{SEPARATOR}\n")
    } else {
        fixed
    }
}

fn fix_line(line: &str) -> Cow<'_, str> {
    let body = line.trim_start();
    let Some(colon) = body.find(':') else {
        return Cow::Borrowed(line);
    };
    let key = body[..colon].trim_end().to_ascii_uppercase();
    match canonical_key(&key) {
        Some(canonical) => Cow::Owned(format!("{canonical}:{}", &body[colon + 1..])),
        None => Cow::Borrowed(line),
    }
}

fn canonical_key(key: &str) -> Option<&'static str> {
    KEY_REWRITES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    #[test]
    fn rewrites_keys_and_appends_separator() {
        let input = "q: x\r\n answer : b\nExplain: why\ntag: one\n";
        assert_eq!(
            autofix(input),
            "Q: x\nANS: b\nEXP_CORRECT: why\nTAGS: one\n---\n"
        );
    }

    #[test]
    fn continuation_lines_are_not_rewritten() {
        let input = "\
Q: Which table?
  Evidence: table 2
EXP_CORRECT: see below
  tag: not a tag line
---
  q: first line of a block
";
        assert_eq!(
            autofix(input),
            "\
Q: Which table?
  Evidence: table 2
EXP_CORRECT: see below
  tag: not a tag line
---
Q: first line of a block
---
"
        );

    }

    #[test]
    fn indented_prompt_continuation_survives_parse() {
        let input = "\
q: Which table?
  Evidence: table 2
A) one
B) two
C) three
D) four
answer: b
explanation: it is listed
exp_a: a
exp_b: b
exp_c: c
exp_d: d";
        let report = parse(&autofix(input));
        assert!(report.is_clean(), "{:?}", report.diagnostics);
        assert_eq!(report.questions[0].prompt, "Which table?\nEvidence: table 2");
        assert_eq!(report.questions[0].evidence, None);
    }

    #[test]
    fn leaves_choice_lines_and_text_alone() {
        let input = "a: apple\nB) banana\nsome text: with colon\n---";
        assert_eq!(autofix(input), input);
    }

    #[test]
    fn existing_separator_is_kept() {
        let input = "Q: x\n---\n\n";
        assert_eq!(autofix(input), input);
    }

    #[test]
    fn empty_text_stays_empty() {
        assert_eq!(autofix("   \n"), "   \n");
    }

    #[test]
    fn fixed_text_parses() {
        let input = "\
q: 2+2?
A) 3
B) 4
C) 5
D) 6
answer: b
explanation: four
exp_a: low
exp_b: right
exp_c: high
exp_d: high
evidence: notes";
        let report = parse(&autofix(input));
        assert!(report.is_clean(), "{:?}", report.diagnostics);
        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.questions[0].evidence.as_deref(), Some("notes"));
    }
}
