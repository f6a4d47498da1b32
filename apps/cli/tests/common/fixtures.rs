//! Test fixtures and factory functions for quiz markup.

use std::path::PathBuf;

pub const TWO_PLUS_TWO: &str = "\
Q: 2+2=?
A) 3
B) 4
C) 5
D) 6
ANS: B
EXP_CORRECT: Because 2+2 equals 4.
EXP_A: Too low.
EXP_B: Correct sum.
EXP_C: Too high.
EXP_D: Too high.
---
";

/// Generate `count` well-formed blocks. Answers cycle A, B, C, D; tags
/// alternate `even`/`odd`.
pub fn sample_quiz(count: usize) -> String {
    (0..count).map(sample_block).collect()
}

fn sample_block(i: usize) -> String {
    let ans = ['A', 'B', 'C', 'D'][i % 4];
    let tag = if i % 2 == 0 { "even" } else { "odd" };
    format!(
        "Q: Question {}?\nA) alpha\nB) beta\nC) gamma\nD) delta\nANS: {ans}\n\
         EXP_CORRECT: Because.\nEXP_A: a.\nEXP_B: b.\nEXP_C: c.\nEXP_D: d.\n\
         TAGS: {tag}\n---\n",
        i + 1
    )
}

/// Three blocks where the second lacks choice C.
pub fn missing_choice_quiz() -> String {
    let broken = sample_block(1).replace("C) gamma\n", "");
    format!("{}{broken}{}", sample_block(0), sample_block(2))
}

/// Unique path in the temp directory for this test process.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("quizcraft-{}-{name}", std::process::id()))
}
