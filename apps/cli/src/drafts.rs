//! The two authoring surfaces and their unsaved markup.
//!
//! The generator surface holds output pasted back from an external
//! generator; the paste surface holds hand-written markup. Each keeps its
//! own text, and a load is tagged with the surface it came from.

use quiz_core::QuizSource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Generator,
    Paste,
}

impl Default for Surface {
    fn default() -> Self {
        Self::Generator
    }
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generator => "generator",
            Self::Paste => "paste",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "generator" | "gen" => Some(Self::Generator),
            "paste" => Some(Self::Paste),
            _ => None,
        }
    }

    /// Source recorded on a quiz loaded from this surface.
    pub fn source(&self) -> QuizSource {
        match self {
            Self::Generator => QuizSource::Generator,
            Self::Paste => QuizSource::Paste,
        }
    }

    /// Skeleton block inserted by `template`.
    pub fn template(&self) -> &'static str {
        match self {
            Self::Generator => GENERATOR_TEMPLATE,
            Self::Paste => PASTE_TEMPLATE,
        }
    }
}

const GENERATOR_TEMPLATE: &str = "\
Q: <question text>
A) <choice text>
B) <choice text>
C) <choice text>
D) <choice text>
ANS: <A|B|C|D>
EXP_CORRECT: <why correct is correct>
EXP_A: <why A is right/wrong>
EXP_B: <why B is right/wrong>
EXP_C: <why C is right/wrong>
EXP_D: <why D is right/wrong>
EVID: <optional source cue>
TAGS: <optional tags>
---
";

const PASTE_TEMPLATE: &str = "\
Q: <question text>
A) <choice text>
B) <choice text>
C) <choice text>
D) <choice text>
ANS: <A|B|C|D>
EXP_CORRECT: <why correct is correct>
EXP_A: <why A is right/wrong>
EXP_B: <why B is right/wrong>
EXP_C: <why C is right/wrong>
EXP_D: <why D is right/wrong>
---
";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Drafts {
    active: Surface,
    generator: String,
    paste: String,
}

impl Drafts {
    pub fn active(&self) -> Surface {
        self.active
    }

    pub fn select(&mut self, surface: Surface) {
        self.active = surface;
    }

    pub fn text(&self, surface: Surface) -> &str {
        match surface {
            Surface::Generator => &self.generator,
            Surface::Paste => &self.paste,
        }
    }

    /// Text of the active surface.
    pub fn current(&self) -> &str {
        self.text(self.active)
    }

    pub fn current_mut(&mut self) -> &mut String {
        match self.active {
            Surface::Generator => &mut self.generator,
            Surface::Paste => &mut self.paste,
        }
    }
}
