//! Core quiz library used by the `quizcraft` shell.
//!
//! Provides:
//! - Tolerant parser for the quiz markup with line-accurate diagnostics
//! - Autofix normalizer for pasted markup
//! - Session engine (answering, flags, navigation, scoring, review)
//! - Share codec for packing a whole session into a URL-safe token
//!
//! Nothing in this crate performs I/O. Time, randomness and id generation
//! come in through [`SessionContext`].

pub mod autofix;
pub mod codec;
pub mod context;
pub mod error;
pub mod ids;
pub mod parser;
pub mod session;
pub mod time;
pub mod types;
pub mod views;

pub use autofix::autofix;
pub use codec::{
    export_snapshot, share_url, token_from_fragment, Compressor, Gzip, NoCompression, ShareCodec,
};
pub use context::SessionContext;
pub use error::{DecodeError, DiagnosticKind, EncodeError, SessionError};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use parser::{count_blocks, parse, parse_with, preview};
pub use session::{reduce, Action, LoadOutcome, Nav, Session};
pub use time::{format_elapsed, Clock};
pub use types::{
    Answer, Diagnostic, ImportPreview, Letter, Mode, OptionFeedback, ParseReport, PerLetter,
    Question, Quiz, QuizMeta, QuizSource, ReviewFilter, Route, Score, Settings,
};
pub use views::{CellStatus, Feedback, ProgressCell, QuestionView, ResultsView, ReviewEntry};
