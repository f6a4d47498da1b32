//! Error types for quiz-core.

use thiserror::Error;

use crate::types::Letter;

/// Markup defects. The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error("Unrecognized line: \"{0}\"")]
    UnrecognizedLine(String),

    #[error("Missing Q: (question text).")]
    MissingQuestion,

    #[error("Missing choice {0})")]
    MissingChoice(Letter),

    #[error("ANS must be A, B, C, or D.")]
    InvalidAnswer,

    #[error("Missing EXP_CORRECT:")]
    MissingRationale,

    #[error("Missing EXP_{0}:")]
    MissingOptionRationale(Letter),
}

/// A session that breaks a structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("route {0} requires a loaded quiz")]
    MissingQuiz(&'static str),

    #[error("quiz has no questions")]
    EmptyQuiz,

    #[error("ordering is empty")]
    EmptyOrdering,

    #[error("ordering index {index} out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("ordering repeats index {0}")]
    DuplicateIndex(usize),

    #[error("position {position} outside ordering of length {len}")]
    PositionOutOfRange { position: usize, len: usize },
}

/// Failure to serialize a session.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Every way a share token can fail to decode.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("token has no mode separator")]
    MissingSeparator,

    #[error("token payload is empty")]
    EmptyPayload,

    #[error("unknown token mode {0:?}")]
    UnknownMode(String),

    #[error("invalid base64url payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("compressed token but no decompressor is available")]
    DecompressionUnavailable,

    #[error("decompression failed: {0}")]
    Decompression(#[source] std::io::Error),

    #[error("payload exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid session: {0}")]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_messages() {
        assert_eq!(
            DiagnosticKind::MissingChoice(Letter::C).to_string(),
            "Missing choice C)"
        );
        assert_eq!(
            DiagnosticKind::MissingOptionRationale(Letter::D).to_string(),
            "Missing EXP_D:"
        );
        assert_eq!(
            DiagnosticKind::UnrecognizedLine("hello".into()).to_string(),
            "Unrecognized line: \"hello\""
        );
    }

    #[test]
    fn decode_error_display() {
        let error = DecodeError::UnknownMode("z".into());
        assert_eq!(error.to_string(), "unknown token mode \"z\"");
    }
}
