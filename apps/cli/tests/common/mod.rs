//! Common test utilities for integration tests.
//!
//! Builds an [`AppState`] over an in-memory store with a fixed clock, seeded
//! randomness and sequential ids, and drives it line by line.

#![allow(dead_code)]

pub mod fixtures;

use quiz_core::time::fixed_now;
use quiz_core::{Clock, QuizSource, Session, SessionContext, ShareCodec};
use quizcraft::commands::{handle_line, Outcome};
use quizcraft::config::Config;
use quizcraft::db::{KeyValueStore, MemoryStore, StoreError};
use quizcraft::state::AppState;

pub fn test_context() -> SessionContext {
    SessionContext::deterministic(42, Clock::fixed(fixed_now()))
}

pub fn test_config() -> Config {
    Config {
        db_path: fixtures::temp_path("unused.db"),
        share_base_url: "https://quiz.test/".to_string(),
        ..Config::default()
    }
}

/// A session loaded from `count` generated questions.
pub fn loaded_session(count: usize) -> Session {
    let mut ctx = test_context();
    let mut session = Session::new();
    session.load(&fixtures::sample_quiz(count), QuizSource::Paste, &mut ctx);
    session
}

/// An application driven the way the terminal loop drives it.
pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    pub fn with_store(store: Box<dyn KeyValueStore>) -> Self {
        Self::build(store, ShareCodec::gzip())
    }

    pub fn with_codec(codec: ShareCodec) -> Self {
        Self::build(Box::new(MemoryStore::new()), codec)
    }

    fn build(store: Box<dyn KeyValueStore>, codec: ShareCodec) -> Self {
        let state = AppState::new(
            test_config(),
            store,
            codec,
            test_context(),
            Session::default(),
        );
        Self { state }
    }

    /// Send one line and return the reply.
    pub fn send(&mut self, line: &str) -> String {
        match handle_line(&mut self.state, line) {
            Outcome::Reply(text) => text,
            Outcome::Quit => "<quit>".to_string(),
        }
    }

    /// Enter paste mode, send `text`, and close the paste.
    pub fn paste(&mut self, text: &str) -> String {
        self.send("paste");
        for line in text.lines() {
            self.send(line);
        }
        self.send(".")
    }

    /// Paste `text` and start it.
    pub fn load(&mut self, text: &str) -> String {
        self.paste(text);
        self.send("load")
    }

    pub fn session(&self) -> &Session {
        self.state.session()
    }
}

/// A store whose every call fails.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery))
    }
}
