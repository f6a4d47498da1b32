//! Question identifier generation.

use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of unique question ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random UUIDs from the OS entropy source, falling back to
/// [`CompositeIds`] when the OS cannot provide randomness.
#[derive(Debug, Default)]
pub struct RandomIds {
    fallback: CompositeIds,
}

impl IdGenerator for RandomIds {
    fn next_id(&self) -> String {
        let mut bytes = [0u8; 16];
        match OsRng.try_fill_bytes(&mut bytes) {
            Ok(()) => uuid::Builder::from_random_bytes(bytes)
                .into_uuid()
                .to_string(),
            Err(_) => self.fallback.next_id(),
        }
    }
}

/// `<millis>-<counter>-<random>` ids.
#[derive(Debug, Default)]
pub struct CompositeIds {
    counter: AtomicU64,
}

impl IdGenerator for CompositeIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!(
            "{}-{}-{:08x}",
            Utc::now().timestamp_millis(),
            n,
            rand::random::<u32>()
        )
    }
}

/// Predictable `<prefix>-<n>` ids for tests and fixtures.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}
