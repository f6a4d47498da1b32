//! Capabilities the session engine draws on: time, randomness, ids.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use crate::ids::{IdGenerator, RandomIds, SequentialIds};
use crate::time::Clock;

pub struct SessionContext {
    clock: Clock,
    rng: StdRng,
    ids: Arc<dyn IdGenerator>,
}

impl SessionContext {
    /// System clock, OS-seeded shuffles, random ids.
    pub fn new() -> Self {
        Self {
            clock: Clock::System,
            rng: StdRng::from_entropy(),
            ids: Arc::new(RandomIds::default()),
        }
    }

    /// Fixed seed and sequential ids, for reproducible runs.
    pub fn deterministic(seed: u64, clock: Clock) -> Self {
        Self {
            clock,
            rng: StdRng::seed_from_u64(seed),
            ids: Arc::new(SequentialIds::new("q")),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
