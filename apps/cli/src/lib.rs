//! `quizcraft`: a terminal shell over quiz-core.

pub mod boot;
pub mod commands;
pub mod config;
pub mod db;
pub mod drafts;
pub mod persist;
pub mod render;
pub mod state;

use quiz_core::{Route, SessionContext, ShareCodec};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::Outcome;
use crate::config::Config;
use crate::db::{KeyValueStore, MemoryStore, SqliteStore};
use crate::state::AppState;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    let store = open_store(&config);
    let codec = if config.compression {
        ShareCodec::gzip()
    } else {
        ShareCodec::plain()
    };

    let fragment = std::env::args().nth(1);
    let (session, source) = boot::boot(fragment.as_deref(), &codec, store.as_ref());
    info!(source = source.as_str(), route = ?session.route(), "session ready");

    let drafts = persist::load_drafts(store.as_ref());
    let mut state =
        AppState::new(config, store, codec, SessionContext::new(), session).with_drafts(drafts);
    repl(&mut state).await
}

/// The database when it opens, an in-memory store otherwise.
fn open_store(config: &Config) -> Box<dyn KeyValueStore> {
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    match SqliteStore::open(&config.db_path) {
        Ok(store) => {
            info!(path = %config.db_path.display(), "opened session store");
            Box::new(store)
        }
        Err(e) => {
            warn!(
                path = %config.db_path.display(),
                error = %e,
                "session store unavailable, not persisting"
            );
            Box::new(MemoryStore::new())
        }
    }
}

/// Read commands and tick the timer until input ends or the user quits.
async fn repl(state: &mut AppState) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(state.config().tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    println!("{}\n", state.render());
    println!("Type `help` for commands.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    state.persist();
                    break;
                };
                match commands::handle_line(state, &line) {
                    Outcome::Quit => break,
                    Outcome::Reply(text) if text.is_empty() => {}
                    Outcome::Reply(text) => println!("{text}\n"),
                }
            }
            _ = ticker.tick() => {
                if state.session().route() == Route::Quiz {
                    state.tick();
                }
            }
        }
    }

    info!("bye");
    Ok(())
}
