//! Application state.

use quiz_core::{
    Action, LoadOutcome, ParseReport, ReviewFilter, Route, Session, SessionContext, ShareCodec,
};
use tracing::{debug, info};

use crate::config::Config;
use crate::db::KeyValueStore;
use crate::drafts::{Drafts, Surface};
use crate::persist;
use crate::render;

/// Sole owner of the session and the authoring drafts. Every mutation goes through here, one at a
/// time, and is persisted afterwards.
pub struct AppState {
    session: Session,
    ctx: SessionContext,
    store: Box<dyn KeyValueStore>,
    codec: ShareCodec,
    config: Config,
    drafts: Drafts,
    pasting: bool,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Box<dyn KeyValueStore>,
        codec: ShareCodec,
        ctx: SessionContext,
        session: Session,
    ) -> Self {
        Self {
            session,
            ctx,
            store,
            codec,
            config,
            drafts: Drafts::default(),
            pasting: false,
        }
    }

    /// Start with previously saved authoring text.
    pub fn with_drafts(mut self, drafts: Drafts) -> Self {
        self.drafts = drafts;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn codec(&self) -> &ShareCodec {
        &self.codec
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Apply a user action and persist the result.
    pub fn dispatch(&mut self, action: Action) {
        debug!(?action, "dispatch");
        self.session.apply(action, &mut self.ctx);
        self.persist();
    }

    /// Refresh the elapsed time. Not persisted; returns whether it changed.
    pub fn tick(&mut self) -> bool {
        let before = self.session.elapsed_ms();
        self.session.apply(Action::Tick, &mut self.ctx);
        self.session.elapsed_ms() != before
    }

    /// Start a quiz from the active surface's text, tagged with that surface.
    pub fn load_draft(&mut self) -> LoadOutcome {
        let source = self.drafts.active().source();
        let outcome = self
            .session
            .load(self.drafts.current(), source, &mut self.ctx);
        match &outcome {
            LoadOutcome::Loaded { questions } => {
                info!(questions, source = source.as_str(), "quiz loaded");
                self.persist();
            }
            LoadOutcome::Rejected(report) => {
                debug!(diagnostics = report.diagnostics.len(), "quiz rejected");
            }
        }
        outcome
    }

    /// Enter the review subset for `filter`; false when nothing matched.
    pub fn review(&mut self, filter: ReviewFilter) -> bool {
        debug!(?filter, "review");
        let matched = self.session.review(filter);
        self.persist();
        matched
    }

    /// A fresh session over `text`, leaving the current one alone.
    pub fn shared_session(&mut self, text: &str) -> Result<Session, ParseReport> {
        Session::shared_from_text(text, &mut self.ctx)
    }

    pub fn replace_session(&mut self, session: Session) {
        self.session = session;
        self.persist();
    }

    /// Back to a fresh session with nothing persisted.
    pub fn reset(&mut self) {
        self.session.apply(Action::Reset, &mut self.ctx);
        persist::clear(self.store.as_ref());
        info!("session reset");
    }

    pub fn persist(&self) -> bool {
        persist::save(self.store.as_ref(), &self.session)
    }

    pub fn drafts(&self) -> &Drafts {
        &self.drafts
    }

    /// Text of the active surface.
    pub fn draft(&self) -> &str {
        self.drafts.current()
    }

    pub fn set_draft(&mut self, text: String) {
        *self.drafts.current_mut() = text;
        self.save_drafts();
    }

    pub fn select_surface(&mut self, surface: Surface) {
        self.drafts.select(surface);
        self.save_drafts();
    }

    fn save_drafts(&self) -> bool {
        persist::save_drafts(self.store.as_ref(), &self.drafts)
    }

    pub fn is_pasting(&self) -> bool {
        self.pasting
    }

    /// Start collecting a new draft line by line.
    pub fn start_paste(&mut self) {
        self.drafts.current_mut().clear();
        self.pasting = true;
    }

    pub fn push_paste_line(&mut self, line: &str) {
        let draft = self.drafts.current_mut();
        draft.push_str(line);
        draft.push('\n');
    }

    pub fn end_paste(&mut self) {
        self.pasting = false;
        self.save_drafts();
    }

    /// The current screen.
    pub fn render(&mut self) -> String {
        let screen = render::screen(&self.session, self.ctx.rng());
        if self.session.route() == Route::Import {
            format!("{screen}\n{}", render::surfaces(&self.drafts))
        } else {
            screen
        }
    }
}
