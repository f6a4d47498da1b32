//! Share links, opening them, and snapshot export.

mod common;

use pretty_assertions::assert_eq;
use quiz_core::codec::plain_payload;
use quiz_core::{token_from_fragment, QuizSource, Route, Session, ShareCodec};
use quizcraft::persist;

use common::{fixtures, TestApp};

fn answered_app() -> TestApp {
    let mut app = TestApp::new();
    app.load(&fixtures::sample_quiz(3));
    app.send("a");
    app.send("flag");
    app.send("n");
    app
}

#[test]
fn share_link_carries_the_whole_session() {
    let mut app = answered_app();
    let url = app.send("share");
    assert!(url.starts_with("https://quiz.test/#q=g."), "{url}");

    let token = token_from_fragment(&url).unwrap();
    assert_eq!(ShareCodec::gzip().decode(token).as_ref(), Some(app.session()));
}

#[test]
fn compression_off_emits_plain_tokens() {
    let mut app = TestApp::with_codec(ShareCodec::plain());
    app.load(&fixtures::sample_quiz(2));
    let url = app.send("share");
    assert!(url.starts_with("https://quiz.test/#q=p."), "{url}");
}

#[test]
fn open_replaces_and_persists_the_session() {
    let mut sender = answered_app();
    let url = sender.send("share");

    let mut receiver = TestApp::new();
    receiver.load(fixtures::TWO_PLUS_TWO);
    let reply = receiver.send(&format!("open {url}"));
    assert!(reply.starts_with("Opened shared quiz."), "{reply}");
    assert_eq!(receiver.session(), sender.session());
    assert_eq!(
        persist::load(receiver.state.store()).as_ref(),
        Some(sender.session())
    );
}

#[test]
fn bad_link_leaves_session_alone() {
    let mut app = answered_app();
    let before = app.session().clone();

    assert_eq!(app.send("open #q=g.bogus"), "Could not open that share link.");
    assert_eq!(app.send("open p.e30"), "Could not open that share link.");
    assert_eq!(app.session(), &before);
}

#[test]
fn share_requires_a_quiz() {
    let mut app = TestApp::new();
    assert_eq!(app.send("share"), "Load a quiz before sharing.");
}

#[test]
fn share_text_builds_a_fresh_session() {
    let path = fixtures::temp_path("shared.md");
    std::fs::write(&path, fixtures::TWO_PLUS_TWO).unwrap();

    let mut app = answered_app();
    let before = app.session().clone();
    let url = app.send(&format!("share-text {}", path.display()));
    std::fs::remove_file(&path).ok();

    let shared = ShareCodec::gzip()
        .decode(token_from_fragment(&url).unwrap())
        .unwrap();
    assert_eq!(shared.route(), Route::Quiz);
    assert_eq!(shared.quiz().unwrap().len(), 1);
    assert_eq!(shared.quiz().unwrap().meta.source, QuizSource::SharedText);
    assert!(shared.answers().is_empty());
    assert_eq!(app.session(), &before);
}

#[test]
fn share_text_defaults_to_the_active_draft() {
    let mut app = TestApp::new();
    app.send("tab paste");
    app.paste(&fixtures::sample_quiz(2));

    let url = app.send("share-text");
    let shared = ShareCodec::gzip()
        .decode(token_from_fragment(&url).unwrap())
        .unwrap();
    assert_eq!(shared.quiz().unwrap().len(), 2);
    assert_eq!(app.session(), &Session::default());
}

#[test]
fn share_text_reports_markup_problems() {
    let path = fixtures::temp_path("broken-share.md");
    std::fs::write(&path, fixtures::missing_choice_quiz()).unwrap();

    let mut app = TestApp::new();
    let reply = app.send(&format!("share-text {}", path.display()));
    std::fs::remove_file(&path).ok();

    assert!(reply.starts_with("Fix these problems"), "{reply}");
    assert!(reply.contains("Missing choice C)"), "{reply}");
}

#[test]
fn export_matches_plain_share_payload() {
    let path = fixtures::temp_path("export.json");
    let mut app = answered_app();

    let reply = app.send(&format!("export {}", path.display()));
    assert_eq!(reply, format!("Exported to {}", path.display()));

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).ok();
    let payload: serde_json::Value =
        serde_json::from_slice(&plain_payload(app.session()).unwrap()).unwrap();
    assert_eq!(exported, payload);

    let restored: Session = serde_json::from_value(exported).unwrap();
    assert_eq!(&restored, app.session());
}

#[test]
fn export_failure_is_a_signal_only() {
    let mut app = answered_app();
    let before = app.session().clone();

    let reply = app.send("export /nonexistent-quizcraft-dir/out.json");
    assert_eq!(reply, "Export failed.");
    assert_eq!(app.session(), &before);
}
