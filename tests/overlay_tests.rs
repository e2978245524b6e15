//! End-to-end scenarios: inbound JSON lines through the overlay to render effects.

mod common;

use std::sync::Arc;
use std::time::Instant;

use chat_overlay::{
    BodySegment, HighlightKind, NoGeometry, Overlay, OverlayConfig, Platform, RemovalReason,
    RenderEffect, Rgb,
};
use common::{appended, overlay_with, overlay_with_pronouns, removals, twitch_line, visible_ids};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_twitch_emote_scenario() {
    let overlay = overlay_with(|_| {});
    let line = json!({
        "event": "twitch_chat_message",
        "id": "m1",
        "user_id": "42",
        "user_name": "someone",
        "color": "#1e90ff",
        "message": "hi :) <b>",
        "emotes": [{"id": "1", "start": 3, "end": 4}],
    });
    let effects = overlay.handle_line(&line.to_string());
    assert_eq!(effects.last(), Some(&RenderEffect::ScrollToNewest));

    let message = appended(&effects).expect("message appended");
    assert_eq!(message.platform, Platform::Twitch);
    assert_eq!(
        message.body,
        vec![
            BodySegment::text("hi "),
            BodySegment::media(
                "https://static-cdn.jtvnw.net/emoticons/v2/1/default/dark/1.0",
                ":)"
            ),
            BodySegment::text(" &#60;b&#62;"),
        ]
    );
    assert_eq!(message.background.to_hex(), "#1e90ff");
}

#[test]
fn test_excluded_by_prefix_and_bot() {
    let overlay = overlay_with(|c| {
        c.cmdprefix = Some("!".to_string());
        c.bots = vec!["nightbot".to_string()];
    });
    assert!(overlay.handle_line(&twitch_line("m1", "1", "viewer", "!skip this")).is_empty());
    assert!(overlay.handle_line(&twitch_line("m2", "2", "Nightbot", "hello")).is_empty());
    assert!(overlay.snapshot().is_empty());

    overlay.handle_line(&twitch_line("m3", "1", "viewer", "hello"));
    assert_eq!(visible_ids(&overlay), vec!["m3"]);
}

#[test]
fn test_green_announcement_ignores_author_color() {
    let overlay = overlay_with(|_| {});
    let line = json!({
        "event": "twitch_announcement",
        "id": "a1",
        "user_id": "42",
        "user_name": "mod",
        "color": "#ff0000",
        "message": "raid incoming",
        "color_name": "green",
    });
    let effects = overlay.handle_line(&line.to_string());
    let message = appended(&effects).expect("announcement appended");
    assert_eq!(message.highlight, HighlightKind::Announcement);
    assert_eq!(message.background.to_hex(), "#00ff00");
    assert_eq!(message.foreground, Rgb::BLACK);
    assert_eq!(
        message.body.first(),
        Some(&BodySegment::text("&#128226; Announcement: "))
    );
}

#[test]
fn test_youtube_and_trovo_share_the_canonical_shape() {
    let overlay = overlay_with(|c| c.platforms = true);
    let youtube = json!({
        "event": "youtube_chat_message",
        "id": "y1",
        "channel_id": "UC1",
        "author_name": "Viewer",
        "message": "hello :yt:",
        "emotes": [{"token": ":yt:", "url": "https://yt.example/e.png"}],
    });
    let trovo = json!({
        "event": "trovo_chat_message",
        "id": "t1",
        "user_id": "77",
        "nickname": "Trover",
        "message": "gg",
    });

    let y = overlay.handle_line(&youtube.to_string());
    let y = appended(&y).expect("youtube appended");
    assert_eq!(y.author_id, "UC1");
    assert_eq!(y.annotation.as_deref(), Some("(YouTube)"));
    assert_eq!(y.badges.len(), 1);
    assert_eq!(y.background.to_hex(), "#ff0000");
    assert_eq!(
        y.body,
        vec![
            BodySegment::text("hello "),
            BodySegment::media("https://yt.example/e.png", ":yt:"),
        ]
    );

    let t = overlay.handle_line(&trovo.to_string());
    let t = appended(&t).expect("trovo appended");
    assert_eq!(t.author_name, "Trover");
    assert_eq!(t.annotation.as_deref(), Some("(Trovo)"));
    assert_eq!(t.background.to_hex(), "#1bc878");

    assert_eq!(visible_ids(&overlay), vec!["y1", "t1"]);
}

#[test]
fn test_pronoun_annotation() {
    let overlay = overlay_with_pronouns(&[("someone", "She/Her")], |c| c.pronouns = true);
    let effects = overlay.handle_line(&twitch_line("m1", "1", "someone", "hi"));
    assert_eq!(
        appended(&effects).and_then(|m| m.annotation.as_deref()),
        Some("She/Her")
    );

    let effects = overlay.handle_line(&twitch_line("m2", "2", "stranger", "hi"));
    assert_eq!(appended(&effects).and_then(|m| m.annotation.clone()), None);
}

#[test]
fn test_failure_on_one_event_does_not_stop_the_next() {
    let overlay = overlay_with(|_| {});
    let lines = [
        "garbage".to_string(),
        json!({"event": "unknown_kind"}).to_string(),
        twitch_line("", "1", "viewer", "no id"),
        twitch_line("m1", "", "viewer", "no author"),
        twitch_line("m2", "1", "viewer", "fine"),
    ];
    let effects: Vec<RenderEffect> = lines.iter().flat_map(|l| overlay.handle_line(l)).collect();
    assert_eq!(effects.len(), 2);
    assert_eq!(visible_ids(&overlay), vec!["m2"]);
}

#[test]
fn test_duplicate_event_is_silent() {
    let overlay = overlay_with(|_| {});
    overlay.handle_line(&twitch_line("m1", "1", "viewer", "once"));
    assert!(overlay.handle_line(&twitch_line("m1", "1", "viewer", "twice")).is_empty());
    assert_eq!(overlay.snapshot().len(), 1);
}

#[test]
fn test_capacity_prune_through_overlay() {
    let overlay = overlay_with(|c| c.max_messages = Some(2));
    for i in 0..4 {
        overlay.handle_line(&twitch_line(&format!("m{i}"), "1", "viewer", "x"));
    }
    let effects = overlay.prune(Instant::now(), &NoGeometry);
    assert_eq!(
        removals(&effects),
        vec![
            ("m0".to_string(), RemovalReason::Capacity),
            ("m1".to_string(), RemovalReason::Capacity),
        ]
    );
    assert_eq!(visible_ids(&overlay), vec!["m2", "m3"]);
}

#[test]
fn test_effects_serialize_as_tagged_json() {
    let overlay = overlay_with(|_| {});
    let effects = overlay.handle_line(&twitch_line("m1", "1", "viewer", "hi"));
    let encoded: Vec<serde_json::Value> = effects
        .iter()
        .map(|e| serde_json::to_value(e).unwrap())
        .collect();
    assert_eq!(encoded[0]["effect"], "append");
    assert_eq!(encoded[0]["message"]["id"], "m1");
    assert_eq!(encoded[0]["message"]["platform"], "twitch");
    assert_eq!(encoded[1], json!({"effect": "scroll_to_newest"}));

    let line = json!({"event": "message_deleted", "message_id": "m1"}).to_string();
    let removed = overlay.handle_line(&line);
    assert_eq!(
        serde_json::to_value(&removed[0]).unwrap(),
        json!({"effect": "remove", "id": "m1", "reason": "moderation"})
    );
}

#[test]
fn test_overlay_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "max_messages: 1\ncolors:\n  message: \"#ffffff\"\n  background: transparent\n",
    )
    .unwrap();

    let config = OverlayConfig::load(&path).unwrap();
    let overlay = Overlay::with_pronouns(Arc::new(config), None);
    assert_eq!(overlay.theme().background, "transparent");

    let effects = overlay.handle_line(&twitch_line("m1", "1", "viewer", "hi"));
    let message = appended(&effects).unwrap();
    assert_eq!(message.background, Rgb::WHITE);
    assert_eq!(message.foreground, Rgb::BLACK);
}
