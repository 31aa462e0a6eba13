use super::*;

fn change_message(change_type: &str) -> ChannelMessage {
    ChannelMessage {
        topic: CHANNEL_TOPIC.to_owned(),
        event: "postgres_changes".to_owned(),
        payload: serde_json::json!({
            "data": {
                "type": change_type,
                "schema": "public",
                "table": "events",
                "record": { "id": "e-1" }
            }
        }),
        reference: None,
    }
}

// =============================================================
// Message builders
// =============================================================

#[test]
fn join_message_scopes_inserts_to_the_watched_table() {
    let msg = join_message(1);
    assert_eq!(msg.topic, CHANNEL_TOPIC);
    assert_eq!(msg.event, "phx_join");
    assert_eq!(msg.reference.as_deref(), Some("1"));
    assert_eq!(
        msg.payload["config"]["postgres_changes"],
        serde_json::json!([{ "event": "INSERT", "schema": "public", "table": "events" }])
    );
}

#[test]
fn heartbeat_message_uses_reserved_topic() {
    let msg = heartbeat_message(7);
    assert_eq!(msg.topic, HEARTBEAT_TOPIC);
    assert_eq!(msg.event, "heartbeat");
    assert_eq!(msg.reference.as_deref(), Some("7"));
}

#[test]
fn leave_message_targets_the_channel_topic() {
    let msg = leave_message(9);
    assert_eq!(msg.topic, CHANNEL_TOPIC);
    assert_eq!(msg.event, "phx_leave");
}

// =============================================================
// Insert dispatch
// =============================================================

#[test]
fn insert_on_watched_table_is_recognized() {
    assert!(is_watched_insert(&change_message("INSERT")));
}

#[test]
fn update_and_delete_changes_are_ignored() {
    assert!(!is_watched_insert(&change_message("UPDATE")));
    assert!(!is_watched_insert(&change_message("DELETE")));
}

#[test]
fn changes_on_other_tables_or_schemas_are_ignored() {
    let mut msg = change_message("INSERT");
    msg.payload["data"]["table"] = serde_json::json!("orders");
    assert!(!is_watched_insert(&msg));

    let mut msg = change_message("INSERT");
    msg.payload["data"]["schema"] = serde_json::json!("audit");
    assert!(!is_watched_insert(&msg));
}

#[test]
fn foreign_topics_and_events_are_ignored() {
    let mut msg = change_message("INSERT");
    msg.topic = "realtime:other".to_owned();
    assert!(!is_watched_insert(&msg));

    let mut msg = change_message("INSERT");
    msg.event = "phx_reply".to_owned();
    assert!(!is_watched_insert(&msg));
}

#[test]
fn legacy_flat_payload_is_accepted() {
    let msg = ChannelMessage {
        topic: CHANNEL_TOPIC.to_owned(),
        event: "postgres_changes".to_owned(),
        payload: serde_json::json!({ "type": "INSERT", "schema": "public", "table": "events" }),
        reference: None,
    };
    assert!(is_watched_insert(&msg));
}

#[test]
fn apply_message_bumps_count_only_for_inserts() {
    let mut state = EventsCountState::default();
    state.resolve_fetch(42);

    assert!(apply_message(&mut state, &change_message("INSERT")));
    assert!(apply_message(&mut state, &change_message("INSERT")));
    assert!(apply_message(&mut state, &change_message("INSERT")));
    assert!(!apply_message(&mut state, &change_message("DELETE")));

    assert_eq!(state.displayed(), Some(45));
}

#[test]
fn apply_message_buffers_inserts_before_baseline() {
    let mut state = EventsCountState::default();
    assert!(apply_message(&mut state, &change_message("INSERT")));
    assert_eq!(state.displayed(), None);

    state.resolve_fetch(10);
    assert_eq!(state.displayed(), Some(11));
}

// =============================================================
// Handle release
// =============================================================

#[test]
fn handle_release_is_observable_and_idempotent() {
    let handle = RealtimeHandle::new();
    assert!(!handle.is_released());

    handle.release();
    assert!(handle.is_released());
    handle.release();
    assert!(handle.is_released());
}

#[test]
fn handle_clones_share_the_release_flag() {
    let handle = RealtimeHandle::new();
    let clone = handle.clone();
    clone.release();
    assert!(handle.is_released());
}
