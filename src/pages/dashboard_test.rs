use super::*;

fn user_with_email(email: Option<&str>) -> User {
    User {
        id: "u-1".to_owned(),
        email: email.map(ToOwned::to_owned),
        user_metadata: serde_json::Value::Null,
        last_sign_in_at: None,
    }
}

// =============================================================
// Gate and header labels
// =============================================================

#[test]
fn gate_label_reflects_check_progress() {
    assert_eq!(gate_label(true), "Loading...");
    assert_eq!(gate_label(false), "Redirecting to login...");
}

#[test]
fn identity_label_prefers_email() {
    let user = user_with_email(Some("user@example.com"));
    assert_eq!(identity_label(Some(&user)), "user@example.com");
}

#[test]
fn identity_label_falls_back_without_email() {
    let user = user_with_email(None);
    assert_eq!(identity_label(Some(&user)), "Signed in");
    assert_eq!(identity_label(None), "Signed in");
}

// =============================================================
// Count rendering
// =============================================================

#[test]
fn count_label_is_placeholder_until_baseline() {
    let state = EventsCountState::default();
    assert_eq!(count_label(&state), "...");
}

#[test]
fn count_label_shows_baseline_plus_inserts() {
    let mut state = EventsCountState::default();
    state.resolve_fetch(42);
    for _ in 0..3 {
        state.record_insert();
    }
    assert_eq!(count_label(&state), "45");
}

#[test]
fn count_label_keeps_placeholder_on_fetch_error() {
    let mut state = EventsCountState::default();
    state.fail_fetch("count query failed (500)".to_owned());
    assert_eq!(count_label(&state), "...");
}
