use super::*;

// =============================================================
// Error-message extraction
// =============================================================

#[test]
fn auth_error_message_prefers_error_description() {
    let body = r#"{"error_description":"Invalid login credentials","error":"invalid_grant"}"#;
    assert_eq!(auth_error_message(400, body), "Invalid login credentials");
}

#[test]
fn auth_error_message_accepts_msg_and_message_keys() {
    assert_eq!(auth_error_message(401, r#"{"msg":"Token expired"}"#), "Token expired");
    assert_eq!(auth_error_message(422, r#"{"message":"Email not confirmed"}"#), "Email not confirmed");
}

#[test]
fn auth_error_message_falls_back_to_status() {
    assert_eq!(auth_error_message(502, "<html>bad gateway</html>"), "authentication request failed (502)");
    assert_eq!(auth_error_message(400, r#"{"code":400}"#), "authentication request failed (400)");
}

// =============================================================
// Token-grant parsing
// =============================================================

#[test]
fn parse_token_response_success() {
    let body = r#"{"access_token":"tok-1","user":{"id":"u-1","email":"user@example.com"}}"#;
    let session = parse_token_response(200, body).expect("session");
    assert_eq!(session.access_token, "tok-1");
    assert_eq!(session.user.id, "u-1");
}

#[test]
fn parse_token_response_forwards_platform_error_verbatim() {
    let body = r#"{"error_description":"Invalid login credentials"}"#;
    assert_eq!(parse_token_response(400, body), Err("Invalid login credentials".to_owned()));
}

#[test]
fn parse_token_response_success_without_user_is_an_error() {
    let body = r#"{"access_token":"tok-1"}"#;
    assert_eq!(parse_token_response(200, body), Err(NO_USER_MESSAGE.to_owned()));
}

#[test]
fn parse_token_response_rejects_malformed_success_body() {
    assert_eq!(
        parse_token_response(200, "not json"),
        Err("unexpected sign-in response (200)".to_owned())
    );
}

// =============================================================
// Auth-change listener registry
// =============================================================

#[test]
fn listeners_observe_sign_in_and_sign_out() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_cb = seen.clone();
    let sub = on_auth_state_change(move |user| {
        seen_cb.borrow_mut().push(user.map(|u| u.id.clone()));
    });

    let user = User {
        id: "u-1".to_owned(),
        email: None,
        user_metadata: serde_json::Value::Null,
        last_sign_in_at: None,
    };
    notify_listeners(Some(&user));
    notify_listeners(None);

    assert_eq!(*seen.borrow(), vec![Some("u-1".to_owned()), None]);
    sub.unsubscribe();
}

#[test]
fn unsubscribe_releases_the_listener() {
    use std::cell::Cell;
    use std::rc::Rc;

    let fired = Rc::new(Cell::new(0u32));
    let fired_cb = fired.clone();
    let sub = on_auth_state_change(move |_| fired_cb.set(fired_cb.get() + 1));
    assert_eq!(listener_count(), 1);

    sub.unsubscribe();
    assert_eq!(listener_count(), 0);

    notify_listeners(None);
    assert_eq!(fired.get(), 0);
}

#[test]
fn unsubscribe_leaves_other_listeners_registered() {
    let first = on_auth_state_change(|_| {});
    let second = on_auth_state_change(|_| {});
    assert_eq!(listener_count(), 2);

    first.unsubscribe();
    assert_eq!(listener_count(), 1);
    second.unsubscribe();
    assert_eq!(listener_count(), 0);
}
