//! Auth gateway: sign-in, sign-out, session restore, and auth-change
//! notifications.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, with the access
//! token persisted in `localStorage` the way the platform's own client
//! library would. Server-side (SSR): inert stubs, since auth only happens
//! in the browser.
//!
//! ERROR HANDLING
//! ==============
//! The platform's own message text is forwarded verbatim; this module adds
//! no error taxonomy. Sign-out ignores errors entirely.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::net::types::{Session, TokenResponse, User};

#[cfg(feature = "hydrate")]
const TOKEN_STORAGE_KEY: &str = "pulse_session_token";

/// Error surfaced when the platform reports success but returns no user.
pub const NO_USER_MESSAGE: &str = "Sign-in succeeded but returned no user.";

// =============================================================
// Response parsing (pure, natively testable)
// =============================================================

/// Extract the platform's error message from an auth response body.
///
/// The platform varies the key by endpoint and failure class; fall back to
/// a status-code text when the body carries none.
pub fn auth_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_owned();
            }
        }
    }
    format!("authentication request failed ({status})")
}

/// Parse a token-grant response into a session.
///
/// # Errors
///
/// Returns the platform's message for non-success responses, and
/// [`NO_USER_MESSAGE`] when a success response carries no user.
pub fn parse_token_response(status: u16, body: &str) -> Result<Session, String> {
    if !(200..300).contains(&status) {
        return Err(auth_error_message(status, body));
    }
    let resp: TokenResponse =
        serde_json::from_str(body).map_err(|_| format!("unexpected sign-in response ({status})"))?;
    let Some(user) = resp.user else {
        return Err(NO_USER_MESSAGE.to_owned());
    };
    Ok(Session { access_token: resp.access_token, user })
}

// =============================================================
// Auth-change listener registry (tab-scoped)
// =============================================================

thread_local! {
    static LISTENERS: RefCell<Vec<(u64, Rc<dyn Fn(Option<&User>)>)>> = RefCell::new(Vec::new());
    static NEXT_LISTENER_ID: Cell<u64> = const { Cell::new(1) };
}

/// Handle to a registered auth-change listener.
///
/// Consuming [`unsubscribe`](Self::unsubscribe) releases the listener
/// exactly once; views call it from `on_cleanup` so every exit path drops
/// the registration.
#[derive(Debug)]
pub struct AuthSubscription {
    id: u64,
}

impl AuthSubscription {
    pub fn unsubscribe(self) {
        LISTENERS.with(|listeners| {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        });
    }
}

/// Register a callback fired on every sign-in and sign-out.
pub fn on_auth_state_change(callback: impl Fn(Option<&User>) + 'static) -> AuthSubscription {
    let id = NEXT_LISTENER_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });
    LISTENERS.with(|listeners| {
        listeners.borrow_mut().push((id, Rc::new(callback)));
    });
    AuthSubscription { id }
}

/// Fan an auth change out to all registered listeners.
fn notify_listeners(user: Option<&User>) {
    // Snapshot first so a callback may register or unsubscribe listeners.
    let snapshot: Vec<Rc<dyn Fn(Option<&User>)>> =
        LISTENERS.with(|listeners| listeners.borrow().iter().map(|(_, cb)| cb.clone()).collect());
    for callback in snapshot {
        callback(user);
    }
}

#[cfg(test)]
fn listener_count() -> usize {
    LISTENERS.with(|listeners| listeners.borrow().len())
}

// =============================================================
// Token persistence
// =============================================================

/// Read the persisted access token, if any.
pub fn stored_token() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage.get_item(TOKEN_STORAGE_KEY).ok()?
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

#[cfg(feature = "hydrate")]
fn store_token(token: &str) {
    if let Some(Ok(Some(storage))) = web_sys::window().map(|w| w.local_storage()) {
        let _ = storage.set_item(TOKEN_STORAGE_KEY, token);
    }
}

#[cfg(feature = "hydrate")]
fn clear_token() {
    if let Some(Ok(Some(storage))) = web_sys::window().map(|w| w.local_storage()) {
        let _ = storage.remove_item(TOKEN_STORAGE_KEY);
    }
}

// =============================================================
// Gateway operations
// =============================================================

/// Sign in with email and password.
///
/// On success the access token is persisted and auth-change listeners are
/// notified with the new user.
///
/// # Errors
///
/// Returns the platform's error message for display in the login banner.
pub async fn sign_in_with_password(email: &str, password: &str) -> Result<User, String> {
    #[cfg(feature = "hydrate")]
    {
        let mut req = gloo_net::http::Request::post("/auth/v1/token?grant_type=password");
        if let Some(key) = crate::net::anon_key() {
            req = req.header("apikey", key);
        }
        let resp = req
            .json(&serde_json::json!({ "email": email, "password": password }))
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let session = parse_token_response(status, &body)?;
        store_token(&session.access_token);
        notify_listeners(Some(&session.user));
        Ok(session.user)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (email, password);
        Err("not available on server".to_owned())
    }
}

/// Sign out the current user. Assumed to always succeed; request errors
/// are ignored, the token is cleared, and listeners see the user go away.
pub async fn sign_out() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(token) = stored_token() {
            let mut req = gloo_net::http::Request::post("/auth/v1/logout")
                .header("Authorization", &format!("Bearer {token}"));
            if let Some(key) = crate::net::anon_key() {
                req = req.header("apikey", key);
            }
            let _ = req.send().await;
        }
        clear_token();
    }
    notify_listeners(None);
}

/// Restore and validate the persisted session.
///
/// Returns `None` when no token is stored or the platform rejects it; a
/// rejected token is cleared so the next mount skips the round trip.
pub async fn get_session() -> Option<Session> {
    #[cfg(feature = "hydrate")]
    {
        let token = stored_token()?;
        let mut req = gloo_net::http::Request::get("/auth/v1/user")
            .header("Authorization", &format!("Bearer {token}"));
        if let Some(key) = crate::net::anon_key() {
            req = req.header("apikey", key);
        }
        let resp = req.send().await.ok()?;
        if !resp.ok() {
            clear_token();
            return None;
        }
        let user = resp.json::<User>().await.ok()?;
        Some(Session { access_token: token, user })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}
