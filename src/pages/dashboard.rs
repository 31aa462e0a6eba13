//! Dashboard page showing the live events count.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the protected landing route. On mount it runs a one-shot
//! session check and a long-lived auth-change subscription; once a user is
//! present it fetches the baseline count and holds the insert subscription
//! for as long as the user stays present.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::realtime::{RealtimeHandle, subscribe_events_inserts};
use crate::net::types::User;
use crate::state::events::EventsCountState;
use crate::state::session::SessionState;

/// Text shown while the dashboard is gated.
fn gate_label(loading: bool) -> &'static str {
    if loading { "Loading..." } else { "Redirecting to login..." }
}

/// Identity text for the header.
fn identity_label(user: Option<&User>) -> String {
    user.and_then(|u| u.email.clone())
        .unwrap_or_else(|| "Signed in".to_owned())
}

/// Rendered count, or the placeholder while no baseline exists.
///
/// Fetch errors keep the placeholder; they are logged but not rendered
/// distinctly.
fn count_label(state: &EventsCountState) -> String {
    state.displayed().map_or_else(|| "...".to_owned(), |n| n.to_string())
}

/// Dashboard page — validates the session, shows the live count, and
/// offers sign-out. Redirects to `/login` when no session exists.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let events = expect_context::<RwSignal<EventsCountState>>();
    let sign_out_busy = RwSignal::new(false);

    // Redirect to login once the session check resolves without a user.
    let navigate = use_navigate();
    crate::util::auth::install_unauth_redirect(session, navigate);

    // One-shot session check; `loading` is cleared exactly once, on both
    // branches, by `resolve`.
    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(async move {
            let user = crate::net::auth::get_session().await.map(|s| s.user);
            session.update(|s| s.resolve(user));
        });

        // Long-lived auth-change subscription, released on unmount.
        let subscription = crate::net::auth::on_auth_state_change(move |user| {
            session.update(|s| s.user = user.cloned());
        });
        on_cleanup(move || subscription.unsubscribe());
    }

    // Baseline count fetch, fired once when a user becomes present.
    let requested_count = RwSignal::new(false);
    Effect::new(move || {
        if requested_count.get() {
            return;
        }
        if session.get().user.is_none() {
            return;
        }
        requested_count.set(true);
        events.update(|e| e.loading = true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::data::fetch_events_count().await {
                Ok(count) => events.update(|e| e.resolve_fetch(count)),
                Err(msg) => {
                    leptos::logging::warn!("count fetch failed: {msg}");
                    events.update(|e| e.fail_fetch(msg));
                }
            }
        });
    });

    // Insert subscription, tied 1:1 to user presence and released on
    // sign-out and unmount.
    let realtime = RwSignal::new(None::<RealtimeHandle>);
    Effect::new(move || {
        let present = session.get().user.is_some();
        let active = realtime.get_untracked();
        if present {
            if active.is_none() {
                realtime.set(Some(subscribe_events_inserts(events)));
            }
        } else if let Some(handle) = active {
            handle.release();
            realtime.set(None);
        }
    });
    on_cleanup(move || {
        if let Some(Some(handle)) = realtime.try_get_untracked() {
            handle.release();
        }
    });

    // Sign-out always succeeds; there is no error branch.
    let on_sign_out = move |_| {
        if sign_out_busy.get() {
            return;
        }
        sign_out_busy.set(true);
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            crate::net::auth::sign_out().await;
            session.update(|s| s.user = None);
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/login");
            }
        });
    };

    view! {
        <Show
            when=move || session.get().is_authenticated()
            fallback=move || {
                view! {
                    <div class="dashboard-page">
                        <p>{move || gate_label(session.get().loading)}</p>
                    </div>
                }
            }
        >
            <div class="dashboard-page">
                <header class="dashboard-page__header">
                    <h1>"Dashboard"</h1>
                    <span class="dashboard-page__spacer"></span>
                    <span class="dashboard-page__self">
                        {move || identity_label(session.get().user.as_ref())}
                    </span>
                    <button
                        class="btn dashboard-page__sign-out"
                        on:click=on_sign_out
                        disabled=move || sign_out_busy.get()
                    >
                        {move || if sign_out_busy.get() { "Signing out..." } else { "Sign out" }}
                    </button>
                </header>

                <section class="count-card">
                    <h2>"Realtime Events"</h2>
                    <p class="count-card__caption">"Listening to the events table for inserts"</p>
                    <p class="count-card__label">"Total Events"</p>
                    <p
                        class="count-card__value"
                        class=("count-card__value--loading", move || events.get().displayed().is_none())
                    >
                        {move || count_label(&events.get())}
                    </p>
                </section>
            </div>
        </Show>
    }
}
