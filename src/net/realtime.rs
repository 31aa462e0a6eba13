//! Realtime channel client for insert notifications on the `events` table.
//!
//! Joins the platform's change-feed websocket with a phoenix-style
//! `phx_join`, keeps the channel alive with heartbeats, and bumps the
//! cached count on every matching insert. Reconnects with exponential
//! backoff while the subscription is alive.
//!
//! All websocket I/O is gated behind `#[cfg(feature = "hydrate")]`; the
//! message builders and dispatch logic are pure and natively testable.

#[cfg(test)]
#[path = "realtime_test.rs"]
mod realtime_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::RwSignal;

use crate::net::types::ChannelMessage;
use crate::state::events::EventsCountState;

/// Channel topic carrying the watched table's change feed.
pub const CHANNEL_TOPIC: &str = "realtime:events-db-changes";
/// Reserved topic for connection heartbeats.
pub const HEARTBEAT_TOPIC: &str = "phoenix";
/// Schema of the watched table.
pub const WATCHED_SCHEMA: &str = "public";
/// Table whose inserts drive the count.
pub const WATCHED_TABLE: &str = "events";

/// Seconds between heartbeats; inside the platform's idle timeout.
#[cfg(feature = "hydrate")]
const HEARTBEAT_SECS: u32 = 25;

// =============================================================
// Subscription handle
// =============================================================

/// Handle to a live insert subscription.
///
/// The connection loop polls the shared flag, so [`release`](Self::release)
/// stops dispatch immediately and the loop leaves the channel and closes
/// the socket on its next wake. Lifecycle is 1:1 with "user present": the
/// dashboard acquires on sign-in and releases on sign-out and unmount.
#[derive(Clone, Debug)]
pub struct RealtimeHandle {
    alive: Arc<AtomicBool>,
}

impl RealtimeHandle {
    fn new() -> Self {
        Self { alive: Arc::new(AtomicBool::new(true)) }
    }

    /// Stop the subscription. Safe to call more than once.
    pub fn release(&self) {
        self.alive.store(false, Ordering::Relaxed);
    }

    pub fn is_released(&self) -> bool {
        !self.alive.load(Ordering::Relaxed)
    }
}

/// Subscribe to insert notifications, bumping `events` on each one.
///
/// Returns a handle the caller must release when the user becomes absent
/// or the view unmounts. On the server this is a no-op handle.
pub fn subscribe_events_inserts(events: RwSignal<EventsCountState>) -> RealtimeHandle {
    let handle = RealtimeHandle::new();
    #[cfg(feature = "hydrate")]
    {
        let alive = handle.alive.clone();
        leptos::task::spawn_local(channel_loop(alive, events));
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = events;
    }
    handle
}

// =============================================================
// Message builders and dispatch (pure)
// =============================================================

/// Build the `phx_join` message subscribing to inserts on the watched table.
pub fn join_message(reference: u64) -> ChannelMessage {
    ChannelMessage {
        topic: CHANNEL_TOPIC.to_owned(),
        event: "phx_join".to_owned(),
        payload: serde_json::json!({
            "config": {
                "postgres_changes": [
                    { "event": "INSERT", "schema": WATCHED_SCHEMA, "table": WATCHED_TABLE }
                ]
            }
        }),
        reference: Some(reference.to_string()),
    }
}

/// Build a connection heartbeat message.
pub fn heartbeat_message(reference: u64) -> ChannelMessage {
    ChannelMessage {
        topic: HEARTBEAT_TOPIC.to_owned(),
        event: "heartbeat".to_owned(),
        payload: serde_json::json!({}),
        reference: Some(reference.to_string()),
    }
}

/// Build the `phx_leave` message releasing the channel.
pub fn leave_message(reference: u64) -> ChannelMessage {
    ChannelMessage {
        topic: CHANNEL_TOPIC.to_owned(),
        event: "phx_leave".to_owned(),
        payload: serde_json::json!({}),
        reference: Some(reference.to_string()),
    }
}

/// Whether a message is an insert notification for the watched table.
///
/// The change body sits under `payload.data` on current platform versions;
/// older ones put it directly in `payload`, so both are accepted. Changes
/// scoped to another table or schema are ignored.
pub fn is_watched_insert(msg: &ChannelMessage) -> bool {
    if msg.topic != CHANNEL_TOPIC || msg.event != "postgres_changes" {
        return false;
    }
    let data = msg.payload.get("data").unwrap_or(&msg.payload);
    if data.get("type").and_then(|v| v.as_str()) != Some("INSERT") {
        return false;
    }
    if let Some(table) = data.get("table").and_then(|v| v.as_str()) {
        if table != WATCHED_TABLE {
            return false;
        }
    }
    if let Some(schema) = data.get("schema").and_then(|v| v.as_str()) {
        if schema != WATCHED_SCHEMA {
            return false;
        }
    }
    true
}

/// Apply one incoming message to the count cache.
///
/// Returns true when the message was an insert and the count was bumped.
/// The inserted row payload is unused beyond triggering the bump.
pub fn apply_message(state: &mut EventsCountState, msg: &ChannelMessage) -> bool {
    if is_watched_insert(msg) {
        state.record_insert();
        true
    } else {
        false
    }
}

// =============================================================
// Connection loop
// =============================================================

/// Main connection loop with reconnect logic.
#[cfg(feature = "hydrate")]
async fn channel_loop(alive: Arc<AtomicBool>, events: RwSignal<EventsCountState>) {
    let mut backoff_ms: u32 = 1000;
    let max_backoff_ms: u32 = 10_000;

    while alive.load(Ordering::Relaxed) {
        match connect_and_listen(&alive, events).await {
            Ok(()) => {
                leptos::logging::log!("realtime channel closed");
            }
            Err(e) => {
                leptos::logging::warn!("realtime channel error: {e}");
            }
        }

        if !alive.load(Ordering::Relaxed) {
            break;
        }

        // Exponential backoff before reconnect.
        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms))).await;
        backoff_ms = (backoff_ms * 2).min(max_backoff_ms);
    }
}

/// Join the channel and process messages until disconnect or release.
#[cfg(feature = "hydrate")]
async fn connect_and_listen(alive: &Arc<AtomicBool>, events: RwSignal<EventsCountState>) -> Result<(), String> {
    use futures::{SinkExt, StreamExt};
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;
    use leptos::prelude::Update;

    let ws = WebSocket::open(&websocket_url()).map_err(|e| e.to_string())?;
    let (mut ws_write, mut ws_read) = ws.split();

    let join = serde_json::to_string(&join_message(1)).map_err(|e| e.to_string())?;
    ws_write.send(Message::Text(join)).await.map_err(|e| e.to_string())?;

    let (tx, mut rx) = futures::channel::mpsc::unbounded::<String>();

    // Forward queued outgoing messages to the socket.
    let send_task = async {
        while let Some(msg) = rx.next().await {
            if ws_write.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    };

    // Receive loop: bump the count on watched inserts.
    let recv_alive = alive.clone();
    let recv_task = async {
        while let Some(msg) = ws_read.next().await {
            if !recv_alive.load(Ordering::Relaxed) {
                break;
            }
            match msg {
                Ok(Message::Text(text)) => {
                    if let Ok(parsed) = serde_json::from_str::<ChannelMessage>(&text) {
                        events.update(|state| {
                            if apply_message(state, &parsed) {
                                leptos::logging::log!("events insert received");
                            }
                        });
                    }
                }
                Ok(Message::Bytes(_)) => {}
                Err(e) => {
                    leptos::logging::warn!("realtime recv error: {e}");
                    break;
                }
            }
        }
    };

    // Heartbeat every HEARTBEAT_SECS; the 1s tick also bounds how long a
    // released subscription keeps its socket open.
    let poll_alive = alive.clone();
    let poll_task = async move {
        let mut next_ref: u64 = 2;
        let mut ticks: u32 = 0;
        loop {
            gloo_timers::future::sleep(std::time::Duration::from_secs(1)).await;
            if !poll_alive.load(Ordering::Relaxed) {
                if let Ok(leave) = serde_json::to_string(&leave_message(next_ref)) {
                    let _ = tx.unbounded_send(leave);
                }
                // Give the forwarder a beat to flush the leave.
                gloo_timers::future::sleep(std::time::Duration::from_millis(100)).await;
                break;
            }
            ticks += 1;
            if ticks >= HEARTBEAT_SECS {
                ticks = 0;
                next_ref += 1;
                if let Ok(heartbeat) = serde_json::to_string(&heartbeat_message(next_ref)) {
                    let _ = tx.unbounded_send(heartbeat);
                }
            }
        }
    };

    // Run all three; when any finishes, the connection is done.
    futures::future::select(
        Box::pin(futures::future::select(Box::pin(send_task), Box::pin(recv_task))),
        Box::pin(poll_task),
    )
    .await;

    Ok(())
}

/// Derive the change-feed websocket URL from the current page location.
#[cfg(feature = "hydrate")]
fn websocket_url() -> String {
    let location = web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default();
    let ws_proto = if location.starts_with("https") { "wss" } else { "ws" };
    let host = web_sys::window()
        .and_then(|w| w.location().host().ok())
        .unwrap_or_else(|| "localhost:3000".to_owned());
    let mut url = format!("{ws_proto}://{host}/realtime/v1/websocket?vsn=1.0.0");
    if let Some(key) = crate::net::anon_key() {
        url.push_str("&apikey=");
        url.push_str(key);
    }
    url
}
