//! Data gateway: exact row counts from the platform's query API.
//!
//! The count query asks for headers only (`Prefer: count=exact` on a HEAD
//! request), so no row data crosses the wire; the total comes back in the
//! `Content-Range` header.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "data_test.rs"]
mod data_test;

/// Parse the row total out of a `Content-Range` header value.
///
/// The platform answers `items 0-24/3573` ranges as `0-24/3573`, or `*/42`
/// for a count-only response. A `*` total means the count is unknown.
pub fn parse_content_range_count(value: &str) -> Option<u64> {
    let total = value.rsplit('/').next()?;
    total.trim().parse().ok()
}

/// Fetch the exact row count of the `events` table.
///
/// # Errors
///
/// Returns the transport or platform error text; the caching layer records
/// it without rendering it distinctly from the loading state.
pub async fn fetch_events_count() -> Result<u64, String> {
    #[cfg(feature = "hydrate")]
    {
        use gloo_net::http::{Method, RequestBuilder};

        let mut req = RequestBuilder::new("/rest/v1/events?select=*")
            .method(Method::HEAD)
            .header("Prefer", "count=exact");
        if let Some(key) = crate::net::anon_key() {
            req = req.header("apikey", key);
        }
        if let Some(token) = crate::net::auth::stored_token() {
            req = req.header("Authorization", &format!("Bearer {token}"));
        }

        let resp = req.send().await.map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("count query failed ({})", resp.status()));
        }
        resp.headers()
            .get("content-range")
            .as_deref()
            .and_then(parse_content_range_count)
            .ok_or_else(|| "count query returned no total".to_owned())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}
