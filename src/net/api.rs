//! REST helpers for communicating with the storefront backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning `None`/error since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Option`/`Result` outputs instead of panics so a failed
//! room creation or history fetch degrades the chat panel without crashing
//! the page.

#![allow(clippy::unused_async)]

use super::types::{HistoryPage, Room, User};

/// Fetch the currently authenticated customer from `/api/auth/me`.
/// Returns `None` if not authenticated or on the server.
pub async fn fetch_current_user() -> Option<User> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/auth/me")
            .send()
            .await
            .ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<User>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Create a support room with the chosen staff member via `POST /chat/room`.
///
/// # Errors
///
/// Returns an error string if the request fails or the response is not a
/// room.
pub async fn create_room(staff_id: &str) -> Result<Room, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/chat/room")
            .json(&serde_json::json!({ "staffId": staff_id }))
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("room creation failed: {}", resp.status()));
        }
        resp.json::<Room>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = staff_id;
        Err("not available on server".to_owned())
    }
}

/// Fetch one page of room history from `GET /chat/room/:id/messages`.
///
/// `before` bounds the page to messages older than that id; absent means
/// the most recent page. The response is normalized whether the server
/// sends a bare array or a `{ messages, hasMore, oldestMessageId }` object.
///
/// # Errors
///
/// Returns an error string on network or parse failure; the caller leaves
/// its message list untouched.
pub async fn fetch_history(
    room_id: &str,
    limit: usize,
    before: Option<&str>,
) -> Result<HistoryPage, String> {
    #[cfg(feature = "hydrate")]
    {
        let mut url = format!("/chat/room/{room_id}/messages?limit={limit}");
        if let Some(before) = before {
            url.push_str("&before=");
            url.push_str(before);
        }
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("history fetch failed: {}", resp.status()));
        }
        let body: serde_json::Value = resp.json().await.map_err(|e| e.to_string())?;
        Ok(HistoryPage::from_value(&body, limit))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (room_id, limit, before);
        Err("not available on server".to_owned())
    }
}
