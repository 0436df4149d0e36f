//! WebSocket gateway client for the live support channel.
//!
//! The gateway task owns the socket lifecycle for the whole browsing
//! session, whether or not the chat panel is open: connection, reconnection
//! with exponential backoff, the presence query re-issued on every
//! (re)connect, and dispatch of incoming events into chat state. It is the
//! only bridge between the gateway's event protocol and the Leptos UI.
//!
//! All WebSocket logic is gated behind `#[cfg(feature = "hydrate")]` since
//! it requires a browser environment.

#[cfg(feature = "hydrate")]
use crate::net::types::{ChatMessage, Envelope, normalize_presence};
#[cfg(feature = "hydrate")]
use crate::state::chat::{ChatState, ConnectionStatus, RoomSignal};
#[cfg(feature = "hydrate")]
use leptos::prelude::GetUntracked;
#[cfg(feature = "hydrate")]
use leptos::prelude::Update;

/// Send an event envelope to the gateway via the shared sender channel.
///
/// Returns `false` if the channel is closed (no active connection).
#[cfg(feature = "hydrate")]
pub fn send_event(
    tx: &futures::channel::mpsc::UnboundedSender<String>,
    event: &Envelope,
) -> bool {
    if let Ok(json) = serde_json::to_string(event) {
        tx.unbounded_send(json).is_ok()
    } else {
        false
    }
}

/// Spawn the gateway client lifecycle as a local async task.
///
/// This connects to the gateway, handles incoming events, and reconnects
/// on disconnect with exponential backoff.
#[cfg(feature = "hydrate")]
pub fn spawn_gateway(
    chat: leptos::prelude::RwSignal<ChatState>,
) -> futures::channel::mpsc::UnboundedSender<String> {
    use futures::channel::mpsc;

    let (tx, rx) = mpsc::unbounded::<String>();
    let tx_clone = tx.clone();

    leptos::task::spawn_local(gateway_loop(chat, tx_clone, rx));

    tx
}

/// Main connection loop with reconnect logic.
#[cfg(feature = "hydrate")]
async fn gateway_loop(
    chat: leptos::prelude::RwSignal<ChatState>,
    tx: futures::channel::mpsc::UnboundedSender<String>,
    rx: futures::channel::mpsc::UnboundedReceiver<String>,
) {
    use std::cell::RefCell;
    use std::rc::Rc;

    let rx = Rc::new(RefCell::new(rx));
    let mut backoff_ms: u32 = 1000;
    let max_backoff_ms: u32 = 10_000;

    loop {
        chat.update(|c| c.connection_status = ConnectionStatus::Connecting);

        let location = web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default();
        let ws_proto = if location.starts_with("https") { "wss" } else { "ws" };
        let host = web_sys::window()
            .and_then(|w| w.location().host().ok())
            .unwrap_or_else(|| "localhost:3000".to_owned());
        let ws_url = format!("{ws_proto}://{host}/chat/ws");

        match connect_and_run(&ws_url, chat, &tx, &rx).await {
            Ok(()) => {
                leptos::logging::log!("gateway disconnected cleanly");
            }
            Err(e) => {
                leptos::logging::warn!("gateway error: {e}");
            }
        }

        // Staff knowledge is stale the moment the socket drops; the next
        // connect re-queries and repopulates the list.
        chat.update(ChatState::apply_disconnect);

        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms)))
            .await;
        backoff_ms = (backoff_ms * 2).min(max_backoff_ms);
    }
}

/// Connect to the gateway and process events until disconnect.
#[cfg(feature = "hydrate")]
async fn connect_and_run(
    url: &str,
    chat: leptos::prelude::RwSignal<ChatState>,
    tx: &futures::channel::mpsc::UnboundedSender<String>,
    rx: &std::rc::Rc<std::cell::RefCell<futures::channel::mpsc::UnboundedReceiver<String>>>,
) -> Result<(), String> {
    use futures::StreamExt;
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let ws = WebSocket::open(url).map_err(|e| e.to_string())?;
    let (mut ws_write, mut ws_read) = ws.split();

    chat.update(|c| c.connection_status = ConnectionStatus::Connected);

    // Ask who is online as soon as the link is up. Re-issuing this on every
    // (re)connect is what heals the staff list after an outage.
    let _ = send_event(tx, &Envelope::presence_query());

    // A reconnect silently dropped any room membership on the server side;
    // re-join the active room. Joins are idempotent: delivery is filtered
    // by room id on receipt, not by join count.
    if let Some(room) = chat.get_untracked().room {
        let _ = send_event(tx, &RoomSignal::Join(room.id).to_envelope());
    }

    // Forward outgoing events from our channel to the socket.
    let mut rx_borrow = rx.borrow_mut();
    let send_task = async {
        use futures::SinkExt;
        while let Some(msg) = rx_borrow.next().await {
            if ws_write.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    };

    // Receive loop: process incoming events.
    let recv_task = async {
        while let Some(msg) = ws_read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Ok(envelope) = serde_json::from_str::<Envelope>(&text) {
                        dispatch_event(&envelope, chat);
                    }
                }
                Ok(Message::Bytes(_)) => {}
                Err(e) => {
                    leptos::logging::warn!("gateway recv error: {e}");
                    break;
                }
            }
        }
    };

    // Run both tasks; when either finishes, the connection is done.
    futures::future::select(Box::pin(send_task), Box::pin(recv_task)).await;

    Ok(())
}

/// Dispatch an incoming gateway event into chat state.
#[cfg(feature = "hydrate")]
fn dispatch_event(envelope: &Envelope, chat: leptos::prelude::RwSignal<ChatState>) {
    match envelope.event.as_str() {
        "online_staffs" => {
            let staff = normalize_presence(&envelope.data);
            chat.update(|c| c.apply_presence(staff));
        }

        "receive_message" => {
            if let Some(message) = ChatMessage::from_value(&envelope.data) {
                chat.update(|c| c.apply_incoming(message));
            } else {
                leptos::logging::warn!("unparseable message event: {}", envelope.data);
            }
        }

        "gateway_error" => {
            leptos::logging::warn!("gateway_error event: {}", envelope.data);
        }

        _ => {}
    }
}
