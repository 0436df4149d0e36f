//! Active conversation view: history, live messages, pagination, input.

use chrono::{Local, NaiveDate};
use leptos::prelude::*;

use crate::app::GatewaySender;
use crate::net::api;
use crate::net::types::{Envelope, SenderRole};
use crate::state::auth::AuthState;
use crate::state::chat::{ChatState, HISTORY_PAGE_SIZE, HistoryMode};
use crate::util::date_header::separator_labels;
use crate::util::scroll_anchor::ScrollPlan;

/// Conversation view for the active room.
///
/// Renders the message list with calendar-day separators, the backward
/// "Load more" control, and the message input. Scroll behavior follows the
/// pending plan in chat state: initial loads and live messages jump to the
/// newest entry, prepends keep the reader's position anchored.
#[component]
pub fn Conversation() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let chat = expect_context::<RwSignal<ChatState>>();
    let sender = expect_context::<RwSignal<GatewaySender>>();

    let input = RwSignal::new(String::new());
    let list_ref = NodeRef::<leptos::html::Div>::new();

    // Apply the pending scroll plan once the DOM reflects the new list.
    Effect::new(move || {
        let plan = chat.get().scroll;
        if plan == ScrollPlan::None {
            return;
        }

        #[cfg(feature = "hydrate")]
        {
            if let Some(el) = list_ref.get() {
                crate::util::scroll_anchor::apply_plan(&el, &plan);
            }
        }

        chat.update_untracked(|c| c.scroll = ScrollPlan::None);
    });

    let on_load_more = move |_| {
        // begin_prepend is the concurrency guard: while a backward fetch is
        // in flight, further clicks are no-ops.
        let Some((room_id, before)) = chat.try_update(ChatState::begin_prepend).flatten()
        else {
            return;
        };

        // Viewport metrics before the list grows, for the anchor correction.
        #[cfg(feature = "hydrate")]
        let (height, top) = list_ref
            .get()
            .map_or((0, 0), |el| (el.scroll_height(), el.scroll_top()));
        #[cfg(not(feature = "hydrate"))]
        let (height, top) = (0, 0);

        leptos::task::spawn_local(async move {
            match api::fetch_history(&room_id, HISTORY_PAGE_SIZE, before.as_deref()).await {
                Ok(page) => chat.update(|c| {
                    c.apply_history(&room_id, page, HistoryMode::Prepend { height, top });
                }),
                Err(e) => {
                    leptos::logging::warn!("older history fetch failed: {e}");
                    chat.update(|c| c.release_history_guard(&room_id));
                }
            }
        });
    };

    let do_send = move || {
        let text = input.get();
        if text.trim().is_empty() {
            return;
        }
        let Some(room_id) = chat.get().room.map(|r| r.id) else {
            return;
        };
        let Some(user) = auth.get().user else {
            return;
        };

        // Best-effort emission; the input clears whether or not the gateway
        // accepts the event.
        sender.get().send(&Envelope::send_message(&room_id, &user.id, &text));
        input.set(String::new());
    };

    let on_click_send = move |_| do_send();

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            do_send();
        }
    };

    let placeholder = move || {
        let partner = chat
            .get()
            .selected_staff
            .map(|s| s.user_name)
            .unwrap_or_else(|| "support".to_owned());
        format!("Message {partner}...")
    };

    let can_send = move || !input.get().trim().is_empty();

    view! {
        <div class="conversation">
            <div class="conversation__messages" node_ref=list_ref>
                <Show when=move || chat.get().has_more>
                    <button
                        class="conversation__load-more"
                        on:click=on_load_more
                        disabled=move || chat.get().history_loading
                    >
                        {move || {
                            if chat.get().history_loading { "Loading..." } else { "Load more" }
                        }}
                    </button>
                </Show>

                {move || {
                    let messages = chat.get().messages;
                    if messages.is_empty() {
                        return view! {
                            <div class="conversation__empty">"No messages yet"</div>
                        }
                            .into_any();
                    }

                    // Recomputed every render: "today" moves.
                    let today = Local::now().date_naive();
                    let days: Vec<NaiveDate> = messages
                        .iter()
                        .map(|m| m.created_at.with_timezone(&Local).date_naive())
                        .collect();
                    let labels = separator_labels(&days, today);

                    messages
                        .iter()
                        .zip(labels)
                        .map(|(msg, label)| {
                            let own = msg.sender_role == SenderRole::Customer;
                            let content = msg.content.clone();
                            let time = msg
                                .created_at
                                .with_timezone(&Local)
                                .format("%H:%M")
                                .to_string();
                            view! {
                                {label.map(|text| view! {
                                    <div class="conversation__day">{text}</div>
                                })}
                                <div
                                    class="conversation__message"
                                    class:conversation__message--own=own
                                >
                                    <span class="conversation__text">{content}</span>
                                    <span class="conversation__time">{time}</span>
                                </div>
                            }
                        })
                        .collect::<Vec<_>>()
                        .into_any()
                }}
            </div>

            <div class="conversation__input-row">
                <textarea
                    class="conversation__input"
                    placeholder=placeholder
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                ></textarea>
                <button
                    class="btn btn--primary conversation__send"
                    on:click=on_click_send
                    disabled=move || !can_send()
                >
                    "Send"
                </button>
            </div>
        </div>
    }
}
