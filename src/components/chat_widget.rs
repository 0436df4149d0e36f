//! Floating support chat widget: toggle button, panel shell, view switch.

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::app::GatewaySender;
use crate::components::conversation::Conversation;
use crate::components::staff_list::StaffList;
use crate::state::auth::AuthState;
use crate::state::chat::{ChatState, ConnectionStatus, RoomPhase, RoomSignal};

/// Support chat widget.
///
/// Renders the floating toggle button and, when open, the panel shell with
/// its header (status dot, partner name, back/close controls) and either
/// the staff picker or the active conversation.
#[component]
pub fn ChatWidget() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let chat = expect_context::<RwSignal<ChatState>>();
    let sender = expect_context::<RwSignal<GatewaySender>>();
    let navigate = leptos_router::hooks::use_navigate();

    let emit = move |signal: Option<RoomSignal>| {
        if let Some(signal) = signal {
            sender.get().send(&signal.to_envelope());
        }
    };

    let on_toggle = move |_| {
        if chat.get().open {
            emit(chat.try_update(ChatState::close_panel).flatten());
            return;
        }

        // Opening requires a signed-in customer; send anonymous visitors to
        // the login flow instead.
        let auth_state = auth.get();
        if auth_state.loading {
            return;
        }
        if auth_state.user.is_none() {
            navigate("/login", NavigateOptions::default());
            return;
        }
        chat.update(|c| c.open = true);
    };

    let on_close = move |_| {
        emit(chat.try_update(ChatState::close_panel).flatten());
    };

    let on_back = move |_| {
        emit(chat.try_update(ChatState::back_to_staff_list).flatten());
    };

    let in_conversation = move || chat.get().phase == RoomPhase::Active;

    let title = move || {
        let state = chat.get();
        if state.phase == RoomPhase::Active {
            state
                .selected_staff
                .map(|s| s.user_name)
                .unwrap_or_else(|| "Support".to_owned())
        } else {
            "Support".to_owned()
        }
    };

    let status_class = move || match chat.get().connection_status {
        ConnectionStatus::Connected => "chat-widget__dot chat-widget__dot--connected",
        ConnectionStatus::Connecting => "chat-widget__dot chat-widget__dot--connecting",
        ConnectionStatus::Disconnected => "chat-widget__dot chat-widget__dot--disconnected",
    };

    view! {
        <div class="chat-widget">
            <Show when=move || chat.get().open>
                <div class="chat-widget__panel">
                    <div class="chat-widget__header">
                        <Show when=in_conversation>
                            <button class="chat-widget__back" on:click=on_back title="Back to staff list">
                                "‹"
                            </button>
                        </Show>
                        <span class=status_class></span>
                        <span class="chat-widget__title">{title}</span>
                        <button class="chat-widget__close" on:click=on_close title="Close">
                            "✕"
                        </button>
                    </div>

                    <div class="chat-widget__body">
                        {move || {
                            if in_conversation() {
                                view! { <Conversation/> }.into_any()
                            } else {
                                view! { <StaffList/> }.into_any()
                            }
                        }}
                    </div>
                </div>
            </Show>

            <button class="chat-widget__toggle" on:click=on_toggle title="Support chat">
                {move || if chat.get().open { "✕" } else { "💬" }}
            </button>
        </div>
    }
}
