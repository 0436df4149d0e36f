//! Online staff picker for starting a support conversation.

use leptos::prelude::*;

use crate::app::GatewaySender;
use crate::net::api;
use crate::net::types::StaffPresence;
use crate::state::chat::{ChatState, HISTORY_PAGE_SIZE, HistoryMode, RoomPhase};

/// Staff selection view.
///
/// Picking a staff member leaves any previous room, clears the held
/// conversation, creates a room keyed by the staff id, joins it, and loads
/// the first history page. Creation failures log and drop back to this
/// list with no partial room state.
#[component]
pub fn StaffList() -> impl IntoView {
    let chat = expect_context::<RwSignal<ChatState>>();
    let sender = expect_context::<RwSignal<GatewaySender>>();

    let on_pick = move |staff: StaffPresence| {
        // The leave for the old room goes out before anything about the
        // new room is emitted or fetched.
        let leave = chat.try_update(|c| c.begin_conversation(staff.clone())).flatten();
        if let Some(signal) = leave {
            sender.get().send(&signal.to_envelope());
        }

        let staff_id = staff.staff_id;
        leptos::task::spawn_local(async move {
            match api::create_room(&staff_id).await {
                Ok(room) => {
                    let room_id = room.id.clone();
                    let Some(join) = chat
                        .try_update(|c| c.commit_room(room, &staff_id))
                        .flatten()
                    else {
                        // The user closed the panel or picked someone else
                        // while the request was in flight.
                        return;
                    };
                    sender.get().send(&join.to_envelope());

                    match api::fetch_history(&room_id, HISTORY_PAGE_SIZE, None).await {
                        Ok(page) => chat.update(|c| {
                            c.apply_history(&room_id, page, HistoryMode::Replace);
                        }),
                        Err(e) => leptos::logging::warn!("history load failed: {e}"),
                    }
                }
                Err(e) => {
                    leptos::logging::warn!("room creation failed: {e}");
                    chat.update(|c| c.abort_room_init(&staff_id));
                }
            }
        });
    };

    let pending_staff_id = move || {
        let state = chat.get();
        if state.phase == RoomPhase::Initializing {
            state.selected_staff.map(|s| s.staff_id)
        } else {
            None
        }
    };

    view! {
        <div class="staff-list">
            {move || {
                let staff = chat.get().staff;
                if staff.is_empty() {
                    return view! {
                        <div class="staff-list__empty">"No staff online right now"</div>
                    }
                        .into_any();
                }

                staff
                    .into_iter()
                    .map(|entry| {
                        let staff_id = entry.staff_id.clone();
                        let name = entry.user_name.clone();
                        let avatar = entry.avatar_url.clone();
                        let pending = {
                            let staff_id = staff_id.clone();
                            move || pending_staff_id().as_deref() == Some(staff_id.as_str())
                        };
                        let pick = {
                            let entry = entry.clone();
                            move |_| on_pick(entry.clone())
                        };
                        view! {
                            <button class="staff-list__entry" on:click=pick>
                                {match avatar {
                                    Some(url) => view! {
                                        <img class="staff-list__avatar" src=url alt=""/>
                                    }
                                        .into_any(),
                                    None => view! {
                                        <span class="staff-list__avatar staff-list__avatar--initial">
                                            {name.chars().next().unwrap_or('?').to_string()}
                                        </span>
                                    }
                                        .into_any(),
                                }}
                                <span class="staff-list__name">{name}</span>
                                <span class="staff-list__hint">
                                    {move || if pending() { "Connecting..." } else { "Online" }}
                                </span>
                            </button>
                        }
                    })
                    .collect::<Vec<_>>()
                    .into_any()
            }}
        </div>
    }
}
