use super::*;
use crate::net::types::{ChatMessage, HistoryPage, Room, SenderRole, StaffPresence};
use chrono::{TimeZone, Utc};

fn staff(id: &str) -> StaffPresence {
    StaffPresence {
        staff_id: id.to_owned(),
        user_name: format!("Agent {id}"),
        avatar_url: None,
    }
}

fn room(id: &str) -> Room {
    Room { id: id.to_owned(), participant_ids: Vec::new() }
}

fn msg(id: &str, room_id: &str, minute: u32) -> ChatMessage {
    ChatMessage {
        id: id.to_owned(),
        room_id: room_id.to_owned(),
        sender_id: "u-1".to_owned(),
        sender_role: SenderRole::Customer,
        content: format!("message {id}"),
        created_at: Utc.with_ymd_and_hms(2024, 3, 15, 10, minute, 0).unwrap(),
    }
}

fn page(messages: Vec<ChatMessage>, has_more: bool) -> HistoryPage {
    let oldest_message_id = messages.first().map(|m| m.id.clone());
    HistoryPage { messages, has_more, oldest_message_id }
}

/// Open panel with an active room, via the normal transition path.
fn active(room_id: &str) -> ChatState {
    let mut state = ChatState { open: true, ..ChatState::default() };
    assert!(state.begin_conversation(staff("s-1")).is_none());
    let join = state.commit_room(room(room_id), "s-1");
    assert_eq!(join, Some(RoomSignal::Join(room_id.to_owned())));
    state
}

// =============================================================
// Room/session controller
// =============================================================

#[test]
fn begin_conversation_leaves_previous_room_and_clears_history() {
    let mut state = active("r-1");
    state.apply_history("r-1", page(vec![msg("m-1", "r-1", 0)], true), HistoryMode::Replace);

    let leave = state.begin_conversation(staff("s-2"));

    assert_eq!(leave, Some(RoomSignal::Leave("r-1".to_owned())));
    assert_eq!(state.phase, RoomPhase::Initializing);
    assert!(state.messages.is_empty());
    assert!(!state.has_more);
    assert!(state.oldest_message_id.is_none());
    assert!(state.room.is_none());
}

#[test]
fn commit_room_activates_and_joins() {
    let mut state = ChatState { open: true, ..ChatState::default() };
    state.begin_conversation(staff("s-1"));

    let join = state.commit_room(room("r-1"), "s-1");

    assert_eq!(join, Some(RoomSignal::Join("r-1".to_owned())));
    assert_eq!(state.phase, RoomPhase::Active);
    assert_eq!(state.room.as_ref().map(|r| r.id.as_str()), Some("r-1"));
}

#[test]
fn commit_room_ignores_response_for_a_superseded_selection() {
    let mut state = ChatState { open: true, ..ChatState::default() };
    state.begin_conversation(staff("s-1"));
    state.begin_conversation(staff("s-2"));

    // The creation round-trip for s-1 resolves late.
    assert!(state.commit_room(room("r-1"), "s-1").is_none());
    assert!(state.room.is_none());
    assert_eq!(state.phase, RoomPhase::Initializing);

    // The current selection still commits normally.
    assert_eq!(
        state.commit_room(room("r-2"), "s-2"),
        Some(RoomSignal::Join("r-2".to_owned()))
    );
}

#[test]
fn commit_room_ignores_response_after_the_panel_closed() {
    let mut state = ChatState { open: true, ..ChatState::default() };
    state.begin_conversation(staff("s-1"));
    state.close_panel();

    assert!(state.commit_room(room("r-1"), "s-1").is_none());
    assert!(state.room.is_none());
}

#[test]
fn abort_room_init_returns_to_staff_list_without_partial_state() {
    let mut state = ChatState { open: true, ..ChatState::default() };
    state.begin_conversation(staff("s-1"));

    state.abort_room_init("s-1");

    assert_eq!(state.phase, RoomPhase::NoRoom);
    assert!(state.selected_staff.is_none());
    assert!(state.room.is_none());
}

#[test]
fn close_panel_tears_everything_down() {
    let mut state = active("r-1");
    state.apply_history("r-1", page(vec![msg("m-1", "r-1", 0)], false), HistoryMode::Replace);

    let leave = state.close_panel();

    assert_eq!(leave, Some(RoomSignal::Leave("r-1".to_owned())));
    assert!(!state.open);
    assert_eq!(state.phase, RoomPhase::NoRoom);
    assert!(state.selected_staff.is_none());
    assert!(state.messages.is_empty());
}

#[test]
fn back_to_staff_list_keeps_the_panel_open() {
    let mut state = active("r-1");

    let leave = state.back_to_staff_list();

    assert_eq!(leave, Some(RoomSignal::Leave("r-1".to_owned())));
    assert!(state.open);
    assert_eq!(state.phase, RoomPhase::NoRoom);
    assert!(state.room.is_none());
}

#[test]
fn switching_staff_orders_leave_before_join() {
    let mut state = active("r-1");
    state.apply_history("r-1", page(vec![msg("m-1", "r-1", 0)], false), HistoryMode::Replace);

    // The leave signal is produced (and emitted by the caller) at selection
    // time; the join only exists once the new room commits, so the two can
    // never be observed in the wrong order.
    let leave = state.begin_conversation(staff("s-2"));
    assert_eq!(leave, Some(RoomSignal::Leave("r-1".to_owned())));
    assert!(state.messages.is_empty());

    let join = state.commit_room(room("r-2"), "s-2");
    assert_eq!(join, Some(RoomSignal::Join("r-2".to_owned())));
}

// =============================================================
// Presence
// =============================================================

#[test]
fn presence_broadcast_replaces_the_staff_list_wholesale() {
    let mut state = ChatState::default();
    state.apply_presence(vec![staff("s-1"), staff("s-2")]);
    state.apply_presence(vec![staff("s-3")]);

    let ids: Vec<&str> = state.staff.iter().map(|s| s.staff_id.as_str()).collect();
    assert_eq!(ids, vec!["s-3"]);
}

#[test]
fn disconnect_discards_staff_knowledge() {
    let mut state = ChatState {
        connection_status: ConnectionStatus::Connected,
        ..ChatState::default()
    };
    state.apply_presence(vec![staff("s-1")]);

    state.apply_disconnect();

    assert_eq!(state.connection_status, ConnectionStatus::Disconnected);
    assert!(state.staff.is_empty());
}

// =============================================================
// Live message acceptance
// =============================================================

#[test]
fn incoming_message_for_another_room_is_dropped() {
    let mut state = active("r-1");

    state.apply_incoming(msg("m-1", "r-2", 0));

    assert!(state.messages.is_empty());
}

#[test]
fn incoming_message_without_a_room_is_dropped() {
    let mut state = ChatState::default();
    state.apply_incoming(msg("m-1", "r-1", 0));
    assert!(state.messages.is_empty());
}

#[test]
fn incoming_message_appends_at_the_tail_and_scrolls_to_bottom() {
    let mut state = active("r-1");
    state.apply_history("r-1", page(vec![msg("m-1", "r-1", 0)], false), HistoryMode::Replace);

    state.apply_incoming(msg("m-2", "r-1", 5));

    let ids: Vec<&str> = state.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m-1", "m-2"]);
    assert_eq!(state.scroll, ScrollPlan::Bottom);
}

#[test]
fn incoming_message_with_a_held_id_is_dropped() {
    let mut state = active("r-1");
    state.apply_incoming(msg("m-1", "r-1", 0));
    state.apply_incoming(msg("m-1", "r-1", 0));

    assert_eq!(state.messages.len(), 1);
}

// =============================================================
// History paginator
// =============================================================

#[test]
fn replace_load_sets_cursor_and_scrolls_to_bottom() {
    let mut state = active("r-1");

    state.apply_history(
        "r-1",
        page(vec![msg("m-3", "r-1", 2), msg("m-4", "r-1", 3)], true),
        HistoryMode::Replace,
    );

    assert_eq!(state.messages.len(), 2);
    assert!(state.has_more);
    assert_eq!(state.oldest_message_id.as_deref(), Some("m-3"));
    assert_eq!(state.scroll, ScrollPlan::Bottom);
}

#[test]
fn prepend_concatenates_older_messages_before_the_list() {
    let mut state = active("r-1");
    state.apply_history(
        "r-1",
        page(vec![msg("m-3", "r-1", 2), msg("m-4", "r-1", 3)], true),
        HistoryMode::Replace,
    );

    state.history_loading = true;
    state.apply_history(
        "r-1",
        page(vec![msg("m-1", "r-1", 0), msg("m-2", "r-1", 1)], false),
        HistoryMode::Prepend { height: 600, top: 0 },
    );

    let ids: Vec<&str> = state.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m-1", "m-2", "m-3", "m-4"]);
    assert!(!state.has_more);
    assert_eq!(state.oldest_message_id.as_deref(), Some("m-1"));
    assert!(!state.history_loading);
    assert_eq!(state.scroll, ScrollPlan::Anchor { height: 600, top: 0 });
}

#[test]
fn full_flow_stays_ascending_with_unique_ids() {
    let mut state = active("r-1");
    state.apply_history(
        "r-1",
        page(vec![msg("m-3", "r-1", 10), msg("m-4", "r-1", 11)], true),
        HistoryMode::Replace,
    );
    state.apply_incoming(msg("m-5", "r-1", 12));
    state.history_loading = true;
    state.apply_history(
        "r-1",
        // Overlapping page: m-3 is already held and must not duplicate.
        page(
            vec![msg("m-1", "r-1", 8), msg("m-2", "r-1", 9), msg("m-3", "r-1", 10)],
            false,
        ),
        HistoryMode::Prepend { height: 400, top: 20 },
    );

    let ids: Vec<&str> = state.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m-1", "m-2", "m-3", "m-4", "m-5"]);
    assert!(
        state
            .messages
            .windows(2)
            .all(|pair| pair[0].created_at <= pair[1].created_at)
    );
}

#[test]
fn history_page_for_a_stale_room_is_discarded() {
    let mut state = active("r-2");

    state.apply_history("r-1", page(vec![msg("m-1", "r-1", 0)], true), HistoryMode::Replace);

    assert!(state.messages.is_empty());
    assert!(!state.has_more);
}

#[test]
fn prepend_of_an_empty_page_keeps_the_current_head_as_cursor() {
    let mut state = active("r-1");
    state.apply_history("r-1", page(vec![msg("m-2", "r-1", 1)], true), HistoryMode::Replace);

    state.history_loading = true;
    state.apply_history(
        "r-1",
        HistoryPage { messages: Vec::new(), has_more: false, oldest_message_id: None },
        HistoryMode::Prepend { height: 300, top: 0 },
    );

    assert_eq!(state.oldest_message_id.as_deref(), Some("m-2"));
    assert!(!state.has_more);
}

#[test]
fn begin_prepend_hands_out_the_cursor_once() {
    let mut state = active("r-1");
    state.apply_history("r-1", page(vec![msg("m-2", "r-1", 1)], true), HistoryMode::Replace);

    let first = state.begin_prepend();
    assert_eq!(first, Some(("r-1".to_owned(), Some("m-2".to_owned()))));

    // A second click while the fetch is in flight is a no-op.
    assert!(state.begin_prepend().is_none());
}

#[test]
fn begin_prepend_refuses_when_history_is_exhausted() {
    let mut state = active("r-1");
    state.apply_history("r-1", page(vec![msg("m-2", "r-1", 1)], false), HistoryMode::Replace);

    assert!(state.begin_prepend().is_none());
}

#[test]
fn failed_prepend_releases_the_guard_for_retry() {
    let mut state = active("r-1");
    state.apply_history("r-1", page(vec![msg("m-2", "r-1", 1)], true), HistoryMode::Replace);

    assert!(state.begin_prepend().is_some());
    state.release_history_guard("r-1");

    assert_eq!(
        state.begin_prepend(),
        Some(("r-1".to_owned(), Some("m-2".to_owned())))
    );
    assert_eq!(state.messages.len(), 1);
}

#[test]
fn stale_guard_release_does_not_touch_the_new_room() {
    let mut state = active("r-1");
    state.apply_history("r-1", page(vec![msg("m-1", "r-1", 0)], true), HistoryMode::Replace);
    assert!(state.begin_prepend().is_some());

    // Switch rooms while the r-1 fetch is in flight, then arm a fetch for
    // the new room before the stale error arrives.
    state.begin_conversation(staff("s-2"));
    state.commit_room(room("r-2"), "s-2");
    state.apply_history("r-2", page(vec![msg("m-9", "r-2", 0)], true), HistoryMode::Replace);
    assert!(state.begin_prepend().is_some());

    state.release_history_guard("r-1");

    assert!(state.history_loading);
}
