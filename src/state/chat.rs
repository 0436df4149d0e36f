#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use crate::net::types::{ChatMessage, Envelope, HistoryPage, Room, StaffPresence};
use crate::util::scroll_anchor::ScrollPlan;

/// Messages fetched per history page.
pub const HISTORY_PAGE_SIZE: usize = 6;

/// Gateway connection status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Lifecycle of the support conversation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoomPhase {
    /// No conversation; the panel (if open) shows the staff list.
    #[default]
    NoRoom,
    /// Room creation in flight for the selected staff member.
    Initializing,
    /// A room is active and its message list is live.
    Active,
}

/// A room signal for the caller to emit on the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoomSignal {
    Leave(String),
    Join(String),
}

impl RoomSignal {
    pub fn to_envelope(&self) -> Envelope {
        match self {
            Self::Leave(room_id) => Envelope::leave_room(room_id),
            Self::Join(room_id) => Envelope::join_room(room_id),
        }
    }
}

/// How a fetched history page mutates the message list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryMode {
    /// Replace the list wholesale (initial load, room switch).
    Replace,
    /// Concatenate the page before the existing list. Carries the viewport
    /// metrics captured before the fetch, for scroll anchoring.
    Prepend { height: i32, top: i32 },
}

/// State for the support chat widget.
///
/// The active room, its message list, and the pagination cursor are owned
/// exclusively here. Every writer (components, the gateway task) goes
/// through the transition methods below, which keep the invariants: the
/// list is ordered oldest-to-newest, holds no duplicate ids, and never
/// mixes rooms.
#[derive(Clone, Debug, Default)]
pub struct ChatState {
    pub open: bool,
    pub connection_status: ConnectionStatus,
    pub staff: Vec<StaffPresence>,
    pub phase: RoomPhase,
    pub selected_staff: Option<StaffPresence>,
    pub room: Option<Room>,
    pub messages: Vec<ChatMessage>,
    pub has_more: bool,
    pub oldest_message_id: Option<String>,
    pub history_loading: bool,
    pub scroll: ScrollPlan,
}

impl ChatState {
    /// Replace the known online staff with the latest broadcast.
    pub fn apply_presence(&mut self, staff: Vec<StaffPresence>) {
        self.staff = staff;
    }

    /// The gateway connection dropped: staff knowledge is stale, discard it.
    pub fn apply_disconnect(&mut self) {
        self.connection_status = ConnectionStatus::Disconnected;
        self.staff.clear();
    }

    /// Select a staff member and start a new conversation.
    ///
    /// Returns the leave signal for the previous room, if one was active,
    /// which the caller must emit before any signal for the new room.
    pub fn begin_conversation(&mut self, staff: StaffPresence) -> Option<RoomSignal> {
        let leave = self.reset_room();
        self.selected_staff = Some(staff);
        self.phase = RoomPhase::Initializing;
        leave
    }

    /// Commit a created room and return the join signal to emit.
    ///
    /// The room creation round-trip is unordered with respect to user
    /// actions, so the commit is guarded: if the user has since closed the
    /// panel or picked a different staff member, the stale room is ignored
    /// and no reference is set.
    pub fn commit_room(&mut self, room: Room, requested_staff_id: &str) -> Option<RoomSignal> {
        if self.phase != RoomPhase::Initializing {
            return None;
        }
        if self.selected_staff.as_ref().map(|s| s.staff_id.as_str())
            != Some(requested_staff_id)
        {
            return None;
        }

        let join = RoomSignal::Join(room.id.clone());
        self.room = Some(room);
        self.phase = RoomPhase::Active;
        Some(join)
    }

    /// Room creation failed: return to the staff list with no partial state.
    pub fn abort_room_init(&mut self, requested_staff_id: &str) {
        if self.phase == RoomPhase::Initializing
            && self.selected_staff.as_ref().map(|s| s.staff_id.as_str())
                == Some(requested_staff_id)
        {
            self.phase = RoomPhase::NoRoom;
            self.selected_staff = None;
        }
    }

    /// Close the panel and tear the conversation down.
    pub fn close_panel(&mut self) -> Option<RoomSignal> {
        self.open = false;
        let leave = self.reset_room();
        self.selected_staff = None;
        self.phase = RoomPhase::NoRoom;
        leave
    }

    /// Leave the conversation but keep the panel open on the staff list.
    pub fn back_to_staff_list(&mut self) -> Option<RoomSignal> {
        let leave = self.reset_room();
        self.selected_staff = None;
        self.phase = RoomPhase::NoRoom;
        leave
    }

    /// Append a live message if it belongs to the active room.
    ///
    /// Messages for any other room are dropped here; membership is the
    /// filter, not join bookkeeping, so redundant joins cannot duplicate
    /// delivery. A message whose id is already held is dropped too.
    pub fn apply_incoming(&mut self, message: ChatMessage) {
        let Some(room) = &self.room else {
            return;
        };
        if room.id != message.room_id {
            return;
        }
        if self.messages.iter().any(|m| m.id == message.id) {
            return;
        }
        self.messages.push(message);
        self.scroll = ScrollPlan::Bottom;
    }

    /// Arm a backward history fetch.
    ///
    /// Returns the room id and `before` cursor for the fetch, or `None`
    /// when there is no room, no older history, or a fetch is already in
    /// flight (rapid repeated clicks collapse into one request).
    pub fn begin_prepend(&mut self) -> Option<(String, Option<String>)> {
        let room = self.room.as_ref()?;
        if self.history_loading || !self.has_more {
            return None;
        }
        self.history_loading = true;
        Some((room.id.clone(), self.oldest_message_id.clone()))
    }

    /// Commit a fetched history page.
    ///
    /// `room_id` is the room the fetch was issued for; a page arriving for
    /// a room that is no longer active is discarded without touching state.
    pub fn apply_history(&mut self, room_id: &str, page: HistoryPage, mode: HistoryMode) {
        let Some(room) = &self.room else {
            return;
        };
        if room.id != room_id {
            return;
        }

        let explicit_oldest = page.oldest_message_id.clone();
        match mode {
            HistoryMode::Replace => {
                self.messages = page.messages;
                self.scroll = ScrollPlan::Bottom;
            }
            HistoryMode::Prepend { height, top } => {
                let mut combined = page.messages;
                combined.retain(|m| !self.messages.iter().any(|held| held.id == m.id));
                combined.append(&mut self.messages);
                self.messages = combined;
                self.history_loading = false;
                self.scroll = ScrollPlan::Anchor { height, top };
            }
        }

        self.has_more = page.has_more;
        self.oldest_message_id =
            explicit_oldest.or_else(|| self.messages.first().map(|m| m.id.clone()));
    }

    /// A history fetch failed: release the in-flight guard so "Load more"
    /// stays clickable. The list and cursor are untouched.
    pub fn release_history_guard(&mut self, room_id: &str) {
        if self.room.as_ref().map(|r| r.id.as_str()) == Some(room_id) {
            self.history_loading = false;
        }
    }

    fn reset_room(&mut self) -> Option<RoomSignal> {
        let leave = self.room.take().map(|r| RoomSignal::Leave(r.id));
        self.messages.clear();
        self.has_more = false;
        self.oldest_message_id = None;
        self.history_loading = false;
        self.scroll = ScrollPlan::None;
        leave
    }
}
