//! Reusable UI components for the support chat widget.

pub mod chat_widget;
pub mod conversation;
pub mod staff_list;
