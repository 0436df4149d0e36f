//! Scroll-position bookkeeping for the message viewport.
//!
//! Prepending older messages grows the scroll container above the reader's
//! position; without a correction the visible messages jump. The correction
//! is computed here as a pure function so the paginator logic stays
//! testable without a DOM, and applied to the real element only under
//! `hydrate`.

#[cfg(test)]
#[path = "scroll_anchor_test.rs"]
mod scroll_anchor_test;

/// Pending scroll adjustment for the message viewport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ScrollPlan {
    #[default]
    None,
    /// Jump to the newest message (initial load, live append).
    Bottom,
    /// Keep previously visible messages anchored after a prepend.
    /// `height` and `top` are the container metrics captured before the
    /// fetch was issued.
    Anchor { height: i32, top: i32 },
}

/// Scroll offset that keeps the previously visible content in place after
/// the container grows from `old_height` to `new_height` above it.
pub fn anchored_top(old_height: i32, old_top: i32, new_height: i32) -> i32 {
    old_top + (new_height - old_height)
}

/// Apply a scroll plan to the live container element.
#[cfg(feature = "hydrate")]
pub fn apply_plan(el: &web_sys::Element, plan: &ScrollPlan) {
    match plan {
        ScrollPlan::None => {}
        ScrollPlan::Bottom => el.set_scroll_top(el.scroll_height()),
        ScrollPlan::Anchor { height, top } => {
            el.set_scroll_top(anchored_top(*height, *top, el.scroll_height()));
        }
    }
}
