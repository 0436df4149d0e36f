//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `chat`) so individual components can
//! depend on small focused models. All chat mutations go through the
//! transition methods on `ChatState`; components and the gateway task never
//! poke its fields directly.

pub mod auth;
pub mod chat;
