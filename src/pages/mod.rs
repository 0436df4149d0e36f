//! Page-level components routed by the root `App`.

pub mod home;
pub mod login;
