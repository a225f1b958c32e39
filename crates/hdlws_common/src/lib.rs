//! Shared foundational types used across the hdlws workspace tools.
//!
//! This crate provides HDL file classification, excluded-directory checks,
//! and the notification bus through which the project store and module graph
//! cache announce state changes to subscribed views.

#![warn(missing_docs)]

pub mod bus;
pub mod file_kind;

pub use bus::{Notification, NotificationBus};
pub use file_kind::{
    is_excluded, is_hdl_source, path_string, FileRole, CONSTRAINT_EXTENSIONS, SOURCE_EXTENSIONS,
};
