//! Database models shared across the contact repository.

pub mod communication;
#[cfg(feature = "server")]
pub mod config;
pub mod contact;
pub mod document;
pub mod saved_view;
