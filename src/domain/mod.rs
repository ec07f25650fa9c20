//! Domain types and rules of the contact service.

pub mod communication;
pub mod contact;
pub mod document;
pub mod list;
pub mod meta;
pub mod saved_view;
pub mod types;
