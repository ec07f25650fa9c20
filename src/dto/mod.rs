//! Response payloads produced by the services and serialized by the routes.

pub mod api;
pub mod assistant;
pub mod bulk;
pub mod contacts;
pub mod list;
pub mod meta;
pub mod views;
