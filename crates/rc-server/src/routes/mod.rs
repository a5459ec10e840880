//! Route handlers for the HTTP API.

pub mod health;
pub mod history;
pub mod stream;
pub mod videos;
