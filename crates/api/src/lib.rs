//! Euribor rates API server library.
//!
//! Exposes configuration, state, error handling, routes and the background
//! workers so integration tests and the binary entrypoint share them.

pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
