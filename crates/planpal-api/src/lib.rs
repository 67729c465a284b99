//! # planpal-api
//!
//! REST door into the realtime pipeline, plus the combined server binary
//! that hosts both the REST API and the WebSocket gateway over one shared
//! router. A REST mutation and its gateway twin produce the same store write
//! and the same broadcast.

pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
