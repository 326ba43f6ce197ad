//! HTTP server module.
//!
//! Exposes the search workflow as a streaming `/search` endpoint plus a
//! `/health` probe. Each request gets a fresh agent and provider session;
//! nothing conversational is shared between requests.

mod handlers;
mod routes;
mod state;
mod stream;

pub use routes::create_router;
pub use state::AppState;
pub use stream::{pipeline, Stage, StageData, StageEvent};
