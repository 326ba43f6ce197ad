//! # Blueprint Agent
//!
//! LLM-orchestrated tooling for Lean 4 formalization work: drafting and
//! refining proof blueprints, and searching formalized mathematics through
//! the Lean Explore API.
//!
//! The crate has three layers:
//!
//! - **[`provider`]** — the LLM transport. [`provider::Provider`] is an
//!   object-safe session trait; [`provider::OpenAiProvider`] speaks the
//!   OpenAI-compatible chat API (OpenRouter by default), and
//!   [`provider::MockProvider`] serves canned replies for tests.
//! - **[`agent`]** — conversation-holding workflows. [`agent::ChatAgent`]
//!   pairs a provider session with an append-only log;
//!   [`agent::BlueprintAgent`] drives the generate/refine/fix blueprint
//!   cycle, and [`agent::SearchAgent`] the query/search/analyze cycle.
//! - **[`server`]** — an axum HTTP server exposing the search workflow as
//!   a staged server-sent-events stream.
//!
//! ## Quick Start
//!
//! ```no_run
//! use blueprint_agent::agent::SearchAgent;
//! use blueprint_agent::config::Settings;
//! use blueprint_agent::explore::ExploreClient;
//! use blueprint_agent::prompts::PromptSet;
//! use blueprint_agent::provider::OpenAiProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env();
//!     let provider = OpenAiProvider::new(
//!         &settings.openai_base_url,
//!         settings.require_api_key()?,
//!         &settings.model_name,
//!     );
//!     let explore = ExploreClient::new(&settings.lean_explore_base_url, None);
//!     let prompts = Arc::new(PromptSet::load(&settings.prompts_dir));
//!
//!     let mut agent = SearchAgent::new(Box::new(provider), Some(explore), prompts);
//!     let outcome = agent.run("Does addition on naturals commute?", 10).await?;
//!     println!("{:?}", outcome.cover_match);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod analysis;
pub mod config;
pub mod error;
pub mod explore;
pub mod message;
pub mod prompts;
pub mod provider;
pub mod server;

pub use agent::{BlueprintAgent, ChatAgent, SearchAgent};
pub use error::{AgentError, Result};

/// Crate version, from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
