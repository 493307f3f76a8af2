//! Shared test utilities for the mutt-wizard workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`env`]: [`TestEnv`], an isolated home directory with the XDG layout
//! - [`flow`]: [`ScriptedFlow`], an authorization flow with scripted outcomes

pub mod env;
pub mod flow;

pub use env::TestEnv;
pub use flow::{FlowCalls, ScriptedFlow};
