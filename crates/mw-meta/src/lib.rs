//! Account metadata and user settings for mutt-wizard.
//!
//! This crate provides the account record, the validated email type that
//! keys it, the persistent account registry, and the optional TOML
//! settings file.

pub mod account;
pub mod config;
pub mod error;
pub mod registry;

pub use account::{Account, AccountDraft, AccountKind, AuthMethod, EmailAddress};
pub use config::Settings;
pub use error::{Error, Result};
pub use registry::Registry;
