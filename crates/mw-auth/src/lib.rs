//! OAuth2 credential lifecycle for mutt-wizard accounts.
//!
//! One credential file per account moves through a small state machine:
//!
//! ```text
//! absent | invalid --authorize--> valid
//! valid (expired, refresh token) --refresh--> valid
//!                                 --refresh fails--> authorize
//! ```
//!
//! [`CredentialManager`] drives the transitions; the network side sits
//! behind the [`AuthorizationFlow`] trait so the state machine can be tested
//! without a browser or token endpoint.

pub mod callback;
pub mod client;
pub mod credential;
pub mod error;
pub mod flow;
pub mod manager;
pub mod oauth2_flow;

pub use client::ClientConfig;
pub use credential::{Credential, CredentialState, TokenGrant};
pub use error::{Error, Result};
pub use flow::AuthorizationFlow;
pub use manager::{CredentialManager, Transition};
pub use oauth2_flow::OAuth2Flow;
