//! Configuration reconciliation engine for mutt-wizard
//!
//! Sits above the filesystem, merge, registry, template, and credential
//! crates and implements every operation the `mw` and `mailsync` binaries
//! expose:
//!
//! - **Provisioning**: [`Reconciler::add_account`] writes and merges all
//!   per-account artifacts idempotently
//! - **Identifiers**: [`identifier`] allocates the reader's account-switch keys
//! - **Teardown**: [`Reconciler::reset`] removes what provisioning created
//! - **Credentials**: [`Reconciler::refresh_credential`] and
//!   [`Reconciler::access_token`]
//! - **Sync**: [`SyncDriver`] runs the synchronizer and indexer
//!
//! ```text
//!                   mw-cli
//!                      |
//!                   mw-core
//!                      |
//!     +--------+-------+-------+----------+
//!     |        |       |       |          |
//!   mw-fs  mw-blocks mw-meta mw-templates mw-auth
//! ```

pub mod error;
pub mod identifier;
pub mod reconciler;
pub mod sync;
pub mod teardown;

pub use error::{Error, ErrorCategory, Result};
pub use identifier::{existing_id_for, next_account_id};
pub use reconciler::{MAIN_MUTTRC_HEADER, Reconciler};
pub use sync::{Indexer, Invocation, SyncDriver, SyncPlan, SyncReport};
pub use teardown::ResetReport;
