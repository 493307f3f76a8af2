//! Filesystem layer for mutt-wizard
//!
//! Resolves every location the tool reads or writes from the XDG base
//! directories, locates host resources (CA bundle, SASL plugins) from an
//! injectable candidate list, and provides the atomic write primitives the
//! upper layers build on.

pub mod error;
pub mod io;
pub mod locator;
pub mod platform;

pub use error::{Error, Result};
pub use locator::{BaseDirs, Paths};
pub use platform::{Platform, PlatformCandidates};
