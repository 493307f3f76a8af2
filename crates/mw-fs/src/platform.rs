//! Host resource discovery
//!
//! The locations of the trusted CA bundle and the SASL plugin directory
//! differ between distributions. Callers pass an ordered candidate list,
//! resolve it once at startup, and hand the resulting [`Platform`] to the
//! engine.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

const DEFAULT_CA_BUNDLES: &[&str] = &[
    "/etc/ssl/certs/ca-certificates.crt",
    "/etc/pki/tls/certs/ca-bundle.crt",
    "/etc/ssl/cert.pem",
    "/etc/ssl/ca-bundle.pem",
    "/etc/pki/tls/cacert.pem",
    "/etc/pki/ca-trust/extracted/pem/tls-ca-bundle.pem",
];

// Homebrew prefixes first so a brewed cyrus-sasl wins over the system one.
const DEFAULT_SASL_DIRS: &[&str] = &[
    "/opt/homebrew/lib/sasl2",
    "/usr/local/lib/sasl2",
    "/usr/lib/sasl2",
    "/usr/lib64/sasl2",
];

/// Ordered candidate locations, first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCandidates {
    pub ca_bundles: Vec<PathBuf>,
    pub sasl_dirs: Vec<PathBuf>,
}

impl Default for PlatformCandidates {
    fn default() -> Self {
        Self {
            ca_bundles: DEFAULT_CA_BUNDLES.iter().map(PathBuf::from).collect(),
            sasl_dirs: DEFAULT_SASL_DIRS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl PlatformCandidates {
    /// First candidate that is a regular file.
    pub fn find_ca_bundle(&self) -> Result<PathBuf> {
        self.ca_bundles
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or_else(|| Error::CaBundleNotFound {
                searched: self.ca_bundles.clone(),
            })
    }

    /// First candidate that is a directory.
    pub fn find_sasl_dir(&self) -> Option<PathBuf> {
        self.sasl_dirs.iter().find(|p| p.is_dir()).cloned()
    }

    /// Resolve both resources. A missing CA bundle is fatal.
    pub fn resolve(&self) -> Result<Platform> {
        let ca_bundle = self.find_ca_bundle()?;
        let sasl_path = self.find_sasl_dir();
        tracing::debug!(ca_bundle = %ca_bundle.display(), sasl_path = ?sasl_path, "Resolved platform resources");
        Ok(Platform {
            ca_bundle,
            sasl_path,
        })
    }
}

/// Host resources resolved once and passed into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub ca_bundle: PathBuf,
    pub sasl_path: Option<PathBuf>,
}

impl Platform {
    pub fn new(ca_bundle: impl Into<PathBuf>, sasl_path: Option<PathBuf>) -> Self {
        Self {
            ca_bundle: ca_bundle.into(),
            sasl_path,
        }
    }

    pub fn ca_bundle(&self) -> &Path {
        &self.ca_bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn first_existing_bundle_wins() {
        let dir = tempdir().unwrap();
        let second = dir.path().join("second.pem");
        let third = dir.path().join("third.pem");
        fs::write(&second, "").unwrap();
        fs::write(&third, "").unwrap();

        let candidates = PlatformCandidates {
            ca_bundles: vec![dir.path().join("missing.pem"), second.clone(), third],
            sasl_dirs: vec![],
        };

        assert_eq!(candidates.find_ca_bundle().unwrap(), second);
    }

    #[test]
    fn directories_are_not_bundles() {
        let dir = tempdir().unwrap();
        let candidates = PlatformCandidates {
            ca_bundles: vec![dir.path().to_path_buf()],
            sasl_dirs: vec![],
        };

        let err = candidates.resolve().unwrap_err();
        assert!(matches!(err, Error::CaBundleNotFound { .. }));
        assert!(err.to_string().contains("CA certificate not found"));
    }

    #[test]
    fn sasl_dir_is_optional() {
        let dir = tempdir().unwrap();
        let bundle = dir.path().join("ca.pem");
        fs::write(&bundle, "").unwrap();
        let sasl = dir.path().join("sasl2");
        fs::create_dir(&sasl).unwrap();

        let without = PlatformCandidates {
            ca_bundles: vec![bundle.clone()],
            sasl_dirs: vec![dir.path().join("nope")],
        };
        assert_eq!(without.resolve().unwrap().sasl_path, None);

        let with = PlatformCandidates {
            ca_bundles: vec![bundle],
            sasl_dirs: vec![dir.path().join("nope"), sasl.clone()],
        };
        assert_eq!(with.resolve().unwrap().sasl_path, Some(sasl));
    }
}
