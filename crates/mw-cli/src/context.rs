//! Per-invocation context: resolved paths and settings.
//!
//! Host resources are resolved lazily; only `mw add` needs a CA bundle.

use std::path::{Path, PathBuf};

use mw_auth::OAuth2Flow;
use mw_core::{Indexer, Reconciler, SyncDriver};
use mw_fs::Paths;
use mw_meta::Settings;
use tracing::debug;

use crate::cli::{GlobalArgs, SyncArgs};
use crate::error::Result;

pub struct Context {
    pub home: PathBuf,
    pub paths: Paths,
    pub settings: Settings,
}

impl Context {
    /// Resolve paths from the environment and load settings.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let home = dirs::home_dir().ok_or(mw_fs::Error::HomeNotFound)?;
        let paths = Paths::from_env()?;
        let settings_file = global
            .config
            .as_deref()
            .map(|p| expand_home(p, &home))
            .unwrap_or_else(|| paths.settings_file.clone());
        let settings = Settings::load(&settings_file)?;
        debug!(settings = %settings_file.display(), "Loaded settings");

        Ok(Self {
            home,
            paths,
            settings,
        })
    }

    /// The engine with the real OAuth flow.
    ///
    /// Host resources are resolved from settings only when an account is
    /// provisioned.
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(
            self.paths.clone(),
            self.settings.clone(),
            Box::new(OAuth2Flow::new()),
        )
    }

    /// A sync driver honoring `--sasl-path`, `--no-notmuch`, and settings.
    pub fn sync_driver(&self, args: &SyncArgs) -> SyncDriver {
        let sasl_path = args
            .sasl_path
            .clone()
            .or_else(|| self.settings.platform.candidates().find_sasl_dir());

        let driver = SyncDriver::new(self.paths.clone(), sasl_path)
            .with_program(self.settings.sync.program.clone());
        if self.settings.sync.notmuch && !args.no_notmuch {
            driver.with_indexer(Indexer::from_env(&self.home))
        } else {
            driver
        }
    }

    /// Expand a leading `~/` in a path given on the command line.
    pub fn expand(&self, path: &Path) -> PathBuf {
        expand_home(path, &self.home)
    }
}

fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
