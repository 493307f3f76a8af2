//! Reset: remove everything provisioning created.
//!
//! The registry decides which accounts' artifacts are removed. Shared files
//! that the user may also edit are filtered line by line rather than
//! deleted.

use std::path::PathBuf;

use mw_blocks::filter_file;
use mw_fs::io;
use mw_meta::Registry;
use mw_templates::source_line;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::reconciler::Reconciler;

/// What a reset removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    /// Files, trees, and links that existed and were removed.
    pub removed: Vec<PathBuf>,
    /// Generated lines dropped from the top-level muttrc.
    pub dropped_lines: usize,
}

impl ResetReport {
    fn record(&mut self, path: &std::path::Path, removed: bool) {
        if removed {
            debug!(path = %path.display(), "Removed");
            self.removed.push(path.to_path_buf());
        }
    }
}

impl Reconciler {
    /// Remove all generated configuration, credentials, and local mail.
    ///
    /// Unless `confirmed`, returns [`Error::ResetNotConfirmed`] without
    /// touching anything.
    pub fn reset(&self, confirmed: bool) -> Result<ResetReport> {
        if !confirmed {
            return Err(Error::ResetNotConfirmed);
        }

        let paths = self.paths();
        let registry = Registry::load(&paths.accounts_file)?;
        let emails: Vec<String> = registry.emails().map(ToString::to_string).collect();
        let mut report = ResetReport::default();

        for email in &emails {
            let account_muttrc = paths.account_muttrc(email);
            report.record(&account_muttrc, io::remove_file_if_exists(&account_muttrc)?);
        }

        let base_source = source_line(&paths.base_muttrc);
        let accounts_dir = paths.mutt_accounts.display().to_string();
        let descriptions: Vec<String> = emails.iter().map(|e| format!("switch to {e}")).collect();
        report.dropped_lines = filter_file(&paths.main_muttrc(), |line| {
            let generated = line.trim() == base_source
                || (line.contains(&accounts_dir) && line.contains("source"))
                || descriptions.iter().any(|d| line.contains(d.as_str()));
            !generated
        })?;

        report.record(&paths.app_config, io::remove_dir_all_if_exists(&paths.app_config)?);

        for email in &emails {
            let maildir = paths.account_maildir(email);
            report.record(&maildir, io::remove_dir_all_if_exists(&maildir)?);
        }

        report.record(&paths.cache_dir, io::remove_dir_all_if_exists(&paths.cache_dir)?);
        report.record(&paths.isyncrc, io::remove_symlink_if_present(&paths.isyncrc)?);
        report.record(&paths.msmtp_log, io::remove_file_if_exists(&paths.msmtp_log)?);

        info!(
            accounts = emails.len(),
            removed = report.removed.len(),
            dropped_lines = report.dropped_lines,
            "Reset complete"
        );
        Ok(report)
    }
}
