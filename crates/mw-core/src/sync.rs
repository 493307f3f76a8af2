//! Sync driver: run the synchronizer per configured channel, then index.
//!
//! Channels come from the generated sync config, so the driver works with
//! anything `add` produced even when the registry is missing. A failing
//! channel never stops the rest of the batch.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use mw_fs::{Paths, io};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Default synchronizer binary.
pub const SYNC_PROGRAM: &str = "mbsync";

/// Default indexer binary.
pub const INDEX_PROGRAM: &str = "notmuch";

/// Channel names declared in a sync config, in file order.
pub fn channels(sync_config: &str) -> Vec<String> {
    sync_config
        .lines()
        .filter(|line| line.starts_with("Channel "))
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

/// `KEY=VALUE` pairs from an environment file. Blank and `#` lines are skipped.
pub fn parse_env_file(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// One synchronizer run for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub channel: String,
    pub program: String,
    pub args: Vec<String>,
}

/// Everything resolved before any process is started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub invocations: Vec<Invocation>,
    /// Variables added on top of the inherited process environment.
    pub env: BTreeMap<String, String>,
    /// Requested targets with no matching channel.
    pub skipped: Vec<String>,
}

/// Outcome of [`SyncDriver::execute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
    pub indexed: bool,
}

/// The local mail indexer run after synchronizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indexer {
    pub program: String,
    /// Indexing is skipped unless this file exists.
    pub config: PathBuf,
}

impl Indexer {
    /// `notmuch`, configured by `NOTMUCH_CONFIG` or `~/.notmuch-config`.
    pub fn from_env(home: &Path) -> Self {
        let config = std::env::var_os("NOTMUCH_CONFIG")
            .filter(|v| !v.is_empty())
            .map(|v| expand_tilde(Path::new(&v), home))
            .unwrap_or_else(|| home.join(".notmuch-config"));
        Self {
            program: INDEX_PROGRAM.to_string(),
            config,
        }
    }
}

fn expand_tilde(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Resolve `program` the way a shell would: paths as given, bare names on `PATH`.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|p| p.is_file())
}

pub struct SyncDriver {
    paths: Paths,
    sasl_path: Option<PathBuf>,
    program: String,
    indexer: Option<Indexer>,
}

impl SyncDriver {
    pub fn new(paths: Paths, sasl_path: Option<PathBuf>) -> Self {
        Self {
            paths,
            sasl_path,
            program: SYNC_PROGRAM.to_string(),
            indexer: None,
        }
    }

    /// Use a different synchronizer binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Run `indexer` after the batch.
    pub fn with_indexer(mut self, indexer: Indexer) -> Self {
        self.indexer = Some(indexer);
        self
    }

    /// Resolve channels, environment, and invocations for `targets`.
    ///
    /// An empty `targets` means every configured channel. A resolved SASL
    /// directory is persisted to the environment file for later runs.
    pub fn plan(&self, targets: &[String]) -> Result<SyncPlan> {
        let config = &self.paths.mbsync_config;
        let configured = io::read_text_if_exists(config)?
            .map(|content| channels(&content))
            .unwrap_or_default();
        if configured.is_empty() {
            return Err(Error::NoAccountsConfigured);
        }

        let mut env = io::read_text_if_exists(&self.paths.env_file)?
            .map(|content| parse_env_file(&content))
            .unwrap_or_default();
        if let Some(sasl_path) = &self.sasl_path {
            let value = sasl_path.display().to_string();
            if let Err(e) = io::write_text(&self.paths.env_file, &format!("SASL_PATH={value}\n")) {
                warn!("Could not write {}: {e}", self.paths.env_file.display());
            }
            env.insert("SASL_PATH".to_string(), value);
        }

        let requested: Vec<String> = if targets.is_empty() {
            configured.clone()
        } else {
            targets.to_vec()
        };

        let mut plan = SyncPlan {
            env,
            ..SyncPlan::default()
        };
        for target in requested {
            if !configured.contains(&target) {
                warn!(account = %target, "Account not found in sync config");
                plan.skipped.push(target);
                continue;
            }
            plan.invocations.push(Invocation {
                program: self.program.clone(),
                args: vec![
                    "-c".to_string(),
                    config.display().to_string(),
                    "-q".to_string(),
                    target.clone(),
                ],
                channel: target,
            });
        }
        debug!(
            channels = plan.invocations.len(),
            skipped = plan.skipped.len(),
            "Planned sync"
        );
        Ok(plan)
    }

    /// Run every invocation, then the indexer. Failures are warnings.
    pub fn execute(&self, plan: &SyncPlan) -> SyncReport {
        let mut report = SyncReport {
            skipped: plan.skipped.clone(),
            ..SyncReport::default()
        };

        for invocation in &plan.invocations {
            debug!(channel = %invocation.channel, program = %invocation.program, "Synchronizing");
            if spawn(OsStr::new(&invocation.program), &invocation.args, &plan.env) {
                report.synced.push(invocation.channel.clone());
            } else {
                report.failed.push(invocation.channel.clone());
            }
        }

        if let Some(indexer) = &self.indexer {
            report.indexed = self.index(indexer, &plan.env);
        }

        info!(
            synced = report.synced.len(),
            failed = report.failed.len(),
            indexed = report.indexed,
            "Sync complete"
        );
        report
    }

    /// [`plan`](Self::plan) then [`execute`](Self::execute).
    pub fn run(&self, targets: &[String]) -> Result<SyncReport> {
        let plan = self.plan(targets)?;
        Ok(self.execute(&plan))
    }

    fn index(&self, indexer: &Indexer, env: &BTreeMap<String, String>) -> bool {
        let Some(program) = find_program(&indexer.program) else {
            debug!(program = %indexer.program, "Indexer not installed");
            return false;
        };
        if !indexer.config.exists() {
            debug!(config = %indexer.config.display(), "Indexer not configured");
            return false;
        }
        let args = ["new".to_string(), "--quiet".to_string()];
        spawn(program.as_os_str(), &args, env)
    }
}

/// Run a child with inherited stdio. `false` on spawn failure or non-zero exit.
fn spawn(program: &OsStr, args: &[String], env: &BTreeMap<String, String>) -> bool {
    match Command::new(program).args(args).envs(env).status() {
        Ok(status) if status.success() => true,
        Ok(status) => {
            warn!("{} exited with {status}", program.to_string_lossy());
            false
        }
        Err(e) => {
            warn!("Failed to run {}: {e}", program.to_string_lossy());
            false
        }
    }
}
