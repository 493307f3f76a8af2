//! [`TestEnv`]: a throwaway home directory for reconciliation scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use mw_fs::{BaseDirs, Paths, Platform};
use tempfile::TempDir;

/// Client secrets in the "installed application" shape.
pub const CLIENT_SECRETS_JSON: &str = r#"{
  "installed": {
    "client_id": "test-client.apps.googleusercontent.com",
    "client_secret": "test-secret",
    "auth_uri": "https://accounts.google.com/o/oauth2/auth",
    "token_uri": "https://oauth2.googleapis.com/token"
  }
}
"#;

/// A temporary home with XDG paths, a fake CA bundle, and helpers for
/// reading what provisioning wrote.
///
/// # Example
///
/// ```rust,no_run
/// use mw_test_utils::TestEnv;
///
/// let env = TestEnv::new();
/// env.write_file(".config/mutt/muttrc", "set editor=vim\n");
/// env.assert_file_contains(".config/mutt/muttrc", "editor");
/// ```
pub struct TestEnv {
    temp_dir: TempDir,
    pub paths: Paths,
    pub platform: Platform,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    /// Create a home directory with default XDG locations and a CA bundle.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Like [`TestEnv::new`], with a SASL plugin directory resolved.
    pub fn with_sasl() -> Self {
        Self::build(Some("sasl2"))
    }

    fn build(sasl_dir: Option<&str>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let home = temp_dir.path();

        let ca_bundle = home.join("certs").join("ca-certificates.crt");
        fs::create_dir_all(ca_bundle.parent().unwrap()).unwrap();
        fs::write(&ca_bundle, "-----BEGIN CERTIFICATE-----\n").unwrap();

        let sasl_path = sasl_dir.map(|dir| {
            let path = home.join(dir);
            fs::create_dir_all(&path).unwrap();
            path
        });

        Self {
            paths: Paths::new(BaseDirs::resolve(home, |_| None)),
            platform: Platform::new(ca_bundle, sasl_path),
            temp_dir,
        }
    }

    /// The fake home directory.
    pub fn home(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Resolve `path` relative to the home directory.
    pub fn path(&self, path: &str) -> PathBuf {
        self.home().join(path)
    }

    /// Environment variables that point a child process at this home.
    pub fn vars(&self) -> Vec<(&'static str, PathBuf)> {
        vec![
            ("HOME", self.home().to_path_buf()),
            ("XDG_CONFIG_HOME", self.paths.config_home.clone()),
            ("XDG_DATA_HOME", self.paths.data_home.clone()),
            ("XDG_CACHE_HOME", self.paths.cache_home.clone()),
            ("XDG_STATE_HOME", self.paths.state_home.clone()),
        ]
    }

    /// Write a settings file that only finds this environment's CA bundle.
    pub fn write_settings(&self, extra: &str) -> PathBuf {
        let content = format!(
            "[platform]\nca_bundles = ['{}']\nsasl_dirs = []\n\n{extra}",
            self.platform.ca_bundle().display()
        );
        let path = self.paths.settings_file.clone();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Write valid client secrets outside the managed tree and return their path.
    pub fn write_client_secrets(&self) -> PathBuf {
        let path = self.path("downloads/client_secret.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, CLIENT_SECRETS_JSON).unwrap();
        path
    }

    /// Write `content` at `path` relative to home, creating parents.
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.path(path);
        fs::create_dir_all(full_path.parent().unwrap()).unwrap();
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Read a file by absolute path.
    ///
    /// # Panics
    /// Panics with the path if the file cannot be read.
    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Could not read file {}: {e}", path.display()))
    }

    /// Assert that the file at `path` (relative to home) contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.path(path);
        let file_content = self.read(&full_path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }

    /// Count lines in `content` equal to `line` after trimming.
    pub fn count_lines(content: &str, line: &str) -> usize {
        content.lines().filter(|l| l.trim() == line).count()
    }
}
