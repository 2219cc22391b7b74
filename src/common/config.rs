//! Runner configuration file handling

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::{self, config_path, dotenv_path};
use super::{Error, Result};

/// Environment variable holding the API base URL
pub const BASE_URL_ENV: &str = "API_BASE_URL";

/// Base URL used when neither a flag nor the environment provides one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Environment variable that switches on CI mode
pub const CI_ENV: &str = "CI";

/// Main configuration structure, read from `xq-keeper.toml`
#[derive(Debug, Deserialize)]
pub struct RunnerConfig {
    /// Project name
    #[serde(default = "default_project")]
    pub project: String,

    /// Retry count for failed tests (defaults depend on CI)
    #[serde(default)]
    pub retries: Option<u32>,

    /// Per-test timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Fail the run when a test is marked `only` (defaults depend on CI)
    #[serde(default)]
    pub forbid_only: Option<bool>,

    /// Base URL used when `API_BASE_URL` is unset
    #[serde(default)]
    pub base_url: Option<String>,

    /// Reporter settings
    #[serde(default)]
    pub reporter: ReporterConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            retries: None,
            timeout_secs: default_timeout(),
            forbid_only: None,
            base_url: None,
            reporter: ReporterConfig::default(),
        }
    }
}

fn default_project() -> String {
    "api-tests".to_string()
}

fn default_timeout() -> u64 {
    60
}

/// Reporter kinds understood by the runner
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReporterKind {
    /// Self-contained HTML page
    Html,
    /// One line per test on stdout
    List,
    /// Machine-readable results file
    Json,
}

/// Reporter settings
#[derive(Debug, Deserialize)]
pub struct ReporterConfig {
    /// Reporters enabled for a run
    #[serde(default = "default_reporters")]
    pub kinds: Vec<ReporterKind>,

    /// Where the JSON reporter writes its results
    #[serde(default = "default_json_output")]
    pub json_output_file: PathBuf,

    /// Where the HTML reporter writes `index.html`
    #[serde(default = "default_html_dir")]
    pub html_output_dir: PathBuf,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            kinds: default_reporters(),
            json_output_file: default_json_output(),
            html_output_dir: default_html_dir(),
        }
    }
}

fn default_reporters() -> Vec<ReporterKind> {
    vec![ReporterKind::Html, ReporterKind::List, ReporterKind::Json]
}

fn default_json_output() -> PathBuf {
    PathBuf::from(paths::DEFAULT_JSON_REPORT)
}

fn default_html_dir() -> PathBuf {
    PathBuf::from(paths::DEFAULT_HTML_REPORT_DIR)
}

/// The environment variables the runner reads
#[derive(Debug, Clone, Default)]
pub struct RunnerEnv {
    /// Whether `CI` is set to a non-empty value
    pub ci: bool,
    /// Value of `API_BASE_URL`
    pub api_base_url: Option<String>,
}

impl RunnerEnv {
    /// Process environment plus `<root>/.env`; variables already set win
    pub fn load(root: &Path) -> Result<Self> {
        let dotenv = read_dotenv(root)?;
        Ok(Self::resolve(|key| std::env::var(key).ok(), &dotenv))
    }

    /// Look each variable up in `process` first, then in `dotenv`
    pub fn resolve<F>(process: F, dotenv: &HashMap<String, String>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| process(key).or_else(|| dotenv.get(key).cloned());
        Self {
            ci: non_empty(lookup(CI_ENV).as_deref()).is_some(),
            api_base_url: lookup(BASE_URL_ENV),
        }
    }
}

/// Read the `KEY=value` pairs of `<root>/.env`; a missing file is empty
pub fn read_dotenv(root: &Path) -> Result<HashMap<String, String>> {
    let path = dotenv_path(root);
    if !path.is_file() {
        return Ok(HashMap::new());
    }

    let invalid = |e: dotenvy::Error| Error::Config(format!("invalid {}: {}", path.display(), e));
    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(&path).map_err(invalid)? {
        let (key, value) = item.map_err(invalid)?;
        vars.insert(key, value);
    }
    tracing::debug!(path = %path.display(), count = vars.len(), "Loaded environment file");
    Ok(vars)
}

impl RunnerConfig {
    /// Load configuration from `xq-keeper.toml` under `root`
    ///
    /// Returns default configuration if the file doesn't exist
    pub fn load(root: &Path) -> Result<Self> {
        let path = config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Effective retry count: explicit value, else 2 in CI and 0 otherwise
    pub fn retries(&self, env: &RunnerEnv) -> u32 {
        self.retries.unwrap_or(if env.ci { 2 } else { 0 })
    }

    /// Whether tests marked `only` abort the run
    pub fn forbid_only(&self, env: &RunnerEnv) -> bool {
        self.forbid_only.unwrap_or(env.ci)
    }

    /// Effective base URL: `API_BASE_URL`, else the file, else the default
    pub fn base_url(&self, env: &RunnerEnv) -> String {
        resolve_base_url(&[env.api_base_url.as_deref(), self.base_url.as_deref()])
    }

    /// Per-test timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// First non-empty candidate, else [`DEFAULT_BASE_URL`]
pub fn resolve_base_url(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .find_map(|c| non_empty(*c))
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}

/// Treat empty strings as absent
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
