//! Package-relative paths
//!
//! The launcher runs the test runner with the package root as its working
//! directory, so the config file and report paths below are relative to it.

use std::path::{Path, PathBuf};

/// Name of the runner executable shipped next to `xq-keeper`
pub const RUNNER_NAME: &str = "xq-runner";

/// Environment variable that overrides runner discovery
pub const RUNNER_ENV: &str = "XQ_KEEPER_RUNNER";

/// Runner configuration file, looked up in the package root
pub const CONFIG_FILE: &str = "xq-keeper.toml";

/// Optional environment file, looked up in the package root
pub const DOTENV_FILE: &str = ".env";

/// Default JSON report location
pub const DEFAULT_JSON_REPORT: &str = "reports/test-results.json";

/// Default HTML report directory
pub const DEFAULT_HTML_REPORT_DIR: &str = "reports/html";

/// File name of the runner executable on this platform
pub fn runner_file_name() -> String {
    format!("{}{}", RUNNER_NAME, std::env::consts::EXE_SUFFIX)
}

/// The package root
///
/// This is the crate manifest directory when it still exists (running from
/// a checkout), otherwise the current working directory.
pub fn package_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if manifest_dir.is_dir() {
        return manifest_dir;
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Get the path to the runner configuration file under `root`
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn dotenv_path(root: &Path) -> PathBuf {
    root.join(DOTENV_FILE)
}

/// Path of the runner sitting next to the given executable
pub fn sibling_runner(exe: &Path) -> Option<PathBuf> {
    exe.parent().map(|dir| dir.join(runner_file_name()))
}
