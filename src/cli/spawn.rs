//! Runner process launching
//!
//! Finds the `xq-runner` executable and runs it in the foreground with the
//! invocation's arguments, forwarding its exit code.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;

use super::Invocation;
use crate::common::config::BASE_URL_ENV;
use crate::common::{paths, Error, Result};

/// Something that can execute a runner invocation and report its exit code
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, invocation: &Invocation) -> Result<i32>;
}

/// Launches the runner as a child process sharing our stdio
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    pub program: PathBuf,
    pub cwd: PathBuf,
}

impl ProcessLauncher {
    pub fn new(program: PathBuf, cwd: PathBuf) -> Self {
        Self { program, cwd }
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, invocation: &Invocation) -> Result<i32> {
        tracing::debug!(
            program = %self.program.display(),
            cwd = %self.cwd.display(),
            "Spawning runner"
        );

        // A missing cwd also surfaces as NotFound from spawn
        if !self.cwd.is_dir() {
            return Err(Error::Spawn(io::Error::new(
                io::ErrorKind::NotFound,
                format!("working directory {} does not exist", self.cwd.display()),
            )));
        }

        let mut child = tokio::process::Command::new(&self.program)
            .args(&invocation.args)
            .env(BASE_URL_ENV, &invocation.base_url)
            .current_dir(&self.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let status = child.wait().await.map_err(Error::Spawn)?;

        // Terminated by a signal: no code to forward
        Ok(status.code().unwrap_or(0))
    }
}

impl ProcessLauncher {
    fn spawn_error(&self, e: io::Error) -> Error {
        if e.kind() == io::ErrorKind::NotFound {
            Error::runner_not_found(&[self.program.display().to_string()])
        } else {
            Error::Spawn(e)
        }
    }
}

/// Find the runner executable
///
/// Checked in order: `XQ_KEEPER_RUNNER`, an `xq-runner` next to the current
/// executable, then `xq-runner` on `PATH`.
pub fn locate_runner() -> Result<PathBuf> {
    let mut searched = Vec::new();

    if let Some(path) = std::env::var_os(paths::RUNNER_ENV).filter(|v| !v.is_empty()) {
        // An explicit override is used as-is; a bad path surfaces at spawn
        return Ok(PathBuf::from(path));
    }
    searched.push(format!("${}", paths::RUNNER_ENV));

    if let Some(sibling) = std::env::current_exe()
        .ok()
        .and_then(|exe| paths::sibling_runner(&exe))
    {
        if sibling.is_file() {
            return Ok(sibling);
        }
        searched.push(sibling.display().to_string());
    }

    match which::which(paths::RUNNER_NAME) {
        Ok(path) => Ok(path),
        Err(e) => {
            tracing::debug!("{} not on PATH: {}", paths::RUNNER_NAME, e);
            searched.push("PATH".to_string());
            Err(Error::runner_not_found(&searched))
        }
    }
}

/// Launcher used when the runner could not be located
///
/// Reports the lookup failure through the normal launch path so the caller
/// prints the same remediation either way.
#[derive(Debug)]
pub struct MissingRunner {
    searched: String,
}

impl MissingRunner {
    pub fn new(error: &Error) -> Self {
        let searched = match error {
            Error::RunnerNotFound { searched } => searched.clone(),
            other => other.to_string(),
        };
        Self { searched }
    }
}

#[async_trait]
impl Launcher for MissingRunner {
    async fn launch(&self, _invocation: &Invocation) -> Result<i32> {
        Err(Error::RunnerNotFound {
            searched: self.searched.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation() -> Invocation {
        Invocation {
            args: vec!["test".to_string()],
            base_url: "http://localhost:8080".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_runner_not_found() {
        let launcher = ProcessLauncher::new(
            PathBuf::from("/definitely/not/here/xq-runner"),
            std::env::temp_dir(),
        );
        let err = launcher.launch(&invocation()).await.unwrap_err();
        assert!(matches!(err, Error::RunnerNotFound { .. }));
        assert!(err.to_string().contains("/definitely/not/here/xq-runner"));
    }

    #[tokio::test]
    async fn test_missing_runner_launcher_reports_not_found() {
        let err = Error::runner_not_found(&["PATH"]);
        let launcher = MissingRunner::new(&err);
        let result = launcher.launch(&invocation()).await;
        assert!(matches!(result, Err(Error::RunnerNotFound { ref searched }) if searched == "PATH"));
    }

    #[tokio::test]
    async fn test_missing_cwd_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = ProcessLauncher::new(PathBuf::from("true"), dir.path().join("gone"));
        let err = launcher.launch(&invocation()).await.unwrap_err();
        assert!(matches!(err, Error::Spawn(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_is_forwarded() {
        let launcher = ProcessLauncher::new(PathBuf::from("false"), std::env::temp_dir());
        assert_eq!(launcher.launch(&invocation()).await.unwrap(), 1);

        let launcher = ProcessLauncher::new(PathBuf::from("true"), std::env::temp_dir());
        assert_eq!(launcher.launch(&invocation()).await.unwrap(), 0);
    }
}
