//! The `xq-keeper` launcher
//!
//! Turns the command line plus environment into a runner invocation:
//! handles `--help` and `--version`, pulls out `--base-url`, inserts the
//! default `test` subcommand and resolves `API_BASE_URL`. Everything else
//! is passed through to the runner untouched.

pub mod spawn;

use crate::common::config::{non_empty, resolve_base_url};
use crate::common::{Error, Result};

pub use spawn::{locate_runner, Launcher, MissingRunner, ProcessLauncher};

/// Subcommands the runner understands; anything else gets `test` prepended
pub const RUNNER_SUBCOMMANDS: [&str; 4] = ["test", "show-report", "codegen", "install"];

const BASE_URL_FLAG: &str = "--base-url";

/// What the launcher should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Help,
    Version,
    Run(Invocation),
}

/// A finalized runner invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Arguments for the runner, starting with its subcommand
    pub args: Vec<String>,
    /// Value exported as `API_BASE_URL` to the runner
    pub base_url: String,
}

/// Work out what to do from the arguments (without the program name) and
/// the current `API_BASE_URL`
pub fn plan<S: AsRef<str>>(args: &[S], env_base_url: Option<&str>) -> Result<Action> {
    let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();

    if args.iter().any(|a| *a == "--help" || *a == "-h") {
        return Ok(Action::Help);
    }
    if args.iter().any(|a| *a == "--version" || *a == "-v") {
        return Ok(Action::Version);
    }

    let mut flag_base_url: Option<String> = None;
    let mut forwarded: Vec<String> = Vec::with_capacity(args.len() + 1);

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == BASE_URL_FLAG {
            let value = iter
                .next()
                .ok_or_else(|| Error::MissingFlagValue(BASE_URL_FLAG.to_string()))?;
            flag_base_url = Some(value.to_string());
        } else if let Some(value) = arg.strip_prefix("--base-url=") {
            flag_base_url = Some(value.to_string());
        } else {
            forwarded.push(arg.to_string());
        }
    }

    let has_subcommand = forwarded
        .first()
        .is_some_and(|first| RUNNER_SUBCOMMANDS.contains(&first.as_str()));
    if !has_subcommand {
        forwarded.insert(0, "test".to_string());
    }

    let base_url = resolve_base_url(&[non_empty(flag_base_url.as_deref()), env_base_url]);

    Ok(Action::Run(Invocation {
        args: forwarded,
        base_url,
    }))
}

/// Package version as printed by `--version`
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Usage text printed by `--help`
pub fn help_text() -> String {
    format!(
        r#"
XQ Keeper - API Test Suite

Usage:
  xq-keeper [--base-url <url>] [runner-command] [runner-args]

Runner commands:
  test                 Run workflow tests (default)
  show-report          Show where the last HTML report is
  codegen              Not supported for API tests
  install              Install runner dependencies

Options:
  --base-url <url>     API base URL for this run (overrides {env})
  --base-url=<url>     Same as above
  --help, -h           Show this help
  --version, -v        Show version

Examples:
  xq-keeper
  xq-keeper test --grep "Create Routine"
  xq-keeper test --grep @smoke --retries 1
  xq-keeper --base-url=http://api.example.com test --reporter list
  xq-keeper show-report

Environment Variables:
  {env}         API base URL (default: {default})
  CI                   Enables CI mode in the runner (retries, forbid 'only')
  {runner}     Path to the runner executable

Examples with environment variable:
  {env}=http://api.example.com xq-keeper test --grep @smoke

Installation:
  cargo install xq-keeper
"#,
        env = crate::common::config::BASE_URL_ENV,
        default = crate::common::config::DEFAULT_BASE_URL,
        runner = crate::common::paths::RUNNER_ENV,
    )
}

/// Remediation printed when the runner cannot be found
pub fn runner_not_found_help(error: &Error) -> String {
    format!(
        "Error: {}\n\
         Make sure xq-keeper is installed with its runner:\n  \
         cargo install xq-keeper\n\
         Or if working from a checkout:\n  \
         cargo build --bins\n\
         Or point {} at an xq-runner executable.",
        error,
        crate::common::paths::RUNNER_ENV
    )
}

/// Run the launcher and return the process exit code
pub async fn run<S: AsRef<str>>(
    args: &[S],
    env_base_url: Option<&str>,
    launcher: &dyn Launcher,
) -> i32 {
    let invocation = match plan(args, env_base_url) {
        Ok(Action::Help) => {
            println!("{}", help_text());
            return 0;
        }
        Ok(Action::Version) => {
            println!("{}", version());
            return 0;
        }
        Ok(Action::Run(invocation)) => invocation,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    tracing::debug!(
        args = ?invocation.args,
        base_url = %invocation.base_url,
        "Launching test runner"
    );

    match launcher.launch(&invocation).await {
        Ok(code) => code,
        Err(e @ Error::RunnerNotFound { .. }) => {
            eprintln!("{}", runner_not_found_help(&e));
            1
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::DEFAULT_BASE_URL;

    fn run_plan(args: &[&str], env: Option<&str>) -> Invocation {
        match plan(args, env).unwrap() {
            Action::Run(invocation) => invocation,
            other => panic!("Expected Run, got {:?}", other),
        }
    }

    #[test]
    fn test_help_wins_anywhere() {
        assert_eq!(plan(&["--help"], None).unwrap(), Action::Help);
        assert_eq!(
            plan(&["test", "--grep", "x", "-h"], None).unwrap(),
            Action::Help
        );
        assert_eq!(plan(&["-v", "--help"], None).unwrap(), Action::Help);
        assert_eq!(plan(&["--base-url", "--help"], None).unwrap(), Action::Help);
    }

    #[test]
    fn test_version_anywhere() {
        assert_eq!(plan(&["--version"], None).unwrap(), Action::Version);
        assert_eq!(plan(&["test", "-v"], None).unwrap(), Action::Version);
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_empty_args_default_to_test() {
        let invocation = run_plan(&[], None);
        assert_eq!(invocation.args, vec!["test"]);
    }

    #[test]
    fn test_known_subcommand_unchanged() {
        let invocation = run_plan(&["test", "--grep", "@smoke"], None);
        assert_eq!(invocation.args, vec!["test", "--grep", "@smoke"]);

        let invocation = run_plan(&["codegen"], None);
        assert_eq!(invocation.args, vec!["codegen"]);

        let invocation = run_plan(&["show-report"], None);
        assert_eq!(invocation.args, vec!["show-report"]);
    }

    #[test]
    fn test_flags_only_get_test_prepended() {
        let invocation = run_plan(&["--grep", "@smoke"], None);
        assert_eq!(invocation.args, vec!["test", "--grep", "@smoke"]);
    }

    #[test]
    fn test_base_url_flag_overrides_env() {
        let invocation = run_plan(&["--base-url=http://x", "test"], Some("http://y"));
        assert_eq!(invocation.base_url, "http://x");
        assert_eq!(invocation.args, vec!["test"]);

        let invocation = run_plan(&["test", "--base-url", "http://x", "--list"], Some("http://y"));
        assert_eq!(invocation.base_url, "http://x");
        assert_eq!(invocation.args, vec!["test", "--list"]);
    }

    #[test]
    fn test_base_url_from_env_or_default() {
        assert_eq!(run_plan(&["test"], Some("http://y")).base_url, "http://y");
        assert_eq!(run_plan(&["test"], None).base_url, DEFAULT_BASE_URL);
        assert_eq!(run_plan(&["test"], Some("")).base_url, DEFAULT_BASE_URL);
        assert_eq!(
            run_plan(&["--base-url=", "test"], Some("http://y")).base_url,
            "http://y"
        );
    }

    #[test]
    fn test_removed_base_url_exposes_subcommand() {
        let invocation = run_plan(&["--base-url", "http://x", "show-report"], None);
        assert_eq!(invocation.args, vec!["show-report"]);
    }

    #[test]
    fn test_last_base_url_wins() {
        let invocation = run_plan(&["--base-url=http://a", "--base-url", "http://b"], None);
        assert_eq!(invocation.base_url, "http://b");
    }

    #[test]
    fn test_base_url_without_value_is_error() {
        let err = plan(&["test", "--base-url"], None).unwrap_err();
        assert!(matches!(err, Error::MissingFlagValue(ref f) if f == "--base-url"));
    }

    #[test]
    fn test_help_text_mentions_env() {
        let help = help_text();
        assert!(help.contains("API_BASE_URL"));
        assert!(help.contains("http://localhost:8080"));
        assert!(help.contains("--base-url"));
    }
}
