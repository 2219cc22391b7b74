//! Workflow test runner
//!
//! Implements the `xq-runner` subcommands: discovering the registered
//! workflow tests, running them one at a time, and reporting the results.

pub mod expect;
mod report;
mod runner;
mod workflow;

use std::path::Path;

use crate::commands::Commands;
use crate::common::config::{RunnerConfig, RunnerEnv};
use crate::common::{Error, Result};
use crate::fixtures::HttpFixtureProvider;
use crate::workflows;

pub use report::{
    build_reporters, escape_html, format_duration, HtmlReporter, JsonReporter, ListReporter,
    Reporter,
};
pub use runner::{
    compile_pattern, run_suite, select, Attempt, AttemptStatus, Outcome, RunSettings, Stats,
    SuiteConfig, SuiteResult, TestResult,
};
pub use workflow::{cleanup, full_title, log_api_failure, Workflow};

/// Dispatch a runner command; returns the process exit code
///
/// `root` is the directory the config file and report paths are relative to.
pub async fn dispatch(command: Commands, root: &Path) -> Result<i32> {
    match command {
        Commands::Test {
            grep,
            grep_invert,
            project,
            retries,
            timeout,
            reporter,
            list,
            config,
        } => {
            let config = match config {
                Some(path) => RunnerConfig::load_from(&root.join(path))?,
                None => RunnerConfig::load(root)?,
            };
            let env = RunnerEnv::load(root)?;

            if let Some(requested) = project {
                if requested != config.project {
                    return Err(Error::ProjectNotFound {
                        requested,
                        available: config.project.clone(),
                    });
                }
            }

            let mut settings = RunSettings::new(config.project.clone(), config.base_url(&env));
            settings.retries = retries.unwrap_or_else(|| config.retries(&env));
            settings.timeout = match timeout {
                Some(secs) => std::time::Duration::from_secs(secs),
                None => config.timeout(),
            };
            settings.forbid_only = config.forbid_only(&env);
            settings.grep = grep.as_deref().map(compile_pattern).transpose()?;
            settings.grep_invert = grep_invert.as_deref().map(compile_pattern).transpose()?;

            let all = workflows::all();
            let selected = select(&all, &settings)?;

            if list {
                for workflow in &selected {
                    println!("  {}", full_title(*workflow));
                }
                println!("Total: {} tests", selected.len());
                return Ok(0);
            }

            if selected.is_empty() {
                eprintln!("Error: No tests found");
                return Ok(1);
            }

            let kinds = if reporter.is_empty() {
                config.reporter.kinds.clone()
            } else {
                reporter
            };
            let mut reporters = build_reporters(&kinds, &config.reporter, root);

            let suite = run_suite(&selected, &HttpFixtureProvider, &settings, &mut reporters).await?;
            Ok(suite.exit_code())
        }

        Commands::ShowReport { report } => {
            let dir = match report {
                Some(dir) => root.join(dir),
                None => root.join(RunnerConfig::load(root)?.reporter.html_output_dir),
            };
            let index = HtmlReporter::index_path(&dir);
            if !index.exists() {
                return Err(Error::ReportNotFound(index.display().to_string()));
            }
            println!("{}", index.display());
            Ok(0)
        }

        Commands::Codegen { .. } => Err(Error::unsupported(
            "codegen",
            "API workflows are written in src/workflows, there is no browser session to record",
        )),

        Commands::Install => {
            println!("Nothing to install: API tests need no browser binaries.");
            Ok(0)
        }
    }
}
