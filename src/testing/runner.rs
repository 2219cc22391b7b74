//! Test runner implementation
//!
//! Runs workflow tests strictly one after another. Every attempt gets fresh
//! fixtures from the provider and runs under the per-test timeout; failed
//! attempts are retried up to the configured count.

use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;

use crate::common::{Error, Result};
use crate::fixtures::FixtureProvider;

use super::report::Reporter;
use super::workflow::{full_title, Workflow};

/// Effective settings of one run, after config file, environment and flags
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub project: String,
    pub base_url: String,
    pub retries: u32,
    pub timeout: Duration,
    pub forbid_only: bool,
    pub grep: Option<Regex>,
    pub grep_invert: Option<Regex>,
}

impl RunSettings {
    pub fn new(project: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            base_url: base_url.into(),
            retries: 0,
            timeout: Duration::from_secs(60),
            forbid_only: false,
            grep: None,
            grep_invert: None,
        }
    }

    fn matches(&self, title: &str) -> bool {
        self.grep.as_ref().map_or(true, |re| re.is_match(title))
            && self.grep_invert.as_ref().map_or(true, |re| !re.is_match(title))
    }
}

/// Compile a `--grep` pattern
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Status of a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttemptStatus {
    Passed,
    Failed,
    TimedOut,
}

/// Final verdict on a test across its attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    /// Passed on the first attempt
    Expected,
    /// Never passed
    Unexpected,
    /// Passed on a retry
    Flaky,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub retry: u32,
    pub status: AttemptStatus,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of a test run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub title: String,
    pub tags: Vec<String>,
    pub outcome: Outcome,
    /// Status of the last attempt
    pub status: AttemptStatus,
    pub attempts: Vec<Attempt>,
}

impl TestResult {
    fn from_attempts(workflow: &dyn Workflow, attempts: Vec<Attempt>) -> Self {
        let status = attempts
            .last()
            .map(|a| a.status)
            .unwrap_or(AttemptStatus::Failed);
        let outcome = match status {
            AttemptStatus::Passed if attempts.len() > 1 => Outcome::Flaky,
            AttemptStatus::Passed => Outcome::Expected,
            _ => Outcome::Unexpected,
        };
        Self {
            title: workflow.title().to_string(),
            tags: workflow.tags().iter().map(|t| t.to_string()).collect(),
            outcome,
            status,
            attempts,
        }
    }

    /// Total time spent across attempts
    pub fn duration_ms(&self) -> u64 {
        self.attempts.iter().map(|a| a.duration_ms).sum()
    }

    /// Error of the last attempt, if it failed
    pub fn error(&self) -> Option<&str> {
        self.attempts.last().and_then(|a| a.error.as_deref())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteConfig {
    pub project: String,
    pub base_url: String,
    pub retries: u32,
    pub timeout_ms: u64,
    pub workers: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub start_time: String,
    pub duration_ms: u64,
    pub expected: usize,
    pub unexpected: usize,
    pub flaky: usize,
}

/// Everything the reporters need about a finished run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResult {
    pub config: SuiteConfig,
    pub stats: Stats,
    pub tests: Vec<TestResult>,
}

impl SuiteResult {
    fn new(
        settings: &RunSettings,
        start_time: String,
        elapsed: Duration,
        tests: Vec<TestResult>,
    ) -> Self {
        let count = |outcome| tests.iter().filter(|t| t.outcome == outcome).count();
        let stats = Stats {
            start_time,
            duration_ms: elapsed.as_millis() as u64,
            expected: count(Outcome::Expected),
            unexpected: count(Outcome::Unexpected),
            flaky: count(Outcome::Flaky),
        };
        Self {
            config: SuiteConfig {
                project: settings.project.clone(),
                base_url: settings.base_url.clone(),
                retries: settings.retries,
                timeout_ms: settings.timeout.as_millis() as u64,
                workers: 1,
            },
            stats,
            tests,
        }
    }

    /// Flaky tests count as passing
    pub fn passed(&self) -> bool {
        self.stats.unexpected == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

/// Pick the tests to run, in registration order
///
/// Focused (`only`) tests narrow the selection, or abort the run when
/// `forbid_only` is set. Grep filters apply to the title plus tags.
pub fn select<'a>(
    workflows: &'a [Box<dyn Workflow>],
    settings: &RunSettings,
) -> Result<Vec<&'a dyn Workflow>> {
    let focused: Vec<&dyn Workflow> = workflows
        .iter()
        .map(|w| w.as_ref())
        .filter(|w| w.only())
        .collect();

    if !focused.is_empty() && settings.forbid_only {
        let titles: Vec<&str> = focused.iter().map(|w| w.title()).collect();
        return Err(Error::ForbiddenOnly(titles.join(", ")));
    }

    let pool: Vec<&dyn Workflow> = if focused.is_empty() {
        workflows.iter().map(|w| w.as_ref()).collect()
    } else {
        focused
    };

    Ok(pool
        .into_iter()
        .filter(|w| settings.matches(&full_title(*w)))
        .collect())
}

/// Run the selected tests sequentially and feed every reporter
pub async fn run_suite(
    tests: &[&dyn Workflow],
    provider: &dyn FixtureProvider,
    settings: &RunSettings,
    reporters: &mut [Box<dyn Reporter>],
) -> Result<SuiteResult> {
    let started = Instant::now();
    let start_time = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    tracing::debug!(
        tests = tests.len(),
        base_url = %settings.base_url,
        "Starting test run"
    );

    for reporter in reporters.iter_mut() {
        reporter.on_begin(settings, tests.len());
    }

    let mut results = Vec::with_capacity(tests.len());
    for workflow in tests {
        let result = run_test(*workflow, provider, settings).await;
        for reporter in reporters.iter_mut() {
            reporter.on_test_end(&result);
        }
        results.push(result);
    }

    let suite = SuiteResult::new(settings, start_time, started.elapsed(), results);

    // Every reporter gets to finish; the first failure is returned afterwards
    let mut first_error = None;
    for reporter in reporters.iter_mut() {
        if let Err(e) = reporter.on_end(&suite) {
            tracing::error!("Reporter failed: {}", e);
            first_error.get_or_insert(e);
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(suite),
    }
}

async fn run_test(
    workflow: &dyn Workflow,
    provider: &dyn FixtureProvider,
    settings: &RunSettings,
) -> TestResult {
    let mut attempts = Vec::new();

    for retry in 0..=settings.retries {
        if retry > 0 {
            tracing::info!(test = workflow.title(), retry, "Retrying failed test");
        }

        let attempt = run_attempt(workflow, provider, settings, retry).await;
        let passed = attempt.status == AttemptStatus::Passed;
        attempts.push(attempt);
        if passed {
            break;
        }
    }

    TestResult::from_attempts(workflow, attempts)
}

async fn run_attempt(
    workflow: &dyn Workflow,
    provider: &dyn FixtureProvider,
    settings: &RunSettings,
    retry: u32,
) -> Attempt {
    // Fresh handles per attempt; dropped when the attempt ends.
    let fixtures = provider.provide(&settings.base_url);
    let started = Instant::now();

    let outcome = tokio::time::timeout(settings.timeout, workflow.run(&fixtures)).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    // A timed-out test never reached its own cleanup
    if tokio::time::timeout(settings.timeout, fixtures.delete_leftovers())
        .await
        .is_err()
    {
        tracing::warn!(test = workflow.title(), "Cleanup of leftover routines timed out");
    }

    let (status, error) = match outcome {
        Ok(Ok(())) => (AttemptStatus::Passed, None),
        Ok(Err(e)) => (AttemptStatus::Failed, Some(e.to_string())),
        Err(_) => (
            AttemptStatus::TimedOut,
            Some(Error::Timeout(settings.timeout).to_string()),
        ),
    };

    Attempt {
        retry,
        status,
        duration_ms,
        error,
    }
}
