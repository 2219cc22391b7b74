//! Reporters for test runs
//!
//! The list reporter prints progress as tests finish; the JSON and HTML
//! reporters write their files once the run is over.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::common::config::{ReporterConfig, ReporterKind};
use crate::common::{Error, Result};

use super::runner::{AttemptStatus, Outcome, RunSettings, SuiteResult, TestResult};

/// Receives run events from the runner
pub trait Reporter {
    fn on_begin(&mut self, _settings: &RunSettings, _total: usize) {}

    fn on_test_end(&mut self, _test: &TestResult) {}

    fn on_end(&mut self, _suite: &SuiteResult) -> Result<()> {
        Ok(())
    }
}

/// Build the configured reporters; output paths are resolved against `root`
pub fn build_reporters(
    kinds: &[ReporterKind],
    config: &ReporterConfig,
    root: &Path,
) -> Vec<Box<dyn Reporter>> {
    kinds
        .iter()
        .map(|kind| -> Box<dyn Reporter> {
            match kind {
                ReporterKind::List => Box::new(ListReporter::default()),
                ReporterKind::Json => Box::new(JsonReporter::new(root.join(&config.json_output_file))),
                ReporterKind::Html => Box::new(HtmlReporter::new(root.join(&config.html_output_dir))),
            }
        })
        .collect()
}

/// One line per test on stdout
#[derive(Debug, Default)]
pub struct ListReporter {
    index: usize,
}

impl Reporter for ListReporter {
    fn on_begin(&mut self, _settings: &RunSettings, total: usize) {
        println!(
            "\n{} {} {} using 1 worker\n",
            "Running".blue().bold(),
            total,
            if total == 1 { "test" } else { "tests" }
        );
    }

    fn on_test_end(&mut self, test: &TestResult) {
        self.index += 1;
        let mark = match (test.outcome, test.status) {
            (Outcome::Flaky, _) => "↻".yellow(),
            (_, AttemptStatus::Passed) => "✓".green(),
            (_, AttemptStatus::TimedOut) => "⏱".red(),
            (_, AttemptStatus::Failed) => "✗".red(),
        };

        let mut title = test.title.clone();
        for tag in &test.tags {
            title.push(' ');
            title.push_str(tag);
        }

        println!(
            "  {} {} {} {}",
            mark,
            self.index,
            title,
            format!("({})", format_duration(test.duration_ms())).dimmed()
        );

        if test.outcome == Outcome::Unexpected {
            if let Some(error) = test.error() {
                println!("      {}", error.red());
            }
        }
    }

    fn on_end(&mut self, suite: &SuiteResult) -> Result<()> {
        let stats = &suite.stats;
        let summary = format!(
            "{} passed, {} failed, {} flaky ({})",
            stats.expected,
            stats.unexpected,
            stats.flaky,
            format_duration(stats.duration_ms)
        );
        if suite.passed() {
            println!("\n  {}\n", summary.green().bold());
        } else {
            println!("\n  {}\n", summary.red().bold());
        }
        Ok(())
    }
}

/// Writes the whole run as JSON
#[derive(Debug)]
pub struct JsonReporter {
    output_file: PathBuf,
}

impl JsonReporter {
    pub fn new(output_file: PathBuf) -> Self {
        Self { output_file }
    }
}

impl Reporter for JsonReporter {
    fn on_end(&mut self, suite: &SuiteResult) -> Result<()> {
        let json = serde_json::to_string_pretty(suite)?;
        write_file(&self.output_file, &json)?;
        tracing::debug!(path = %self.output_file.display(), "Wrote JSON report");
        Ok(())
    }
}

/// Writes `index.html` into the report directory
#[derive(Debug)]
pub struct HtmlReporter {
    output_dir: PathBuf,
}

impl HtmlReporter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Location of the report page inside a report directory
    pub fn index_path(output_dir: &Path) -> PathBuf {
        output_dir.join("index.html")
    }
}

impl Reporter for HtmlReporter {
    fn on_end(&mut self, suite: &SuiteResult) -> Result<()> {
        let path = Self::index_path(&self.output_dir);
        write_file(&path, &render_html(suite))?;
        tracing::debug!(path = %path.display(), "Wrote HTML report");
        Ok(())
    }
}

fn render_html(suite: &SuiteResult) -> String {
    let mut rows = String::new();
    for test in &suite.tests {
        let (class, label) = match (test.outcome, test.status) {
            (Outcome::Flaky, _) => ("flaky", "flaky"),
            (_, AttemptStatus::Passed) => ("passed", "passed"),
            (_, AttemptStatus::TimedOut) => ("failed", "timed out"),
            (_, AttemptStatus::Failed) => ("failed", "failed"),
        };
        let tags = test.tags.join(" ");
        let error = test
            .attempts
            .iter()
            .filter_map(|a| {
                a.error
                    .as_ref()
                    .map(|e| format!("<div>retry #{}: {}</div>", a.retry, escape_html(e)))
            })
            .collect::<String>();
        rows.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            escape_html(&test.title),
            escape_html(&tags),
            label,
            test.attempts.len(),
            format_duration(test.duration_ms()),
            error
        ));
    }

    let stats = &suite.stats;
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{project} report</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; width: 100%; }}
td, th {{ border: 1px solid #ddd; padding: 0.4rem; text-align: left; vertical-align: top; }}
tr.passed td:nth-child(3) {{ color: #2e7d32; }}
tr.failed td:nth-child(3) {{ color: #c62828; }}
tr.flaky td:nth-child(3) {{ color: #ef6c00; }}
</style>
</head>
<body>
<h1>{project}</h1>
<p>Base URL: <code>{base_url}</code> &middot; Started {start} &middot; {duration}</p>
<p>{expected} passed, {unexpected} failed, {flaky} flaky</p>
<table>
<tr><th>Test</th><th>Tags</th><th>Status</th><th>Attempts</th><th>Duration</th><th>Errors</th></tr>
{rows}</table>
</body>
</html>
"#,
        project = escape_html(&suite.config.project),
        base_url = escape_html(&suite.config.base_url),
        start = escape_html(&stats.start_time),
        duration = format_duration(stats.duration_ms),
        expected = stats.expected,
        unexpected = stats.unexpected,
        flaky = stats.flaky,
        rows = rows,
    )
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let to_error = |e: std::io::Error| Error::FileWrite {
        path: path.display().to_string(),
        error: e.to_string(),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    std::fs::write(path, content).map_err(to_error)
}

/// `812ms` below a second, `1.2s` above
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
