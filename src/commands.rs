//! CLI command definitions
//!
//! Defines the clap commands for the `xq-runner` binary.

use clap::Subcommand;
use std::path::PathBuf;

use crate::common::config::ReporterKind;

#[derive(Subcommand)]
pub enum Commands {
    /// Run workflow tests
    Test {
        /// Only run tests whose title (with tags) matches this regex
        #[arg(long, short = 'g')]
        grep: Option<String>,

        /// Skip tests whose title (with tags) matches this regex
        #[arg(long)]
        grep_invert: Option<String>,

        /// Only run tests of this project
        #[arg(long)]
        project: Option<String>,

        /// Retry failed tests up to N times (default: 0, or 2 in CI)
        #[arg(long)]
        retries: Option<u32>,

        /// Per-test timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Reporters to use, comma separated (default: html,list,json)
        #[arg(long, value_enum, value_delimiter = ',')]
        reporter: Vec<ReporterKind>,

        /// List matching tests without running them
        #[arg(long)]
        list: bool,

        /// Configuration file (default: xq-keeper.toml in the package root)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show where the HTML report of the last run is
    ShowReport {
        /// Report directory (default: reports/html)
        report: Option<PathBuf>,
    },

    /// Record a test from a browser session
    Codegen {
        /// Page to open
        url: Option<String>,
    },

    /// Install runner dependencies
    Install,
}
