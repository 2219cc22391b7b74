//! The workflow test abstraction

use std::future::Future;

use async_trait::async_trait;

use crate::clients::ApiResult;
use crate::common::Result;
use crate::fixtures::Fixtures;

/// An end-to-end test run by `xq-runner`
#[async_trait]
pub trait Workflow: Send + Sync {
    /// Test title shown in reports
    fn title(&self) -> &str;

    /// Tags such as `@smoke`, matched by `--grep` together with the title
    fn tags(&self) -> &[&'static str] {
        &[]
    }

    /// Focus this test; outside CI only focused tests run
    fn only(&self) -> bool {
        false
    }

    /// Run the test body against fresh fixtures
    async fn run(&self, fixtures: &Fixtures) -> Result<()>;
}

/// Title plus tags, the string `--grep` is matched against
pub fn full_title(workflow: &dyn Workflow) -> String {
    let mut title = workflow.title().to_string();
    for tag in workflow.tags() {
        title.push(' ');
        title.push_str(tag);
    }
    title
}

/// Log the status and body of a failed API call before the error propagates
pub fn log_api_failure<T>(result: &Result<T>) {
    if let Err(e) = result {
        if let Some((status, body)) = e.api_response() {
            tracing::error!(status, body, "API Error: {}", status);
        }
    }
}

/// Best-effort cleanup: a failure is logged as a warning and swallowed
pub async fn cleanup<T, F>(what: &str, delete: F)
where
    F: Future<Output = ApiResult<T>>,
{
    if let Err(e) = delete.await {
        tracing::warn!("Failed to cleanup {}: {}", what, e);
    }
}
