//! Create a routine with the write service and read it back

use async_trait::async_trait;

use crate::common::Result;
use crate::fixtures::Fixtures;
use crate::testing::expect::{expect_contains, expect_eq, expect_status, expect_true};
use crate::testing::Workflow;

const DESCRIPTION: &str = "Test routine for create and get workflow";

pub struct CreateAndGetRoutine;

#[async_trait]
impl Workflow for CreateAndGetRoutine {
    fn title(&self) -> &str {
        "Create Routine and Get Routine Detail"
    }

    fn tags(&self) -> &[&'static str] {
        &["@smoke"]
    }

    async fn run(&self, fixtures: &Fixtures) -> Result<()> {
        let mut routine_id = None;
        let result = steps(fixtures, &mut routine_id).await;
        super::finish(fixtures, routine_id, result).await
    }
}

async fn steps(fixtures: &Fixtures, routine_id: &mut Option<i64>) -> Result<()> {
    // Step 1: create routine using write service
    let created = super::create_routine(fixtures, "Test Routine", DESCRIPTION).await?;
    *routine_id = Some(created.id);

    expect_contains("created routine name", &created.name, "Test Routine")?;
    expect_eq(
        "created routine description",
        created.description.as_deref(),
        Some(DESCRIPTION),
    )?;
    expect_true("created routine isActive", created.is_active)?;

    // Step 2: get routine detail using read service
    let response = fixtures.xq_read.routines.get_routine_by_id(created.id).await?;
    expect_status("get routine", &response, 200)?;

    // workoutDays is required by the model, so decoding already checked its shape.
    let detail = response.data;
    expect_eq("routine detail id", detail.id, created.id)?;
    expect_eq("routine detail name", &detail.name, &created.name)?;
    expect_eq(
        "routine detail description",
        &detail.description,
        &created.description,
    )?;
    expect_eq("routine detail isActive", detail.is_active, created.is_active)?;

    Ok(())
}
