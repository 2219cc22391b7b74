//! End-to-end workflow tests against the xq-fitness services
//!
//! Every workflow creates its own routine and deletes it when it is done,
//! whatever the outcome, so tests never see each other's data.

mod routines;
mod snapshots;
mod workout_days;

use chrono::Utc;

use crate::clients::models::{CreateRoutineRequest, MuscleGroup, RoutineResponse};
use crate::common::Result;
use crate::fixtures::Fixtures;
use crate::testing::expect::{expect_some, expect_status};
use crate::testing::{cleanup, log_api_failure, Workflow};

pub use routines::CreateAndGetRoutine;
pub use snapshots::WeeklySnapshotReport;
pub use workout_days::WorkoutDayWithSets;

/// All registered workflow tests, in run order
pub fn all() -> Vec<Box<dyn Workflow>> {
    vec![
        Box::new(CreateAndGetRoutine),
        Box::new(WorkoutDayWithSets),
        Box::new(WeeklySnapshotReport),
    ]
}

/// `"<prefix> <millis>"`, unique enough for data created by one run
pub(crate) fn unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, Utc::now().timestamp_millis())
}

/// Create an active routine through the write service, expecting `201`
pub(crate) async fn create_routine(
    fixtures: &Fixtures,
    prefix: &str,
    description: &str,
) -> Result<RoutineResponse> {
    let response = fixtures
        .xq_write
        .routines
        .create_routine(&CreateRoutineRequest {
            name: unique_name(prefix),
            description: Some(description.to_string()),
            is_active: true,
        })
        .await?;
    fixtures.created.track(response.data.id);
    expect_status("create routine", &response, 201)?;
    Ok(response.data)
}

/// First muscle group known to the read service
pub(crate) async fn first_muscle_group(fixtures: &Fixtures) -> Result<MuscleGroup> {
    let response = fixtures.xq_read.muscle_groups.get_muscle_groups().await?;
    expect_status("list muscle groups", &response, 200)?;
    expect_some("first muscle group", response.data.into_iter().next())
}

/// Finish a workflow: surface API errors, then delete the routine if one was created
pub(crate) async fn finish(
    fixtures: &Fixtures,
    routine_id: Option<i64>,
    result: Result<()>,
) -> Result<()> {
    log_api_failure(&result);

    if let Some(id) = routine_id {
        fixtures.created.untrack(id);
        cleanup(
            &format!("routine {}", id),
            fixtures.xq_write.routines.delete_routine(id),
        )
        .await;
    }

    result
}
