//! Snapshot a routine's week and check the weekly progress report

use async_trait::async_trait;

use crate::clients::models::{CreateWorkoutDayRequest, CreateWorkoutDaySetRequest};
use crate::common::Result;
use crate::fixtures::Fixtures;
use crate::testing::expect::{expect_eq, expect_some, expect_status};
use crate::testing::Workflow;

const SETS: i32 = 5;

pub struct WeeklySnapshotReport;

#[async_trait]
impl Workflow for WeeklySnapshotReport {
    fn title(&self) -> &str {
        "Create Weekly Snapshot and Get Progress Report"
    }

    fn tags(&self) -> &[&'static str] {
        &["@reports"]
    }

    async fn run(&self, fixtures: &Fixtures) -> Result<()> {
        let mut routine_id = None;
        let result = steps(fixtures, &mut routine_id).await;
        super::finish(fixtures, routine_id, result).await
    }
}

async fn steps(fixtures: &Fixtures, routine_id: &mut Option<i64>) -> Result<()> {
    let routine = super::create_routine(
        fixtures,
        "Test Routine",
        "Test routine for weekly snapshot workflow",
    )
    .await?;
    *routine_id = Some(routine.id);

    let muscle_group = super::first_muscle_group(fixtures).await?;

    let day = fixtures
        .xq_write
        .workout_days
        .create_workout_day(&CreateWorkoutDayRequest {
            routine_id: routine.id,
            day_number: 3,
            day_name: "Wednesday".to_string(),
            notes: None,
        })
        .await?;
    expect_status("create workout day", &day, 201)?;

    let set = fixtures
        .xq_write
        .workout_day_sets
        .create_workout_day_set(&CreateWorkoutDaySetRequest {
            workout_day_id: day.data.id,
            muscle_group_id: muscle_group.id,
            number_of_sets: SETS,
            notes: None,
        })
        .await?;
    expect_status("create workout day set", &set, 201)?;

    let snapshot = fixtures
        .xq_write
        .snapshots
        .create_weekly_snapshot(routine.id)
        .await?;
    expect_status("create weekly snapshot", &snapshot, 201)?;
    expect_eq("snapshot routineId", snapshot.data.routine_id, routine.id)?;

    let report = fixtures
        .xq_read
        .reports
        .get_weekly_progress(routine.id)
        .await?;
    expect_status("get weekly progress", &report, 200)?;
    let report = report.data;
    expect_eq("report routineId", report.routine_id, routine.id)?;
    expect_eq(
        "report weekStartDate",
        &report.week_start_date,
        &snapshot.data.week_start_date,
    )?;

    let total = expect_some(
        "muscle group in report",
        report
            .muscle_groups
            .iter()
            .find(|m| m.muscle_group_id == muscle_group.id),
    )?;
    expect_eq("report totalSets", total.total_sets, SETS)?;

    Ok(())
}
