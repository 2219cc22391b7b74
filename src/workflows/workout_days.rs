//! Add a workout day with sets to a routine and read the plan back

use async_trait::async_trait;

use crate::clients::models::{
    CreateWorkoutDayRequest, CreateWorkoutDaySetRequest, UpdateWorkoutDaySetRequest,
};
use crate::common::Result;
use crate::fixtures::Fixtures;
use crate::testing::expect::{expect_eq, expect_some, expect_status};
use crate::testing::Workflow;

pub struct WorkoutDayWithSets;

#[async_trait]
impl Workflow for WorkoutDayWithSets {
    fn title(&self) -> &str {
        "Add Workout Day With Sets to Routine"
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
        "Test routine for workout day workflow",
    )
    .await?;
    *routine_id = Some(routine.id);

    let muscle_group = super::first_muscle_group(fixtures).await?;

    let day = fixtures
        .xq_write
        .workout_days
        .create_workout_day(&CreateWorkoutDayRequest {
            routine_id: routine.id,
            day_number: 1,
            day_name: "Monday".to_string(),
            notes: Some("Upper body".to_string()),
        })
        .await?;
    expect_status("create workout day", &day, 201)?;
    let day = day.data;
    expect_eq("workout day routineId", day.routine_id, routine.id)?;
    expect_eq("workout day dayNumber", day.day_number, 1)?;

    let set = fixtures
        .xq_write
        .workout_day_sets
        .create_workout_day_set(&CreateWorkoutDaySetRequest {
            workout_day_id: day.id,
            muscle_group_id: muscle_group.id,
            number_of_sets: 3,
            notes: None,
        })
        .await?;
    expect_status("create workout day set", &set, 201)?;
    let set = set.data;
    expect_eq("set workoutDayId", set.workout_day_id, day.id)?;
    expect_eq("set muscleGroupId", set.muscle_group_id, muscle_group.id)?;

    let updated = fixtures
        .xq_write
        .workout_day_sets
        .update_workout_day_set(
            set.id,
            &UpdateWorkoutDaySetRequest {
                number_of_sets: Some(4),
                notes: None,
            },
        )
        .await?;
    expect_status("update workout day set", &updated, 200)?;
    expect_eq("updated numberOfSets", updated.data.number_of_sets, 4)?;

    let days = fixtures
        .xq_read
        .workout_days
        .get_workout_days(routine.id)
        .await?;
    expect_status("list workout days", &days, 200)?;

    let read_day = expect_some(
        "workout day in routine",
        days.data.into_iter().find(|d| d.id == day.id),
    )?;
    expect_eq("read workout day name", read_day.day_name.as_str(), "Monday")?;

    let read_set = expect_some(
        "set in workout day",
        read_day.sets.into_iter().find(|s| s.id == set.id),
    )?;
    expect_eq("read set muscleGroupId", read_set.muscle_group_id, muscle_group.id)?;
    expect_eq("read set numberOfSets", read_set.number_of_sets, 4)?;

    Ok(())
}
