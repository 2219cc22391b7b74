//! Request and response payloads of the xq-fitness services
//!
//! Both services speak JSON with camelCase field names.

use serde::{Deserialize, Serialize};

// === Write service ===

/// Body of `POST /routines`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoutineRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

/// Body of `PUT /routines/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoutineRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// A routine as returned by the write service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutineResponse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /workout-days`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutDayRequest {
    pub routine_id: i64,
    pub day_number: i32,
    pub day_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /workout-days/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutDayRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A workout day as returned by the write service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDayResponse {
    pub id: i64,
    pub routine_id: i64,
    pub day_number: i32,
    pub day_name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /workout-day-sets`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutDaySetRequest {
    pub workout_day_id: i64,
    pub muscle_group_id: i64,
    pub number_of_sets: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /workout-day-sets/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutDaySetRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_sets: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A workout day set as returned by the write service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDaySetResponse {
    pub id: i64,
    pub workout_day_id: i64,
    pub muscle_group_id: i64,
    pub number_of_sets: i32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A weekly snapshot of a routine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub id: i64,
    pub routine_id: i64,
    pub week_start_date: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

// === Read service ===

/// Routine list entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Routine with its workout days
///
/// `workoutDays` is required: a payload without it fails to decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutineDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    pub workout_days: Vec<WorkoutDay>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Workout day with its sets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    pub id: i64,
    pub routine_id: i64,
    pub day_number: i32,
    pub day_name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub sets: Vec<WorkoutDaySet>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDaySet {
    pub id: i64,
    pub workout_day_id: i64,
    pub muscle_group_id: i64,
    #[serde(default)]
    pub muscle_group_name: Option<String>,
    pub number_of_sets: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Planned sets per muscle group for one week of a routine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgressReport {
    pub routine_id: i64,
    pub week_start_date: String,
    #[serde(default)]
    pub week_end_date: Option<String>,
    pub muscle_groups: Vec<MuscleGroupTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroupTotal {
    pub muscle_group_id: i64,
    pub muscle_group_name: String,
    pub total_sets: i32,
}
