//! Read-service clients

use async_trait::async_trait;

use super::models::{MuscleGroup, Routine, RoutineDetail, WeeklyProgressReport, WorkoutDay};
use super::{send_json, ApiResponse, ApiResult, Configuration};

/// Path of the read service below the API base URL
pub const SERVICE_PATH: &str = "/xq-fitness-read-service/api/v1";

#[async_trait]
pub trait RoutinesApi: Send + Sync {
    /// List routines, optionally only the active ones
    async fn get_routines(&self, active_only: Option<bool>) -> ApiResult<ApiResponse<Vec<Routine>>>;

    async fn get_routine_by_id(&self, id: i64) -> ApiResult<ApiResponse<RoutineDetail>>;
}

#[async_trait]
pub trait WorkoutDaysApi: Send + Sync {
    async fn get_workout_days(&self, routine_id: i64) -> ApiResult<ApiResponse<Vec<WorkoutDay>>>;

    async fn get_workout_day_by_id(&self, id: i64) -> ApiResult<ApiResponse<WorkoutDay>>;
}

#[async_trait]
pub trait MuscleGroupsApi: Send + Sync {
    async fn get_muscle_groups(&self) -> ApiResult<ApiResponse<Vec<MuscleGroup>>>;

    async fn get_muscle_group_by_id(&self, id: i64) -> ApiResult<ApiResponse<MuscleGroup>>;
}

#[async_trait]
pub trait ReportsApi: Send + Sync {
    /// Planned sets per muscle group for the current week of a routine
    async fn get_weekly_progress(
        &self,
        routine_id: i64,
    ) -> ApiResult<ApiResponse<WeeklyProgressReport>>;
}

/// HTTP client for `/routines`
#[derive(Debug, Clone)]
pub struct RoutinesClient {
    config: Configuration,
}

impl RoutinesClient {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RoutinesApi for RoutinesClient {
    async fn get_routines(&self, active_only: Option<bool>) -> ApiResult<ApiResponse<Vec<Routine>>> {
        let mut request = self.config.get("/routines");
        if let Some(active) = active_only {
            request = request.query(&[("activeOnly", active)]);
        }
        send_json(request).await
    }

    async fn get_routine_by_id(&self, id: i64) -> ApiResult<ApiResponse<RoutineDetail>> {
        send_json(self.config.get(&format!("/routines/{}", id))).await
    }
}

/// HTTP client for workout days
#[derive(Debug, Clone)]
pub struct WorkoutDaysClient {
    config: Configuration,
}

impl WorkoutDaysClient {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }
}

#[async_trait]
impl WorkoutDaysApi for WorkoutDaysClient {
    async fn get_workout_days(&self, routine_id: i64) -> ApiResult<ApiResponse<Vec<WorkoutDay>>> {
        send_json(
            self.config
                .get(&format!("/routines/{}/workout-days", routine_id)),
        )
        .await
    }

    async fn get_workout_day_by_id(&self, id: i64) -> ApiResult<ApiResponse<WorkoutDay>> {
        send_json(self.config.get(&format!("/workout-days/{}", id))).await
    }
}

/// HTTP client for `/muscle-groups`
#[derive(Debug, Clone)]
pub struct MuscleGroupsClient {
    config: Configuration,
}

impl MuscleGroupsClient {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MuscleGroupsApi for MuscleGroupsClient {
    async fn get_muscle_groups(&self) -> ApiResult<ApiResponse<Vec<MuscleGroup>>> {
        send_json(self.config.get("/muscle-groups")).await
    }

    async fn get_muscle_group_by_id(&self, id: i64) -> ApiResult<ApiResponse<MuscleGroup>> {
        send_json(self.config.get(&format!("/muscle-groups/{}", id))).await
    }
}

/// HTTP client for `/reports`
#[derive(Debug, Clone)]
pub struct ReportsClient {
    config: Configuration,
}

impl ReportsClient {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ReportsApi for ReportsClient {
    async fn get_weekly_progress(
        &self,
        routine_id: i64,
    ) -> ApiResult<ApiResponse<WeeklyProgressReport>> {
        send_json(
            self.config
                .get("/reports/weekly-progress")
                .query(&[("routineId", routine_id)]),
        )
        .await
    }
}
