//! Write-service clients

use async_trait::async_trait;

use super::models::{
    CreateRoutineRequest, CreateWorkoutDayRequest, CreateWorkoutDaySetRequest, RoutineResponse,
    SnapshotResponse, UpdateRoutineRequest, UpdateWorkoutDayRequest, UpdateWorkoutDaySetRequest,
    WorkoutDayResponse, WorkoutDaySetResponse,
};
use super::{send_empty, send_json, ApiResponse, ApiResult, Configuration};

/// Path of the write service below the API base URL
pub const SERVICE_PATH: &str = "/xq-fitness-write-service/api/v1";

#[async_trait]
pub trait RoutinesApi: Send + Sync {
    async fn create_routine(
        &self,
        request: &CreateRoutineRequest,
    ) -> ApiResult<ApiResponse<RoutineResponse>>;

    async fn update_routine(
        &self,
        id: i64,
        request: &UpdateRoutineRequest,
    ) -> ApiResult<ApiResponse<RoutineResponse>>;

    async fn delete_routine(&self, id: i64) -> ApiResult<ApiResponse<()>>;
}

#[async_trait]
pub trait WorkoutDaysApi: Send + Sync {
    async fn create_workout_day(
        &self,
        request: &CreateWorkoutDayRequest,
    ) -> ApiResult<ApiResponse<WorkoutDayResponse>>;

    async fn update_workout_day(
        &self,
        id: i64,
        request: &UpdateWorkoutDayRequest,
    ) -> ApiResult<ApiResponse<WorkoutDayResponse>>;

    async fn delete_workout_day(&self, id: i64) -> ApiResult<ApiResponse<()>>;
}

#[async_trait]
pub trait WorkoutDaySetsApi: Send + Sync {
    async fn create_workout_day_set(
        &self,
        request: &CreateWorkoutDaySetRequest,
    ) -> ApiResult<ApiResponse<WorkoutDaySetResponse>>;

    async fn update_workout_day_set(
        &self,
        id: i64,
        request: &UpdateWorkoutDaySetRequest,
    ) -> ApiResult<ApiResponse<WorkoutDaySetResponse>>;

    async fn delete_workout_day_set(&self, id: i64) -> ApiResult<ApiResponse<()>>;
}

#[async_trait]
pub trait SnapshotsApi: Send + Sync {
    /// Freeze the current week of a routine
    async fn create_weekly_snapshot(
        &self,
        routine_id: i64,
    ) -> ApiResult<ApiResponse<SnapshotResponse>>;
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
    async fn create_routine(
        &self,
        request: &CreateRoutineRequest,
    ) -> ApiResult<ApiResponse<RoutineResponse>> {
        send_json(self.config.post("/routines").json(request)).await
    }

    async fn update_routine(
        &self,
        id: i64,
        request: &UpdateRoutineRequest,
    ) -> ApiResult<ApiResponse<RoutineResponse>> {
        send_json(self.config.put(&format!("/routines/{}", id)).json(request)).await
    }

    async fn delete_routine(&self, id: i64) -> ApiResult<ApiResponse<()>> {
        send_empty(self.config.delete(&format!("/routines/{}", id))).await
    }
}

/// HTTP client for `/workout-days`
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
    async fn create_workout_day(
        &self,
        request: &CreateWorkoutDayRequest,
    ) -> ApiResult<ApiResponse<WorkoutDayResponse>> {
        send_json(self.config.post("/workout-days").json(request)).await
    }

    async fn update_workout_day(
        &self,
        id: i64,
        request: &UpdateWorkoutDayRequest,
    ) -> ApiResult<ApiResponse<WorkoutDayResponse>> {
        send_json(self.config.put(&format!("/workout-days/{}", id)).json(request)).await
    }

    async fn delete_workout_day(&self, id: i64) -> ApiResult<ApiResponse<()>> {
        send_empty(self.config.delete(&format!("/workout-days/{}", id))).await
    }
}

/// HTTP client for `/workout-day-sets`
#[derive(Debug, Clone)]
pub struct WorkoutDaySetsClient {
    config: Configuration,
}

impl WorkoutDaySetsClient {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }
}

#[async_trait]
impl WorkoutDaySetsApi for WorkoutDaySetsClient {
    async fn create_workout_day_set(
        &self,
        request: &CreateWorkoutDaySetRequest,
    ) -> ApiResult<ApiResponse<WorkoutDaySetResponse>> {
        send_json(self.config.post("/workout-day-sets").json(request)).await
    }

    async fn update_workout_day_set(
        &self,
        id: i64,
        request: &UpdateWorkoutDaySetRequest,
    ) -> ApiResult<ApiResponse<WorkoutDaySetResponse>> {
        send_json(
            self.config
                .put(&format!("/workout-day-sets/{}", id))
                .json(request),
        )
        .await
    }

    async fn delete_workout_day_set(&self, id: i64) -> ApiResult<ApiResponse<()>> {
        send_empty(self.config.delete(&format!("/workout-day-sets/{}", id))).await
    }
}

/// HTTP client for `/routines/{id}/snapshots`
#[derive(Debug, Clone)]
pub struct SnapshotsClient {
    config: Configuration,
}

impl SnapshotsClient {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SnapshotsApi for SnapshotsClient {
    async fn create_weekly_snapshot(
        &self,
        routine_id: i64,
    ) -> ApiResult<ApiResponse<SnapshotResponse>> {
        send_json(
            self.config
                .post(&format!("/routines/{}/snapshots", routine_id)),
        )
        .await
    }
}
