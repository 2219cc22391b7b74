//! Per-test API client fixtures
//!
//! The runner asks a [`FixtureProvider`] for a fresh [`Fixtures`] before
//! every test attempt and drops it afterwards. Routines a test creates are
//! tracked in [`CreatedRoutines`]; whatever the test did not delete itself
//! is removed by the runner once the attempt ends, including on timeout.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::clients::{read, write, Configuration};
use crate::testing::cleanup;

/// Write-service clients available to a test
#[derive(Clone)]
pub struct WriteClients {
    pub routines: Arc<dyn write::RoutinesApi>,
    pub workout_days: Arc<dyn write::WorkoutDaysApi>,
    pub workout_day_sets: Arc<dyn write::WorkoutDaySetsApi>,
    pub snapshots: Arc<dyn write::SnapshotsApi>,
}

impl WriteClients {
    /// HTTP clients for `<base_url>/xq-fitness-write-service/api/v1`
    pub fn http(base_url: &str) -> Self {
        let config = Configuration::new(service_base_path(base_url, write::SERVICE_PATH));
        Self {
            routines: Arc::new(write::RoutinesClient::new(config.clone())),
            workout_days: Arc::new(write::WorkoutDaysClient::new(config.clone())),
            workout_day_sets: Arc::new(write::WorkoutDaySetsClient::new(config.clone())),
            snapshots: Arc::new(write::SnapshotsClient::new(config)),
        }
    }
}

/// Read-service clients available to a test
#[derive(Clone)]
pub struct ReadClients {
    pub routines: Arc<dyn read::RoutinesApi>,
    pub workout_days: Arc<dyn read::WorkoutDaysApi>,
    pub muscle_groups: Arc<dyn read::MuscleGroupsApi>,
    pub reports: Arc<dyn read::ReportsApi>,
}

impl ReadClients {
    /// HTTP clients for `<base_url>/xq-fitness-read-service/api/v1`
    pub fn http(base_url: &str) -> Self {
        let config = Configuration::new(service_base_path(base_url, read::SERVICE_PATH));
        Self {
            routines: Arc::new(read::RoutinesClient::new(config.clone())),
            workout_days: Arc::new(read::WorkoutDaysClient::new(config.clone())),
            muscle_groups: Arc::new(read::MuscleGroupsClient::new(config.clone())),
            reports: Arc::new(read::ReportsClient::new(config)),
        }
    }
}

/// Routine ids created during one attempt and not yet deleted
#[derive(Debug, Clone, Default)]
pub struct CreatedRoutines(Arc<Mutex<Vec<i64>>>);

impl CreatedRoutines {
    fn ids(&self) -> MutexGuard<'_, Vec<i64>> {
        // The list stays valid even if a holder panicked
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn track(&self, id: i64) {
        self.ids().push(id);
    }

    pub fn untrack(&self, id: i64) {
        self.ids().retain(|tracked| *tracked != id);
    }

    /// Remove and return every tracked id
    pub fn take(&self) -> Vec<i64> {
        std::mem::take(&mut *self.ids())
    }
}

/// The client handle set handed to one test
#[derive(Clone)]
pub struct Fixtures {
    pub xq_write: WriteClients,
    pub xq_read: ReadClients,
    pub created: CreatedRoutines,
}

impl Fixtures {
    pub fn http(base_url: &str) -> Self {
        Self {
            xq_write: WriteClients::http(base_url),
            xq_read: ReadClients::http(base_url),
            created: CreatedRoutines::default(),
        }
    }

    /// Delete every routine still tracked, logging failures
    pub async fn delete_leftovers(&self) {
        for id in self.created.take() {
            tracing::info!(routine = id, "Deleting routine left by an unfinished test");
            cleanup(
                &format!("routine {}", id),
                self.xq_write.routines.delete_routine(id),
            )
            .await;
        }
    }
}

/// Builds the fixtures for one test attempt
pub trait FixtureProvider: Send + Sync {
    fn provide(&self, base_url: &str) -> Fixtures;
}

/// Default provider: `reqwest` clients against the live services
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFixtureProvider;

impl FixtureProvider for HttpFixtureProvider {
    fn provide(&self, base_url: &str) -> Fixtures {
        Fixtures::http(base_url)
    }
}

/// Join the API base URL and a service path, trimming a trailing `/`
pub fn service_base_path(base_url: &str, service_path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), service_path)
}
