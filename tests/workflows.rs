//! Workflow tests against an in-process fake of the xq-fitness services
//!
//! A single wiremock responder keeps routines, workout days and sets in
//! memory and serves both the write and the read service paths.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use xq_keeper::clients::models::CreateRoutineRequest;
use xq_keeper::clients::ApiError;
use xq_keeper::fixtures::{Fixtures, HttpFixtureProvider};
use xq_keeper::testing::{
    run_suite, AttemptStatus, JsonReporter, Reporter, RunSettings, Workflow,
};
use xq_keeper::workflows::{self, CreateAndGetRoutine, WeeklySnapshotReport, WorkoutDayWithSets};
use xq_keeper::Error;

const WRITE: &str = "/xq-fitness-write-service/api/v1";
const READ: &str = "/xq-fitness-read-service/api/v1";
const WEEK_START: &str = "2026-10-12";

#[derive(Default)]
struct Faults {
    create_routine: Option<u16>,
    delete_routine: Option<u16>,
    get_routine: Option<u16>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    routines: BTreeMap<i64, Value>,
    days: BTreeMap<i64, Value>,
    sets: BTreeMap<i64, Value>,
    delete_calls: usize,
    faults: Faults,
}

impl State {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn day_with_sets(&self, day: &Value) -> Value {
        let mut day = day.clone();
        let sets: Vec<Value> = self
            .sets
            .values()
            .filter(|s| s["workoutDayId"] == day["id"])
            .cloned()
            .collect();
        day["sets"] = Value::Array(sets);
        day
    }

    fn days_of(&self, routine_id: i64) -> Vec<Value> {
        self.days
            .values()
            .filter(|d| d["routineId"] == json!(routine_id))
            .map(|d| self.day_with_sets(d))
            .collect()
    }
}

#[derive(Clone, Default)]
struct FakeServices {
    state: Arc<Mutex<State>>,
}

fn ok(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

fn error(status: u16) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_string("fake failure")
}

fn not_found() -> ResponseTemplate {
    error(404)
}

impl Respond for FakeServices {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let method = request.method.to_string();
        let path = request.url.path().to_string();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);

        if let Some(rest) = path.strip_prefix(WRITE) {
            let segments: Vec<&str> = rest.trim_matches('/').split('/').collect();
            return match (method.as_str(), segments.as_slice()) {
                ("POST", ["routines"]) => {
                    if let Some(status) = state.faults.create_routine {
                        return error(status);
                    }
                    let id = state.id();
                    let routine = json!({
                        "id": id,
                        "name": body["name"],
                        "description": body["description"],
                        "isActive": body["isActive"],
                        "createdAt": "2026-10-14T10:00:00Z",
                        "updatedAt": "2026-10-14T10:00:00Z",
                    });
                    state.routines.insert(id, routine.clone());
                    ok(201, routine)
                }
                ("DELETE", ["routines", id]) => {
                    state.delete_calls += 1;
                    if let Some(status) = state.faults.delete_routine {
                        return error(status);
                    }
                    let id: i64 = id.parse().unwrap_or_default();
                    match state.routines.remove(&id) {
                        Some(_) => {
                            state.days.retain(|_, d| d["routineId"] != json!(id));
                            ResponseTemplate::new(204)
                        }
                        None => not_found(),
                    }
                }
                ("POST", ["workout-days"]) => {
                    let routine_id = body["routineId"].as_i64().unwrap_or_default();
                    if !state.routines.contains_key(&routine_id) {
                        return not_found();
                    }
                    let id = state.id();
                    let day = json!({
                        "id": id,
                        "routineId": routine_id,
                        "dayNumber": body["dayNumber"],
                        "dayName": body["dayName"],
                        "notes": body["notes"],
                    });
                    state.days.insert(id, day.clone());
                    ok(201, day)
                }
                ("POST", ["workout-day-sets"]) => {
                    let day_id = body["workoutDayId"].as_i64().unwrap_or_default();
                    if !state.days.contains_key(&day_id) {
                        return not_found();
                    }
                    let id = state.id();
                    let set = json!({
                        "id": id,
                        "workoutDayId": day_id,
                        "muscleGroupId": body["muscleGroupId"],
                        "muscleGroupName": "Chest",
                        "numberOfSets": body["numberOfSets"],
                        "notes": body["notes"],
                    });
                    state.sets.insert(id, set.clone());
                    ok(201, set)
                }
                ("PUT", ["workout-day-sets", id]) => {
                    let id: i64 = id.parse().unwrap_or_default();
                    match state.sets.get_mut(&id) {
                        Some(set) => {
                            if !body["numberOfSets"].is_null() {
                                set["numberOfSets"] = body["numberOfSets"].clone();
                            }
                            ok(200, set.clone())
                        }
                        None => not_found(),
                    }
                }
                ("POST", ["routines", id, "snapshots"]) => {
                    let routine_id: i64 = id.parse().unwrap_or_default();
                    if !state.routines.contains_key(&routine_id) {
                        return not_found();
                    }
                    let id = state.id();
                    ok(
                        201,
                        json!({
                            "id": id,
                            "routineId": routine_id,
                            "weekStartDate": WEEK_START,
                        }),
                    )
                }
                _ => not_found(),
            };
        }

        if let Some(rest) = path.strip_prefix(READ) {
            let segments: Vec<&str> = rest.trim_matches('/').split('/').collect();
            return match (method.as_str(), segments.as_slice()) {
                ("GET", ["muscle-groups"]) => ok(
                    200,
                    json!([
                        { "id": 1, "name": "Chest", "description": "Pectorals" },
                        { "id": 2, "name": "Back" }
                    ]),
                ),
                ("GET", ["routines", id]) => {
                    if let Some(status) = state.faults.get_routine {
                        return error(status);
                    }
                    let id: i64 = id.parse().unwrap_or_default();
                    match state.routines.get(&id) {
                        Some(routine) => {
                            let mut detail = routine.clone();
                            detail["workoutDays"] = Value::Array(state.days_of(id));
                            ok(200, detail)
                        }
                        None => not_found(),
                    }
                }
                ("GET", ["routines", id, "workout-days"]) => {
                    let id: i64 = id.parse().unwrap_or_default();
                    if !state.routines.contains_key(&id) {
                        return not_found();
                    }
                    ok(200, Value::Array(state.days_of(id)))
                }
                ("GET", ["reports", "weekly-progress"]) => {
                    let routine_id = request
                        .url
                        .query_pairs()
                        .find(|(k, _)| k == "routineId")
                        .and_then(|(_, v)| v.parse::<i64>().ok())
                        .unwrap_or_default();
                    if !state.routines.contains_key(&routine_id) {
                        return not_found();
                    }
                    let mut totals: BTreeMap<i64, i64> = BTreeMap::new();
                    for day in state.days_of(routine_id) {
                        for set in day["sets"].as_array().into_iter().flatten() {
                            let group = set["muscleGroupId"].as_i64().unwrap_or_default();
                            *totals.entry(group).or_default() +=
                                set["numberOfSets"].as_i64().unwrap_or_default();
                        }
                    }
                    let groups: Vec<Value> = totals
                        .into_iter()
                        .map(|(id, total)| {
                            json!({
                                "muscleGroupId": id,
                                "muscleGroupName": "Chest",
                                "totalSets": total,
                            })
                        })
                        .collect();
                    ok(
                        200,
                        json!({
                            "routineId": routine_id,
                            "weekStartDate": WEEK_START,
                            "weekEndDate": "2026-10-18",
                            "muscleGroups": groups,
                        }),
                    )
                }
                _ => not_found(),
            };
        }

        not_found()
    }
}

async fn start(faults: Faults) -> (MockServer, FakeServices) {
    let server = MockServer::start().await;
    let fake = FakeServices::default();
    fake.state.lock().unwrap().faults = faults;
    Mock::given(any())
        .respond_with(fake.clone())
        .mount(&server)
        .await;
    (server, fake)
}

fn remaining_routines(fake: &FakeServices) -> usize {
    fake.state.lock().unwrap().routines.len()
}

fn delete_calls(fake: &FakeServices) -> usize {
    fake.state.lock().unwrap().delete_calls
}

#[tokio::test]
async fn test_create_and_get_routine_passes_and_cleans_up() {
    let (server, fake) = start(Faults::default()).await;
    let fixtures = Fixtures::http(&server.uri());

    CreateAndGetRoutine.run(&fixtures).await.unwrap();

    assert_eq!(delete_calls(&fake), 1);
    assert_eq!(remaining_routines(&fake), 0);
}

#[tokio::test]
async fn test_workout_day_with_sets_passes_and_cleans_up() {
    let (server, fake) = start(Faults::default()).await;
    let fixtures = Fixtures::http(&server.uri());

    WorkoutDayWithSets.run(&fixtures).await.unwrap();

    assert_eq!(delete_calls(&fake), 1);
    assert_eq!(remaining_routines(&fake), 0);
}

#[tokio::test]
async fn test_weekly_snapshot_report_passes_and_cleans_up() {
    let (server, fake) = start(Faults::default()).await;
    let fixtures = Fixtures::http(&server.uri());

    WeeklySnapshotReport.run(&fixtures).await.unwrap();

    assert_eq!(delete_calls(&fake), 1);
    assert_eq!(remaining_routines(&fake), 0);
}

#[tokio::test]
async fn test_failed_cleanup_does_not_fail_workflow() {
    let (server, fake) = start(Faults {
        delete_routine: Some(500),
        ..Faults::default()
    })
    .await;
    let fixtures = Fixtures::http(&server.uri());

    CreateAndGetRoutine.run(&fixtures).await.unwrap();

    assert_eq!(delete_calls(&fake), 1);
    assert_eq!(remaining_routines(&fake), 1);
}

#[tokio::test]
async fn test_create_error_fails_without_cleanup() {
    let (server, fake) = start(Faults {
        create_routine: Some(500),
        ..Faults::default()
    })
    .await;
    let fixtures = Fixtures::http(&server.uri());

    let err = CreateAndGetRoutine.run(&fixtures).await.unwrap_err();

    match err {
        Error::Api(ApiError::Response { status, ref body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "fake failure");
        }
        other => panic!("Expected API error, got {:?}", other),
    }
    assert_eq!(delete_calls(&fake), 0);
}

#[tokio::test]
async fn test_read_error_still_cleans_up() {
    let (server, fake) = start(Faults {
        get_routine: Some(503),
        ..Faults::default()
    })
    .await;
    let fixtures = Fixtures::http(&server.uri());

    let err = CreateAndGetRoutine.run(&fixtures).await.unwrap_err();

    assert_eq!(err.api_response().map(|(s, _)| s), Some(503));
    assert_eq!(delete_calls(&fake), 1);
    assert_eq!(remaining_routines(&fake), 0);
}

#[tokio::test]
async fn test_suite_run_writes_json_report() {
    let (server, fake) = start(Faults::default()).await;
    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("reports").join("test-results.json");

    let all = workflows::all();
    let tests: Vec<&dyn Workflow> = all.iter().map(|w| w.as_ref()).collect();
    let settings = RunSettings::new("api-tests", server.uri());
    let mut reporters: Vec<Box<dyn Reporter>> =
        vec![Box::new(JsonReporter::new(report_path.clone()))];

    let suite = run_suite(&tests, &HttpFixtureProvider, &settings, &mut reporters)
        .await
        .unwrap();

    assert!(suite.passed());
    assert_eq!(suite.exit_code(), 0);
    assert_eq!(suite.stats.expected, 3);
    assert_eq!(remaining_routines(&fake), 0);

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["stats"]["expected"], 3);
    assert_eq!(report["stats"]["unexpected"], 0);
    assert_eq!(report["config"]["project"], "api-tests");
    assert_eq!(report["tests"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_suite_run_reports_failures() {
    let (server, _fake) = start(Faults {
        create_routine: Some(500),
        ..Faults::default()
    })
    .await;

    let all = workflows::all();
    let tests: Vec<&dyn Workflow> = all.iter().map(|w| w.as_ref()).collect();
    let mut settings = RunSettings::new("api-tests", server.uri());
    settings.retries = 1;
    let mut reporters: Vec<Box<dyn Reporter>> = Vec::new();

    let suite = run_suite(&tests, &HttpFixtureProvider, &settings, &mut reporters)
        .await
        .unwrap();

    assert!(!suite.passed());
    assert_eq!(suite.exit_code(), 1);
    assert_eq!(suite.stats.unexpected, 3);
    assert!(suite.tests.iter().all(|t| t.attempts.len() == 2));
    assert!(suite.tests[0]
        .error()
        .is_some_and(|e| e.contains("API Error: 500")));
}

/// Creates a routine, then hangs past any timeout
struct Stalls;

#[async_trait]
impl Workflow for Stalls {
    fn title(&self) -> &str {
        "Stalls after creating a routine"
    }

    async fn run(&self, fixtures: &Fixtures) -> xq_keeper::Result<()> {
        let created = fixtures
            .xq_write
            .routines
            .create_routine(&CreateRoutineRequest {
                name: "Stalled Routine".to_string(),
                description: None,
                is_active: true,
            })
            .await?;
        fixtures.created.track(created.data.id);
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
}

#[tokio::test]
async fn test_timed_out_test_still_deletes_its_routine() {
    let (server, fake) = start(Faults::default()).await;

    let tests: Vec<&dyn Workflow> = vec![&Stalls];
    let mut settings = RunSettings::new("api-tests", server.uri());
    settings.timeout = Duration::from_millis(500);
    let mut reporters: Vec<Box<dyn Reporter>> = Vec::new();

    let suite = run_suite(&tests, &HttpFixtureProvider, &settings, &mut reporters)
        .await
        .unwrap();

    assert_eq!(suite.tests[0].status, AttemptStatus::TimedOut);
    assert_eq!(suite.exit_code(), 1);
    assert_eq!(delete_calls(&fake), 1);
    assert_eq!(remaining_routines(&fake), 0);
}
