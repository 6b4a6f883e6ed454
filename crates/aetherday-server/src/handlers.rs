//! Route handlers.

use aetherday_core::energy::parse_clock;
use aetherday_core::service::{self, BalanceReport, RegenReport};
use aetherday_core::{
    ChallengeRefresh, NewScheduledTask, PodSettlement, Profile, RetiredTask, RewardClaim,
    ScheduledTask, SinkSnapshot, SinkTask, TaskCompletion,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{auth::AuthUser, extract, ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// === Profile ===

pub async fn get_profile(State(state): State<AppState>, user: AuthUser) -> Result<Json<Profile>, ApiError> {
    let profile = state.with_db(|db| db.ensure_profile(user.id(), Utc::now()))?;
    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct WorkdayRequest {
    pub start: Option<String>,
    pub end: Option<String>,
}

pub async fn set_workday(
    State(state): State<AppState>,
    user: AuthUser,
    extract::Json(req): extract::Json<WorkdayRequest>,
) -> Result<Json<Profile>, ApiError> {
    for value in [&req.start, &req.end].into_iter().flatten() {
        if parse_clock(value).is_none() {
            return Err(ApiError::BadRequest(format!("'{value}' is not a HH:MM time")));
        }
    }
    let now = Utc::now();
    let profile = state.with_db(|db| {
        db.ensure_profile(user.id(), now)?;
        db.set_workday_window(user.id(), req.start.as_deref(), req.end.as_deref(), now)?;
        db.profile(user.id())
    })?;
    Ok(Json(profile))
}

// === Energy ===

pub async fn regen_all(State(state): State<AppState>, user: AuthUser) -> Result<Json<RegenReport>, ApiError> {
    user.require_role(&state.service_role)?;
    let report = state.with_db(|db| service::run_regen_batch(db, Utc::now(), &state.rates))?;
    Ok(Json(report))
}

pub async fn regen_me(State(state): State<AppState>, user: AuthUser) -> Result<Json<Profile>, ApiError> {
    let profile = state.with_db(|db| service::regen_user(db, user.id(), Utc::now(), &state.rates))?;
    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodExitRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

pub async fn pod_exit(
    State(state): State<AppState>,
    user: AuthUser,
    extract::Json(req): extract::Json<PodExitRequest>,
) -> Result<Json<PodSettlement>, ApiError> {
    let (_, settlement) = state.with_db(|db| {
        service::settle_pod_exit(db, user.id(), req.start_time, req.end_time, Utc::now(), &state.rates)
    })?;
    Ok(Json(settlement))
}

// === Daily challenge ===

pub async fn refresh_challenge(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ChallengeRefresh>, ApiError> {
    let (_, refresh) = state.with_db(|db| service::refresh_daily_challenge(db, user.id(), Utc::now()))?;
    Ok(Json(refresh))
}

pub async fn claim_reward(State(state): State<AppState>, user: AuthUser) -> Result<Json<RewardClaim>, ApiError> {
    let (_, claim) = state.with_db(|db| service::claim_daily_reward(db, user.id(), Utc::now()))?;
    Ok(Json(claim))
}

// === Tasks ===

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<NaiveDate>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    extract::Query(query): extract::Query<DayQuery>,
) -> Result<Json<Vec<ScheduledTask>>, ApiError> {
    let day = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let tasks = state.with_db(|db| db.tasks_on(user.id(), day))?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    extract::Json(req): extract::Json<NewScheduledTask>,
) -> Result<(StatusCode, Json<ScheduledTask>), ApiError> {
    let task = state.with_db(|db| service::create_task(db, user.id(), req, Utc::now()))?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn complete_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> Result<Json<TaskCompletion>, ApiError> {
    let (_, completion) = state.with_db(|db| service::complete_task(db, user.id(), &task_id, Utc::now()))?;
    Ok(Json(completion))
}

pub async fn sink_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> Result<Json<SinkTask>, ApiError> {
    let sunk = state.with_db(|db| service::send_to_sink(db, user.id(), &task_id, Utc::now()))?;
    Ok(Json(sunk))
}

pub async fn retire_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> Result<Json<RetiredTask>, ApiError> {
    let retired = state.with_db(|db| service::retire_task(db, user.id(), &task_id, Utc::now()))?;
    Ok(Json(retired))
}

pub async fn list_retired(State(state): State<AppState>, user: AuthUser) -> Result<Json<Vec<RetiredTask>>, ApiError> {
    let retired = state.with_db(|db| db.retired(user.id()))?;
    Ok(Json(retired))
}

// === Aether Sink ===

pub async fn list_sink(State(state): State<AppState>, user: AuthUser) -> Result<Json<Vec<SinkTask>>, ApiError> {
    let sink = state.with_db(|db| db.sink(user.id()))?;
    Ok(Json(sink))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSinkRequest {
    pub start_time: DateTime<Utc>,
}

pub async fn schedule_sink_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(sink_id): Path<String>,
    extract::Json(req): extract::Json<ScheduleSinkRequest>,
) -> Result<(StatusCode, Json<ScheduledTask>), ApiError> {
    let task =
        state.with_db(|db| service::schedule_from_sink(db, user.id(), &sink_id, req.start_time, Utc::now()))?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn restore_sink(State(state): State<AppState>, user: AuthUser) -> Result<Json<SinkSnapshot>, ApiError> {
    let snapshot = state.with_db(|db| service::restore_sink_snapshot(db, user.id()))?;
    Ok(Json(snapshot))
}

pub async fn auto_balance(
    State(state): State<AppState>,
    user: AuthUser,
    extract::Query(query): extract::Query<DayQuery>,
) -> Result<Json<BalanceReport>, ApiError> {
    let now = Utc::now();
    let day = query.date.unwrap_or_else(|| now.date_naive());
    let report = state.with_db(|db| service::auto_balance_day(db, user.id(), day, now))?;
    Ok(Json(report))
}
