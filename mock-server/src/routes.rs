//! HTTP handlers. Paths keep the backend's trailing slashes.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};

use crate::error::{AppError, Result};
use crate::render;
use crate::store::{ActivityQuery, NewActivity, NewTeam, ProfilePatch};
use crate::Db;

type Params = Query<HashMap<String, String>>;

/// Non-empty query parameter. An empty value means "not filtered".
fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

fn page(params: &HashMap<String, String>) -> Result<usize> {
    match param(params, "page") {
        None => Ok(1),
        Some(raw) => raw.parse().map_err(|_| AppError::NotFound),
    }
}

fn paginated(path: &str, items: Vec<Value>, params: &HashMap<String, String>) -> Result<Json<Value>> {
    render::paginate(path, items, page(params)?)
        .map(Json)
        .ok_or(AppError::NotFound)
}

fn limit(params: &HashMap<String, String>) -> Result<usize> {
    match param(params, "limit") {
        None => Ok(10),
        Some(raw) => raw.parse().map_err(|_| {
            AppError::BadRequest("limit must be a non-negative integer".to_string())
        }),
    }
}

fn date_param(params: &HashMap<String, String>, key: &str) -> Result<Option<NaiveDate>> {
    param(params, key)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("Invalid {key}: {raw}")))
        })
        .transpose()
}

pub async fn api_root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to OctoFit Tracker API",
        "endpoints": {
            "users": "/api/users/",
            "profiles": "/api/profiles/",
            "activities": "/api/activities/",
            "teams": "/api/teams/",
            "challenges": "/api/challenges/",
            "workouts": "/api/workouts/",
            "leaderboard": "/api/leaderboard/",
        }
    }))
}

// --- users ---

pub async fn list_users(State(db): State<Db>, Query(params): Params) -> Result<Json<Value>> {
    let store = db.read().await;
    let users = store.users.iter().map(|u| render::user(&store, u)).collect();
    paginated("/api/users/", users, &params)
}

pub async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>> {
    let store = db.read().await;
    Ok(Json(render::user(&store, store.user(id)?)))
}

// --- profiles ---

pub async fn my_profile(State(db): State<Db>) -> Json<Value> {
    let mut store = db.write().await;
    let profile = store.my_profile().clone();
    Json(render::profile(&store, &profile))
}

pub async fn update_my_profile(
    State(db): State<Db>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<Value>> {
    let mut store = db.write().await;
    let profile = store.update_profile(patch)?.clone();
    tracing::info!(user_id = profile.user_id, "Profile updated");
    Ok(Json(render::profile(&store, &profile)))
}

pub async fn get_profile(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>> {
    let store = db.read().await;
    Ok(Json(render::profile(&store, store.find_profile(&id)?)))
}

// --- activities ---

pub async fn list_activities(State(db): State<Db>, Query(params): Params) -> Result<Json<Value>> {
    let query = ActivityQuery {
        user: param(&params, "user")
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid user: {raw}")))
            })
            .transpose()?,
        activity_type: param(&params, "type").map(str::to_string),
        start_date: date_param(&params, "start_date")?,
        end_date: date_param(&params, "end_date")?,
    };
    let store = db.read().await;
    let activities = store
        .list_activities(&query)
        .into_iter()
        .map(|a| render::activity(&store, a))
        .collect();
    paginated("/api/activities/", activities, &params)
}

pub async fn create_activity(
    State(db): State<Db>,
    Json(input): Json<NewActivity>,
) -> Result<(StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    let user = store.current_user;
    let activity = store.log_activity(user, input)?.clone();
    tracing::info!(
        user_id = user,
        activity_type = %activity.activity_type,
        points = activity.points_earned,
        "Activity logged"
    );
    Ok((StatusCode::CREATED, Json(render::activity(&store, &activity))))
}

pub async fn my_activities(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let activities: Vec<Value> = store
        .activities_of(store.current_user)
        .into_iter()
        .map(|a| render::activity(&store, a))
        .collect();
    Json(Value::Array(activities))
}

pub async fn activity_summary(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    Json(render::summary(&store.summary()))
}

pub async fn get_activity(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>> {
    let store = db.read().await;
    Ok(Json(render::activity(&store, store.activity(&id)?)))
}

// --- teams ---

pub async fn list_teams(State(db): State<Db>, Query(params): Params) -> Result<Json<Value>> {
    let store = db.read().await;
    let teams = store
        .teams_by_points()
        .into_iter()
        .map(|t| render::team(&store, t))
        .collect();
    paginated("/api/teams/", teams, &params)
}

pub async fn create_team(
    State(db): State<Db>,
    Json(input): Json<NewTeam>,
) -> Result<(StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    let coach = store.current_user;
    let team = store.create_team(coach, input)?.clone();
    tracing::info!(team_id = team.id, name = %team.name, "Team created");
    Ok((StatusCode::CREATED, Json(render::team(&store, &team))))
}

pub async fn my_teams(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let me = store.current_user;
    let teams: Vec<Value> = store
        .teams_by_points()
        .into_iter()
        .filter(|t| t.members.contains(&me))
        .map(|t| render::team(&store, t))
        .collect();
    Json(Value::Array(teams))
}

pub async fn get_team(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>> {
    let store = db.read().await;
    Ok(Json(render::team(&store, store.team(id)?)))
}

pub async fn join_team(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>> {
    let mut store = db.write().await;
    let team = store.join_team(id)?.clone();
    tracing::info!(team_id = id, "Joined team");
    Ok(Json(render::team(&store, &team)))
}

pub async fn leave_team(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>> {
    let message = db.write().await.leave_team(id)?;
    tracing::info!(team_id = id, "Left team");
    Ok(Json(json!({ "message": message })))
}

// --- challenges ---

pub async fn list_challenges(State(db): State<Db>, Query(params): Params) -> Result<Json<Value>> {
    let now = Utc::now();
    let active_at = (param(&params, "active") == Some("true")).then_some(now);
    let store = db.read().await;
    let challenges = store
        .list_challenges(active_at)
        .into_iter()
        .map(|c| render::challenge(c, now))
        .collect();
    paginated("/api/challenges/", challenges, &params)
}

pub async fn my_challenges(State(db): State<Db>) -> Json<Value> {
    let now = Utc::now();
    let store = db.read().await;
    let me = store.current_user;
    let challenges: Vec<Value> = store
        .list_challenges(None)
        .into_iter()
        .filter(|c| c.participants.contains(&me))
        .map(|c| render::challenge(c, now))
        .collect();
    Json(Value::Array(challenges))
}

pub async fn get_challenge(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>> {
    let store = db.read().await;
    Ok(Json(render::challenge(store.challenge(&id)?, Utc::now())))
}

pub async fn join_challenge(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>> {
    let mut store = db.write().await;
    let challenge = store.join_challenge(&id)?;
    tracing::info!(challenge_id = %id, "Joined challenge");
    Ok(Json(render::challenge(challenge, Utc::now())))
}

pub async fn leave_challenge(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>> {
    let message = db.write().await.leave_challenge(&id)?;
    tracing::info!(challenge_id = %id, "Left challenge");
    Ok(Json(json!({ "message": message })))
}

// --- workouts ---

pub async fn list_workouts(State(db): State<Db>, Query(params): Params) -> Result<Json<Value>> {
    let store = db.read().await;
    let workouts = store
        .list_workouts(param(&params, "fitness_level"), param(&params, "activity_type"))
        .into_iter()
        .map(render::workout)
        .collect();
    paginated("/api/workouts/", workouts, &params)
}

pub async fn workouts_for_me(State(db): State<Db>) -> Result<Json<Value>> {
    let store = db.read().await;
    let level = store
        .profile_of(store.current_user)
        .map_err(|_| AppError::BadRequest("Please complete your profile first".to_string()))?
        .fitness_level
        .clone();
    let workouts: Vec<Value> = store
        .list_workouts(Some(level.as_str()), None)
        .into_iter()
        .map(render::workout)
        .collect();
    Ok(Json(Value::Array(workouts)))
}

pub async fn get_workout(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>> {
    let store = db.read().await;
    Ok(Json(render::workout(store.workout(&id)?)))
}

// --- leaderboards ---

pub async fn leaderboard(State(db): State<Db>, Query(params): Params) -> Result<Json<Value>> {
    let limit = limit(&params)?;
    let store = db.read().await;
    let rows: Vec<Value> = store.leaderboard(limit).iter().map(render::leader).collect();
    Ok(Json(Value::Array(rows)))
}

pub async fn team_leaderboard(State(db): State<Db>, Query(params): Params) -> Result<Json<Value>> {
    let limit = limit(&params)?;
    let store = db.read().await;
    let rows: Vec<Value> = store
        .teams_by_points()
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, team)| render::team_leader(index + 1, team))
        .collect();
    Ok(Json(Value::Array(rows)))
}
