//! In-memory stand-in for the OctoFit backend.
//!
//! Serves the same routes, envelopes and error bodies as the real API so the
//! client can be exercised end to end without a database.

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};

pub mod error;
pub mod render;
mod routes;
pub mod seed;
pub mod store;

pub use store::Store;

pub type Db = Arc<RwLock<Store>>;

/// Router over an empty store with only the signed-in user.
pub fn app() -> Router {
    app_with(Store::new())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/", get(routes::api_root))
        .route("/api/users/", get(routes::list_users))
        .route("/api/users/{id}/", get(routes::get_user))
        .route("/api/profiles/me/", get(routes::my_profile))
        .route("/api/profiles/update_me/", patch(routes::update_my_profile))
        .route("/api/profiles/{id}/", get(routes::get_profile))
        .route(
            "/api/activities/",
            get(routes::list_activities).post(routes::create_activity),
        )
        .route("/api/activities/my_activities/", get(routes::my_activities))
        .route("/api/activities/summary/", get(routes::activity_summary))
        .route("/api/activities/{id}/", get(routes::get_activity))
        .route("/api/teams/", get(routes::list_teams).post(routes::create_team))
        .route("/api/teams/my_teams/", get(routes::my_teams))
        .route("/api/teams/{id}/", get(routes::get_team))
        .route("/api/teams/{id}/join/", post(routes::join_team))
        .route("/api/teams/{id}/leave/", post(routes::leave_team))
        .route("/api/challenges/", get(routes::list_challenges))
        .route("/api/challenges/my_challenges/", get(routes::my_challenges))
        .route("/api/challenges/{id}/", get(routes::get_challenge))
        .route("/api/challenges/{id}/join/", post(routes::join_challenge))
        .route("/api/challenges/{id}/leave/", post(routes::leave_challenge))
        .route("/api/workouts/", get(routes::list_workouts))
        .route("/api/workouts/for_me/", get(routes::workouts_for_me))
        .route("/api/workouts/{id}/", get(routes::get_workout))
        .route("/api/leaderboard/", get(routes::leaderboard))
        .route("/api/team-leaderboard/", get(routes::team_leaderboard))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Store::new()).await
}

pub async fn run_with(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(store)).await
}
