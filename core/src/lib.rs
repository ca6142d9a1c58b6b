//! Synchronous API client core for the OctoFit Tracker service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A `Transport`
//! implementation supplied by the caller performs the round trip; the
//! `Api` facade chains build, send and parse for each endpoint.
//!
//! # Design
//! - `OctofitClient` is stateless and holds only `base_url`.
//! - Each endpoint has a `build_*` method; each response shape has a
//!   `parse_*` method. All parses unwrap pagination envelopes, so list
//!   endpoints always yield a plain `Vec`.
//! - Every non-2xx status becomes `ApiError::RequestFailed`, carrying the
//!   server's `message` or a default.
//! - DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod display;
pub mod envelope;
pub mod error;
pub mod filters;
pub mod http;
pub mod query;
pub mod types;

pub use api::Api;
pub use client::{OctofitClient, DEFAULT_LEADERBOARD_LIMIT};
pub use config::ApiConfig;
pub use error::{ApiError, DEFAULT_ERROR_MESSAGE};
pub use filters::{ActivityFilter, ChallengeFilter, WorkoutFilter};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use query::QueryParams;
pub use types::{
    Acknowledgement, Activity, ActivitySummary, ActivityType, Challenge, ChallengeType,
    CreateActivity, CreateTeam, Exercise, FitnessLevel, LeaderboardEntry, ResourceId, Team,
    TeamLeaderboardEntry, UpdateProfile, User, UserProfile, WorkoutSuggestion,
};
