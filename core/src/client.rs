//! Stateless HTTP request builder and response parser for the OctoFit API.
//!
//! # Design
//! `OctofitClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint has a `build_*` method that produces an
//! `HttpRequest`; each response shape has a `parse_*` method that consumes
//! an `HttpResponse`. Every parse runs the same pipeline: status check,
//! JSON decode, envelope normalization, typed deserialization.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::envelope;
use crate::error::ApiError;
use crate::filters::{ActivityFilter, ChallengeFilter, WorkoutFilter};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QueryParams;
use crate::types::{
    Acknowledgement, Activity, ActivitySummary, Challenge, CreateActivity, CreateTeam,
    LeaderboardEntry, ResourceId, Team, TeamLeaderboardEntry, UpdateProfile, User, UserProfile,
    WorkoutSuggestion,
};

/// Row count requested from the leaderboards when the caller has no
/// preference.
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 10;

/// Synchronous, stateless client for the OctoFit API.
#[derive(Debug, Clone)]
pub struct OctofitClient {
    base_url: String,
}

impl OctofitClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for any endpoint.
    ///
    /// `endpoint` is relative to the base URL and starts with `/`. A body
    /// is attached only when `payload` is given.
    pub fn build_request<P: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: &QueryParams,
        payload: Option<&P>,
    ) -> Result<HttpRequest, ApiError> {
        let body = payload
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: query.append_to(&format!("{}{endpoint}", self.base_url)),
            headers: json_headers(),
            body,
        })
    }

    fn get(&self, endpoint: &str) -> HttpRequest {
        self.get_with(endpoint, &QueryParams::new())
    }

    fn get_with(&self, endpoint: &str, query: &QueryParams) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: query.append_to(&format!("{}{endpoint}", self.base_url)),
            headers: json_headers(),
            body: None,
        }
    }

    fn post_empty(&self, endpoint: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{endpoint}", self.base_url),
            headers: json_headers(),
            body: None,
        }
    }

    fn send_json<P: Serialize>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        payload: &P,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(method, endpoint, &QueryParams::new(), Some(payload))
    }

    // --- users ---

    pub fn build_list_users(&self) -> HttpRequest {
        self.get("/users/")
    }

    pub fn build_get_user(&self, id: &ResourceId) -> HttpRequest {
        self.get(&format!("/users/{id}/"))
    }

    // --- profiles ---

    pub fn build_get_profile(&self, id: &ResourceId) -> HttpRequest {
        self.get(&format!("/profiles/{id}/"))
    }

    pub fn build_get_my_profile(&self) -> HttpRequest {
        self.get("/profiles/me/")
    }

    pub fn build_update_my_profile(&self, input: &UpdateProfile) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Patch, "/profiles/update_me/", input)
    }

    // --- activities ---

    pub fn build_list_activities(&self, filter: &ActivityFilter) -> HttpRequest {
        self.get_with("/activities/", &filter.to_query())
    }

    pub fn build_get_activity(&self, id: &ResourceId) -> HttpRequest {
        self.get(&format!("/activities/{id}/"))
    }

    pub fn build_create_activity(&self, input: &CreateActivity) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Post, "/activities/", input)
    }

    pub fn build_list_my_activities(&self) -> HttpRequest {
        self.get("/activities/my_activities/")
    }

    pub fn build_activity_summary(&self) -> HttpRequest {
        self.get("/activities/summary/")
    }

    // --- teams ---

    pub fn build_list_teams(&self) -> HttpRequest {
        self.get("/teams/")
    }

    pub fn build_get_team(&self, id: &ResourceId) -> HttpRequest {
        self.get(&format!("/teams/{id}/"))
    }

    pub fn build_create_team(&self, input: &CreateTeam) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Post, "/teams/", input)
    }

    pub fn build_join_team(&self, id: &ResourceId) -> HttpRequest {
        self.post_empty(&format!("/teams/{id}/join/"))
    }

    pub fn build_leave_team(&self, id: &ResourceId) -> HttpRequest {
        self.post_empty(&format!("/teams/{id}/leave/"))
    }

    pub fn build_list_my_teams(&self) -> HttpRequest {
        self.get("/teams/my_teams/")
    }

    // --- challenges ---

    pub fn build_list_challenges(&self, filter: &ChallengeFilter) -> HttpRequest {
        self.get_with("/challenges/", &filter.to_query())
    }

    pub fn build_get_challenge(&self, id: &ResourceId) -> HttpRequest {
        self.get(&format!("/challenges/{id}/"))
    }

    pub fn build_join_challenge(&self, id: &ResourceId) -> HttpRequest {
        self.post_empty(&format!("/challenges/{id}/join/"))
    }

    pub fn build_leave_challenge(&self, id: &ResourceId) -> HttpRequest {
        self.post_empty(&format!("/challenges/{id}/leave/"))
    }

    pub fn build_list_my_challenges(&self) -> HttpRequest {
        self.get("/challenges/my_challenges/")
    }

    // --- workouts ---

    pub fn build_list_workouts(&self, filter: &WorkoutFilter) -> HttpRequest {
        self.get_with("/workouts/", &filter.to_query())
    }

    pub fn build_get_workout(&self, id: &ResourceId) -> HttpRequest {
        self.get(&format!("/workouts/{id}/"))
    }

    pub fn build_workouts_for_me(&self) -> HttpRequest {
        self.get("/workouts/for_me/")
    }

    // --- leaderboards ---

    pub fn build_leaderboard(&self, limit: u32) -> HttpRequest {
        let mut query = QueryParams::new();
        query.set("limit", limit);
        self.get_with("/leaderboard/", &query)
    }

    pub fn build_team_leaderboard(&self, limit: u32) -> HttpRequest {
        let mut query = QueryParams::new();
        query.set("limit", limit);
        self.get_with("/team-leaderboard/", &query)
    }

    // --- parsing ---

    /// Decode any response: fail on non-2xx, unwrap a pagination
    /// envelope, then deserialize into `T`.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        let body = decode_body(response)?;
        serde_json::from_value(envelope::normalize(body))
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        self.parse(response)
    }

    pub fn parse_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        self.parse(response)
    }

    pub fn parse_profile(&self, response: HttpResponse) -> Result<UserProfile, ApiError> {
        self.parse(response)
    }

    pub fn parse_activities(&self, response: HttpResponse) -> Result<Vec<Activity>, ApiError> {
        self.parse(response)
    }

    pub fn parse_activity(&self, response: HttpResponse) -> Result<Activity, ApiError> {
        self.parse(response)
    }

    pub fn parse_activity_summary(&self, response: HttpResponse) -> Result<ActivitySummary, ApiError> {
        self.parse(response)
    }

    pub fn parse_teams(&self, response: HttpResponse) -> Result<Vec<Team>, ApiError> {
        self.parse(response)
    }

    pub fn parse_team(&self, response: HttpResponse) -> Result<Team, ApiError> {
        self.parse(response)
    }

    pub fn parse_challenges(&self, response: HttpResponse) -> Result<Vec<Challenge>, ApiError> {
        self.parse(response)
    }

    pub fn parse_challenge(&self, response: HttpResponse) -> Result<Challenge, ApiError> {
        self.parse(response)
    }

    pub fn parse_workouts(&self, response: HttpResponse) -> Result<Vec<WorkoutSuggestion>, ApiError> {
        self.parse(response)
    }

    pub fn parse_workout(&self, response: HttpResponse) -> Result<WorkoutSuggestion, ApiError> {
        self.parse(response)
    }

    pub fn parse_leaderboard(&self, response: HttpResponse) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.parse(response)
    }

    pub fn parse_team_leaderboard(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<TeamLeaderboardEntry>, ApiError> {
        self.parse(response)
    }

    pub fn parse_acknowledgement(&self, response: HttpResponse) -> Result<Acknowledgement, ApiError> {
        self.parse(response)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![
        ("content-type".to_string(), "application/json".to_string()),
        ("accept".to_string(), "application/json".to_string()),
    ]
}

/// Map non-2xx statuses to `RequestFailed` and decode the JSON body.
/// An empty 2xx body decodes as `null`.
fn decode_body(response: HttpResponse) -> Result<Value, ApiError> {
    if !response.is_success() {
        return Err(ApiError::from_failed_response(response.status, &response.body));
    }
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DEFAULT_ERROR_MESSAGE;
    use crate::types::{ActivityType, FitnessLevel};
    use chrono::NaiveDate;

    fn client() -> OctofitClient {
        OctofitClient::new("http://localhost:8000/api")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse::new(200, body)
    }

    #[test]
    fn build_list_users_produces_correct_request() {
        let req = client().build_list_users();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/api/users/");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = OctofitClient::new("http://localhost:8000/api///");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.build_list_teams().path,
            "http://localhost:8000/api/teams/"
        );
    }

    #[test]
    fn id_paths_embed_the_identifier_verbatim() {
        let c = client();
        assert_eq!(
            c.build_get_profile(&ResourceId::from(4)).path,
            "http://localhost:8000/api/profiles/4/"
        );
        assert_eq!(
            c.build_get_challenge(&ResourceId::from("65a1f0c2")).path,
            "http://localhost:8000/api/challenges/65a1f0c2/"
        );
    }

    #[test]
    fn join_and_leave_are_bodiless_posts() {
        let c = client();
        let id = ResourceId::from(2);
        let join = c.build_join_team(&id);
        assert_eq!(join.method, HttpMethod::Post);
        assert_eq!(join.path, "http://localhost:8000/api/teams/2/join/");
        assert!(join.body.is_none());
        let leave = c.build_leave_challenge(&ResourceId::from("c9"));
        assert_eq!(leave.method, HttpMethod::Post);
        assert_eq!(leave.path, "http://localhost:8000/api/challenges/c9/leave/");
        assert!(leave.body.is_none());
    }

    #[test]
    fn build_create_activity_posts_json() {
        let input = CreateActivity {
            activity_type: ActivityType::Running,
            duration: 30,
            distance: Some(5.2),
            calories: None,
            notes: "Morning run".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        let req = client().build_create_activity(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/api/activities/");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["activity_type"], "running");
        assert_eq!(body["date"], "2024-05-01");
        assert!(body.get("calories").is_none());
    }

    #[test]
    fn build_update_my_profile_patches() {
        let input = UpdateProfile {
            fitness_level: Some(FitnessLevel::Intermediate),
            ..Default::default()
        };
        let req = client().build_update_my_profile(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:8000/api/profiles/update_me/");
        assert_eq!(req.body.as_deref(), Some(r#"{"fitness_level":"intermediate"}"#));
    }

    #[test]
    fn leaderboards_carry_limit() {
        let c = client();
        assert_eq!(
            c.build_leaderboard(DEFAULT_LEADERBOARD_LIMIT).path,
            "http://localhost:8000/api/leaderboard/?limit=10"
        );
        assert_eq!(
            c.build_team_leaderboard(20).path,
            "http://localhost:8000/api/team-leaderboard/?limit=20"
        );
    }

    #[test]
    fn filtered_lists_append_query() {
        let c = client();
        assert_eq!(
            c.build_list_challenges(&ChallengeFilter::active()).path,
            "http://localhost:8000/api/challenges/?active=true"
        );
        assert_eq!(
            c.build_list_challenges(&ChallengeFilter::default()).path,
            "http://localhost:8000/api/challenges/"
        );
        let workouts = WorkoutFilter {
            fitness_level: Some(FitnessLevel::Advanced),
            activity_type: Some("running".to_string()),
        };
        assert_eq!(
            c.build_list_workouts(&workouts).path,
            "http://localhost:8000/api/workouts/?activity_type=running&fitness_level=advanced"
        );
    }

    #[test]
    fn build_request_handles_arbitrary_endpoints() {
        let mut query = QueryParams::new();
        query.set("page", 2);
        let req = client()
            .build_request::<Value>(HttpMethod::Get, "/users/", &query, None)
            .unwrap();
        assert_eq!(req.path, "http://localhost:8000/api/users/?page=2");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_unwraps_pagination_envelope() {
        let body = r#"{"count":1,"next":null,"previous":null,"results":[{"id":1,"name":"Team Marvel","member_count":5}]}"#;
        let teams = client().parse_teams(ok(body)).unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Team Marvel");
        assert_eq!(teams[0].member_count, 5);
    }

    #[test]
    fn parse_accepts_plain_list() {
        let body = r#"[{"rank":1,"user_id":3,"username":"thor","total_points":120}]"#;
        let board = client().parse_leaderboard(ok(body)).unwrap();
        assert_eq!(board[0].username, "thor");
        assert_eq!(board[0].user_id, Some(ResourceId::from(3)));
    }

    #[test]
    fn parse_single_object_is_untouched() {
        let body = r#"{"total_activities":2,"total_duration":75,"total_distance":null,"total_points":15,"activity_breakdown":{"running":2}}"#;
        let summary = client().parse_activity_summary(ok(body)).unwrap();
        assert_eq!(summary.total_activities, 2);
        assert_eq!(summary.total_distance, 0.0);
        assert_eq!(summary.activity_breakdown.get("running"), Some(&2));
    }

    #[test]
    fn parse_surfaces_server_message() {
        let response = HttpResponse::new(400, r#"{"message":"Team coach cannot leave the team"}"#);
        let err = client().parse_acknowledgement(response).unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { status: 400, .. }));
        assert_eq!(err.to_string(), "Team coach cannot leave the team");
    }

    #[test]
    fn parse_uses_default_message_without_one() {
        let response = HttpResponse::new(404, r#"{"detail":"Not found."}"#);
        let err = client().parse_team(response).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn parse_bad_json_is_a_deserialization_error() {
        let err = client().parse_users(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_shape_mismatch_is_a_deserialization_error() {
        let err = client().parse_users(ok(r#"{"message":"hi"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn empty_success_body_decodes_as_null() {
        let value: Value = client().parse(HttpResponse::new(204, "")).unwrap();
        assert_eq!(value, Value::Null);
        let ack: Option<Acknowledgement> = client().parse(HttpResponse::new(204, "")).unwrap();
        assert!(ack.is_none());
    }
}
