//! Request-executing facade over `OctofitClient`.
//!
//! `Api` pairs the stateless client with a `Transport` and turns every
//! endpoint into a single call: build, send, parse. There is no retry,
//! caching or deduplication; one method call is one round trip.

use tracing::{debug, warn};

use crate::client::OctofitClient;
use crate::error::ApiError;
use crate::filters::{ActivityFilter, ChallengeFilter, WorkoutFilter};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{
    Acknowledgement, Activity, ActivitySummary, Challenge, CreateActivity, CreateTeam,
    LeaderboardEntry, ResourceId, Team, TeamLeaderboardEntry, UpdateProfile, User, UserProfile,
    WorkoutSuggestion,
};

/// OctoFit API bound to a transport.
#[derive(Debug, Clone)]
pub struct Api<T> {
    client: OctofitClient,
    transport: T,
}

impl<T: Transport> Api<T> {
    pub fn new(client: OctofitClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &OctofitClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` and hand the response to `parse`.
    pub fn execute<R>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&OctofitClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let method = request.method;
        let url = request.path.clone();
        debug!(%method, %url, "API request");

        let outcome = self
            .transport
            .send(request)
            .and_then(|response| {
                debug!(%method, %url, status = response.status, "API response");
                parse(&self.client, response)
            });
        if let Err(err) = &outcome {
            warn!(%method, %url, error = %err, "API request failed");
        }
        outcome
    }

    // --- users ---

    pub fn users(&self) -> Result<Vec<User>, ApiError> {
        self.execute(self.client.build_list_users(), OctofitClient::parse_users)
    }

    pub fn user(&self, id: &ResourceId) -> Result<User, ApiError> {
        self.execute(self.client.build_get_user(id), OctofitClient::parse_user)
    }

    // --- profiles ---

    pub fn profile(&self, id: &ResourceId) -> Result<UserProfile, ApiError> {
        self.execute(self.client.build_get_profile(id), OctofitClient::parse_profile)
    }

    pub fn my_profile(&self) -> Result<UserProfile, ApiError> {
        self.execute(self.client.build_get_my_profile(), OctofitClient::parse_profile)
    }

    pub fn update_my_profile(&self, input: &UpdateProfile) -> Result<UserProfile, ApiError> {
        let request = self.client.build_update_my_profile(input)?;
        self.execute(request, OctofitClient::parse_profile)
    }

    // --- activities ---

    pub fn activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>, ApiError> {
        self.execute(
            self.client.build_list_activities(filter),
            OctofitClient::parse_activities,
        )
    }

    pub fn activity(&self, id: &ResourceId) -> Result<Activity, ApiError> {
        self.execute(self.client.build_get_activity(id), OctofitClient::parse_activity)
    }

    pub fn create_activity(&self, input: &CreateActivity) -> Result<Activity, ApiError> {
        let request = self.client.build_create_activity(input)?;
        self.execute(request, OctofitClient::parse_activity)
    }

    pub fn my_activities(&self) -> Result<Vec<Activity>, ApiError> {
        self.execute(
            self.client.build_list_my_activities(),
            OctofitClient::parse_activities,
        )
    }

    pub fn activity_summary(&self) -> Result<ActivitySummary, ApiError> {
        self.execute(
            self.client.build_activity_summary(),
            OctofitClient::parse_activity_summary,
        )
    }

    // --- teams ---

    pub fn teams(&self) -> Result<Vec<Team>, ApiError> {
        self.execute(self.client.build_list_teams(), OctofitClient::parse_teams)
    }

    pub fn team(&self, id: &ResourceId) -> Result<Team, ApiError> {
        self.execute(self.client.build_get_team(id), OctofitClient::parse_team)
    }

    pub fn create_team(&self, input: &CreateTeam) -> Result<Team, ApiError> {
        let request = self.client.build_create_team(input)?;
        self.execute(request, OctofitClient::parse_team)
    }

    pub fn join_team(&self, id: &ResourceId) -> Result<Team, ApiError> {
        self.execute(self.client.build_join_team(id), OctofitClient::parse_team)
    }

    pub fn leave_team(&self, id: &ResourceId) -> Result<Acknowledgement, ApiError> {
        self.execute(
            self.client.build_leave_team(id),
            OctofitClient::parse_acknowledgement,
        )
    }

    pub fn my_teams(&self) -> Result<Vec<Team>, ApiError> {
        self.execute(self.client.build_list_my_teams(), OctofitClient::parse_teams)
    }

    // --- challenges ---

    pub fn challenges(&self, filter: &ChallengeFilter) -> Result<Vec<Challenge>, ApiError> {
        self.execute(
            self.client.build_list_challenges(filter),
            OctofitClient::parse_challenges,
        )
    }

    pub fn challenge(&self, id: &ResourceId) -> Result<Challenge, ApiError> {
        self.execute(self.client.build_get_challenge(id), OctofitClient::parse_challenge)
    }

    pub fn join_challenge(&self, id: &ResourceId) -> Result<Challenge, ApiError> {
        self.execute(
            self.client.build_join_challenge(id),
            OctofitClient::parse_challenge,
        )
    }

    pub fn leave_challenge(&self, id: &ResourceId) -> Result<Acknowledgement, ApiError> {
        self.execute(
            self.client.build_leave_challenge(id),
            OctofitClient::parse_acknowledgement,
        )
    }

    pub fn my_challenges(&self) -> Result<Vec<Challenge>, ApiError> {
        self.execute(
            self.client.build_list_my_challenges(),
            OctofitClient::parse_challenges,
        )
    }

    // --- workouts ---

    pub fn workouts(&self, filter: &WorkoutFilter) -> Result<Vec<WorkoutSuggestion>, ApiError> {
        self.execute(
            self.client.build_list_workouts(filter),
            OctofitClient::parse_workouts,
        )
    }

    pub fn workout(&self, id: &ResourceId) -> Result<WorkoutSuggestion, ApiError> {
        self.execute(self.client.build_get_workout(id), OctofitClient::parse_workout)
    }

    pub fn workouts_for_me(&self) -> Result<Vec<WorkoutSuggestion>, ApiError> {
        self.execute(
            self.client.build_workouts_for_me(),
            OctofitClient::parse_workouts,
        )
    }

    // --- leaderboards ---

    pub fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.execute(
            self.client.build_leaderboard(limit),
            OctofitClient::parse_leaderboard,
        )
    }

    pub fn team_leaderboard(&self, limit: u32) -> Result<Vec<TeamLeaderboardEntry>, ApiError> {
        self.execute(
            self.client.build_team_leaderboard(limit),
            OctofitClient::parse_team_leaderboard,
        )
    }
}
