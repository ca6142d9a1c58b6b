//! In-memory backend state and the rules the real service enforces.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;

pub const ACTIVITY_TYPES: [&str; 8] = [
    "running",
    "walking",
    "cycling",
    "swimming",
    "strength_training",
    "yoga",
    "sports",
    "other",
];

pub const FITNESS_LEVELS: [&str; 3] = ["beginner", "intermediate", "advanced"];

/// Points per started ten minutes of activity.
pub fn points_multiplier(activity_type: &str) -> i64 {
    match activity_type {
        "running" | "swimming" => 3,
        "cycling" | "strength_training" | "sports" => 2,
        _ => 1,
    }
}

pub fn points_for(activity_type: &str, duration: i64) -> i64 {
    (duration / 10) * points_multiplier(activity_type)
}

/// 24 hex characters, the shape of a Mongo ObjectId.
pub fn new_object_id() -> String {
    Uuid::new_v4().simple().to_string()[..24].to_string()
}

#[derive(Clone, Debug)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug)]
pub struct ProfileRecord {
    pub object_id: String,
    pub user_id: u64,
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub fitness_level: String,
    pub total_points: i64,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    fn blank(user_id: u64, fitness_level: &str) -> Self {
        let now = Utc::now();
        Self {
            object_id: new_object_id(),
            user_id,
            age: None,
            height: None,
            weight: None,
            fitness_level: fitness_level.to_string(),
            total_points: 0,
            bio: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ActivityRecord {
    pub object_id: String,
    pub user_id: u64,
    pub activity_type: String,
    pub duration: i64,
    pub distance: Option<f64>,
    pub calories: Option<i64>,
    pub points_earned: i64,
    pub notes: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct TeamRecord {
    pub id: u64,
    pub object_id: String,
    pub name: String,
    pub description: String,
    pub coach: Option<u64>,
    pub members: Vec<u64>,
    pub total_points: i64,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct ChallengeRecord {
    pub object_id: String,
    pub title: String,
    pub description: String,
    pub challenge_type: String,
    pub target_value: f64,
    pub activity_types: Vec<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub points_reward: i64,
    pub participants: Vec<u64>,
    pub created_at: DateTime<Utc>,
}

impl ChallengeRecord {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date <= now && now <= self.end_date
    }
}

#[derive(Clone, Debug)]
pub struct WorkoutRecord {
    pub object_id: String,
    pub title: String,
    pub description: String,
    pub activity_type: String,
    pub fitness_level: String,
    pub duration: i64,
    pub instructions: String,
    pub exercises: Vec<ExerciseRecord>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct ExerciseRecord {
    pub name: String,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub duration_minutes: Option<u32>,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NewActivity {
    pub activity_type: String,
    pub duration: i64,
    pub distance: Option<f64>,
    pub calories: Option<i64>,
    #[serde(default)]
    pub notes: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct NewTeam {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfilePatch {
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub fitness_level: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// Query filters for the activity list.
#[derive(Debug, Default)]
pub struct ActivityQuery {
    pub user: Option<u64>,
    pub activity_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|stamp| stamp.and_utc())
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Everything the backend knows. Requests act as `current_user`.
#[derive(Debug)]
pub struct Store {
    pub users: Vec<UserRecord>,
    pub profiles: Vec<ProfileRecord>,
    pub activities: Vec<ActivityRecord>,
    pub teams: Vec<TeamRecord>,
    pub challenges: Vec<ChallengeRecord>,
    pub workouts: Vec<WorkoutRecord>,
    pub current_user: u64,
    next_user_id: u64,
    next_team_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// A store holding only the signed-in user, `octocat`.
    pub fn new() -> Self {
        let mut store = Self {
            users: Vec::new(),
            profiles: Vec::new(),
            activities: Vec::new(),
            teams: Vec::new(),
            challenges: Vec::new(),
            workouts: Vec::new(),
            current_user: 1,
            next_user_id: 1,
            next_team_id: 1,
        };
        store.current_user = store.add_user("octocat", "Mona", "Octocat", "beginner");
        store
    }

    pub fn add_user(
        &mut self,
        username: &str,
        first_name: &str,
        last_name: &str,
        fitness_level: &str,
    ) -> u64 {
        let id = self.next_user_id;
        self.next_user_id += 1;
        self.users.push(UserRecord {
            id,
            username: username.to_string(),
            email: format!("{username}@octofit.dev"),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
        self.profiles.push(ProfileRecord::blank(id, fitness_level));
        id
    }

    pub fn user(&self, id: u64) -> Result<&UserRecord, AppError> {
        self.users.iter().find(|u| u.id == id).ok_or(AppError::NotFound)
    }

    pub fn profile_of(&self, user_id: u64) -> Result<&ProfileRecord, AppError> {
        self.profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .ok_or(AppError::NotFound)
    }

    /// The current user's profile, created with defaults when missing.
    pub fn my_profile(&mut self) -> &mut ProfileRecord {
        let current = self.current_user;
        let index = match self.profiles.iter().position(|p| p.user_id == current) {
            Some(index) => index,
            None => {
                tracing::info!(user_id = current, "Created missing profile");
                self.profiles.push(ProfileRecord::blank(current, "beginner"));
                self.profiles.len() - 1
            }
        };
        &mut self.profiles[index]
    }

    /// Look a profile up by its ObjectId or by its user's id.
    pub fn find_profile(&self, key: &str) -> Result<&ProfileRecord, AppError> {
        self.profiles
            .iter()
            .find(|p| p.object_id == key || p.user_id.to_string() == key)
            .ok_or(AppError::NotFound)
    }

    pub fn update_profile(&mut self, patch: ProfilePatch) -> Result<&ProfileRecord, AppError> {
        if let Some(level) = &patch.fitness_level {
            if !FITNESS_LEVELS.contains(&level.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "\"{level}\" is not a valid choice."
                )));
            }
        }
        let profile = self.my_profile();
        if let Some(age) = patch.age {
            profile.age = Some(age);
        }
        if let Some(height) = patch.height {
            profile.height = Some(height);
        }
        if let Some(weight) = patch.weight {
            profile.weight = Some(weight);
        }
        if let Some(level) = patch.fitness_level {
            profile.fitness_level = level;
        }
        if let Some(bio) = patch.bio {
            profile.bio = Some(bio);
        }
        if let Some(avatar) = patch.avatar {
            profile.avatar = Some(avatar);
        }
        profile.updated_at = Utc::now();
        Ok(profile)
    }

    // --- activities ---

    pub fn activity(&self, object_id: &str) -> Result<&ActivityRecord, AppError> {
        self.activities
            .iter()
            .find(|a| a.object_id == object_id)
            .ok_or(AppError::NotFound)
    }

    /// Activities matching `query`, newest first. Without a `user` filter
    /// only the current user's activities are visible.
    pub fn list_activities(&self, query: &ActivityQuery) -> Vec<&ActivityRecord> {
        let owner = query.user.unwrap_or(self.current_user);
        let start = query
            .start_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|s| s.and_utc());
        let end = query
            .end_date
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|s| s.and_utc());
        let mut found: Vec<&ActivityRecord> = self
            .activities
            .iter()
            .filter(|a| a.user_id == owner)
            .filter(|a| {
                query
                    .activity_type
                    .as_deref()
                    .map_or(true, |t| a.activity_type == t)
            })
            .filter(|a| start.map_or(true, |s| a.date >= s))
            .filter(|a| end.map_or(true, |e| a.date <= e))
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        found
    }

    pub fn activities_of(&self, user_id: u64) -> Vec<&ActivityRecord> {
        let mut found: Vec<&ActivityRecord> = self
            .activities
            .iter()
            .filter(|a| a.user_id == user_id)
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        found
    }

    /// Log an activity for `user_id`: award points to the profile and
    /// refresh every team the user belongs to.
    pub fn log_activity(&mut self, user_id: u64, input: NewActivity) -> Result<&ActivityRecord, AppError> {
        if !ACTIVITY_TYPES.contains(&input.activity_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "\"{}\" is not a valid choice.",
                input.activity_type
            )));
        }
        if input.duration < 1 {
            return Err(AppError::BadRequest(
                "Duration must be at least one minute.".to_string(),
            ));
        }
        let date = parse_timestamp(&input.date)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid date: {}", input.date)))?;

        let points = points_for(&input.activity_type, input.duration);
        self.activities.push(ActivityRecord {
            object_id: new_object_id(),
            user_id,
            activity_type: input.activity_type,
            duration: input.duration,
            distance: input.distance,
            calories: input.calories,
            points_earned: points,
            notes: input.notes,
            date,
            created_at: Utc::now(),
        });

        if let Some(profile) = self.profiles.iter_mut().find(|p| p.user_id == user_id) {
            profile.total_points += points;
            profile.updated_at = Utc::now();
        }
        let team_ids: Vec<u64> = self
            .teams
            .iter()
            .filter(|t| t.members.contains(&user_id))
            .map(|t| t.id)
            .collect();
        for team_id in team_ids {
            self.refresh_team_points(team_id);
        }
        self.activities.last().ok_or(AppError::NotFound)
    }

    /// Totals over the current user's activities.
    pub fn summary(&self) -> Summary {
        let mine = self.activities_of(self.current_user);
        let mut breakdown = Vec::new();
        for kind in &ACTIVITY_TYPES[..7] {
            let count = mine.iter().filter(|a| a.activity_type == *kind).count();
            if count > 0 {
                breakdown.push((kind.to_string(), count));
            }
        }
        Summary {
            total_activities: mine.len(),
            total_duration: mine.iter().map(|a| a.duration).sum(),
            total_distance: mine.iter().filter_map(|a| a.distance).sum(),
            total_points: mine.iter().map(|a| a.points_earned).sum(),
            breakdown,
        }
    }

    // --- teams ---

    pub fn team(&self, id: u64) -> Result<&TeamRecord, AppError> {
        self.teams.iter().find(|t| t.id == id).ok_or(AppError::NotFound)
    }

    fn team_mut(&mut self, id: u64) -> Result<&mut TeamRecord, AppError> {
        self.teams.iter_mut().find(|t| t.id == id).ok_or(AppError::NotFound)
    }

    /// Teams ordered by points, highest first.
    pub fn teams_by_points(&self) -> Vec<&TeamRecord> {
        let mut teams: Vec<&TeamRecord> = self.teams.iter().collect();
        teams.sort_by(|a, b| b.total_points.cmp(&a.total_points).then(a.id.cmp(&b.id)));
        teams
    }

    /// Team total is the sum of its members' activity points.
    fn refresh_team_points(&mut self, team_id: u64) {
        let Ok(members) = self.team(team_id).map(|t| t.members.clone()) else {
            return;
        };
        let total = self
            .activities
            .iter()
            .filter(|a| members.contains(&a.user_id))
            .map(|a| a.points_earned)
            .sum();
        if let Ok(team) = self.team_mut(team_id) {
            team.total_points = total;
            team.updated_at = Utc::now();
        }
    }

    /// Create a team coached by `coach`, who also becomes its first member.
    pub fn create_team(&mut self, coach: u64, input: NewTeam) -> Result<&TeamRecord, AppError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("This field may not be blank.".to_string()));
        }
        if self.teams.iter().any(|t| t.name == name) {
            return Err(AppError::BadRequest(
                "team with this name already exists.".to_string(),
            ));
        }
        let id = self.next_team_id;
        self.next_team_id += 1;
        let now = Utc::now();
        self.teams.push(TeamRecord {
            id,
            object_id: new_object_id(),
            name,
            description: input.description,
            coach: Some(coach),
            members: vec![coach],
            total_points: 0,
            avatar: input.avatar,
            created_at: now,
            updated_at: now,
        });
        self.refresh_team_points(id);
        self.team(id)
    }

    pub fn join_team(&mut self, team_id: u64) -> Result<&TeamRecord, AppError> {
        let user = self.current_user;
        let team = self.team_mut(team_id)?;
        if team.members.contains(&user) {
            return Err(AppError::BadRequest(
                "You are already a member of this team".to_string(),
            ));
        }
        team.members.push(user);
        self.refresh_team_points(team_id);
        self.team(team_id)
    }

    pub fn leave_team(&mut self, team_id: u64) -> Result<String, AppError> {
        let user = self.current_user;
        let team = self.team_mut(team_id)?;
        if !team.members.contains(&user) {
            return Err(AppError::BadRequest(
                "You are not a member of this team".to_string(),
            ));
        }
        if team.coach == Some(user) {
            return Err(AppError::BadRequest(
                "Team coach cannot leave the team".to_string(),
            ));
        }
        team.members.retain(|member| *member != user);
        self.refresh_team_points(team_id);
        Ok("Successfully left the team".to_string())
    }

    // --- challenges ---

    pub fn challenge(&self, object_id: &str) -> Result<&ChallengeRecord, AppError> {
        self.challenges
            .iter()
            .find(|c| c.object_id == object_id)
            .ok_or(AppError::NotFound)
    }

    fn challenge_mut(&mut self, object_id: &str) -> Result<&mut ChallengeRecord, AppError> {
        self.challenges
            .iter_mut()
            .find(|c| c.object_id == object_id)
            .ok_or(AppError::NotFound)
    }

    /// Challenges ordered by start date, newest first.
    pub fn list_challenges(&self, active_at: Option<DateTime<Utc>>) -> Vec<&ChallengeRecord> {
        let mut found: Vec<&ChallengeRecord> = self
            .challenges
            .iter()
            .filter(|c| active_at.map_or(true, |now| c.is_active_at(now)))
            .collect();
        found.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        found
    }

    pub fn join_challenge(&mut self, object_id: &str) -> Result<&ChallengeRecord, AppError> {
        let user = self.current_user;
        let challenge = self.challenge_mut(object_id)?;
        if challenge.participants.contains(&user) {
            return Err(AppError::BadRequest(
                "You are already participating in this challenge".to_string(),
            ));
        }
        challenge.participants.push(user);
        self.challenge(object_id)
    }

    pub fn leave_challenge(&mut self, object_id: &str) -> Result<String, AppError> {
        let user = self.current_user;
        let challenge = self.challenge_mut(object_id)?;
        if !challenge.participants.contains(&user) {
            return Err(AppError::BadRequest(
                "You are not participating in this challenge".to_string(),
            ));
        }
        challenge.participants.retain(|p| *p != user);
        Ok("Successfully left the challenge".to_string())
    }

    // --- workouts ---

    pub fn workout(&self, object_id: &str) -> Result<&WorkoutRecord, AppError> {
        self.workouts
            .iter()
            .find(|w| w.object_id == object_id)
            .ok_or(AppError::NotFound)
    }

    pub fn list_workouts(
        &self,
        fitness_level: Option<&str>,
        activity_type: Option<&str>,
    ) -> Vec<&WorkoutRecord> {
        self.workouts
            .iter()
            .filter(|w| fitness_level.map_or(true, |level| w.fitness_level == level))
            .filter(|w| activity_type.map_or(true, |kind| w.activity_type == kind))
            .collect()
    }

    // --- leaderboards ---

    /// Top `limit` users by profile points, ranked from 1.
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderRow> {
        let mut profiles: Vec<&ProfileRecord> = self.profiles.iter().collect();
        profiles.sort_by(|a, b| b.total_points.cmp(&a.total_points).then(a.user_id.cmp(&b.user_id)));
        profiles
            .into_iter()
            .take(limit)
            .enumerate()
            .filter_map(|(index, profile)| {
                let user = self.user(profile.user_id).ok()?;
                let mine = self.activities_of(user.id);
                Some(LeaderRow {
                    rank: index + 1,
                    user_id: user.id,
                    username: user.username.clone(),
                    total_points: profile.total_points,
                    activity_count: mine.len(),
                    total_calories: mine.iter().filter_map(|a| a.calories).sum(),
                    team_name: self
                        .teams
                        .iter()
                        .find(|t| t.members.contains(&user.id))
                        .map(|t| t.name.clone()),
                })
            })
            .collect()
    }
}

/// Aggregates returned by `Store::summary`.
#[derive(Debug)]
pub struct Summary {
    pub total_activities: usize,
    pub total_duration: i64,
    pub total_distance: f64,
    pub total_points: i64,
    pub breakdown: Vec<(String, usize)>,
}

/// One computed user-leaderboard row.
#[derive(Debug)]
pub struct LeaderRow {
    pub rank: usize,
    pub user_id: u64,
    pub username: String,
    pub total_points: i64,
    pub activity_count: usize,
    pub total_calories: i64,
    pub team_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn run(duration: i64, date: &str) -> NewActivity {
        NewActivity {
            activity_type: "running".to_string(),
            duration,
            distance: Some(5.0),
            calories: Some(300),
            notes: String::new(),
            date: date.to_string(),
        }
    }

    #[test]
    fn points_follow_type_multiplier() {
        assert_eq!(points_for("running", 45), 12);
        assert_eq!(points_for("walking", 45), 4);
        assert_eq!(points_for("cycling", 9), 0);
        assert_eq!(points_for("kayaking", 30), 3);
    }

    #[test]
    fn logging_awards_profile_and_team_points() {
        let mut store = Store::new();
        let me = store.current_user;
        let team = store
            .create_team(me, NewTeam { name: "Octo".to_string(), description: String::new(), avatar: None })
            .unwrap()
            .id;
        store.log_activity(me, run(30, "2024-05-01")).unwrap();
        assert_eq!(store.profile_of(me).unwrap().total_points, 9);
        assert_eq!(store.team(team).unwrap().total_points, 9);
    }

    #[test]
    fn invalid_activity_type_is_rejected() {
        let mut store = Store::new();
        let mut input = run(30, "2024-05-01");
        input.activity_type = "kayaking".to_string();
        let err = store.log_activity(1, input).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn coach_cannot_leave() {
        let mut store = Store::new();
        let me = store.current_user;
        let team = store
            .create_team(me, NewTeam { name: "Octo".to_string(), description: String::new(), avatar: None })
            .unwrap()
            .id;
        let err = store.leave_team(team).unwrap_err();
        assert_eq!(err.to_string(), "Team coach cannot leave the team");
    }

    #[test]
    fn activity_filters_apply_date_bounds() {
        let mut store = Store::new();
        store.log_activity(1, run(30, "2024-01-10")).unwrap();
        store.log_activity(1, run(30, "2024-02-10")).unwrap();
        let query = ActivityQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        assert_eq!(store.list_activities(&query).len(), 1);
    }

    #[test]
    fn leaderboard_ranks_by_points_and_truncates() {
        let mut store = Store::new();
        let thor = store.add_user("thor", "Thor", "Odinson", "advanced");
        store.log_activity(thor, run(60, "2024-05-01")).unwrap();
        store.log_activity(1, run(20, "2024-05-01")).unwrap();
        let board = store.leaderboard(1);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].username, "thor");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].total_calories, 300);
    }

    #[test]
    fn summary_counts_current_user_only() {
        let mut store = Store::new();
        let thor = store.add_user("thor", "Thor", "Odinson", "advanced");
        store.log_activity(thor, run(60, "2024-05-01")).unwrap();
        store.log_activity(1, run(20, "2024-05-01")).unwrap();
        let summary = store.summary();
        assert_eq!(summary.total_activities, 1);
        assert_eq!(summary.total_points, 6);
        assert_eq!(summary.breakdown, vec![("running".to_string(), 1)]);
    }

    #[test]
    fn timestamps_accept_dates_and_rfc3339() {
        assert!(parse_timestamp("2024-05-01").is_some());
        assert!(parse_timestamp("2024-05-01T08:00:00Z").is_some());
        assert!(parse_timestamp("May 1st").is_none());
    }

    #[test]
    fn challenge_activity_window_is_inclusive() {
        let now = Utc::now();
        let challenge = ChallengeRecord {
            object_id: new_object_id(),
            title: "t".to_string(),
            description: String::new(),
            challenge_type: "points".to_string(),
            target_value: 1.0,
            activity_types: Vec::new(),
            start_date: now,
            end_date: now + Duration::days(1),
            points_reward: 0,
            participants: Vec::new(),
            created_at: now,
        };
        assert!(challenge.is_active_at(now));
        assert!(!challenge.is_active_at(now - Duration::seconds(1)));
    }
}
