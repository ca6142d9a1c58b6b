//! Domain DTOs for the OctoFit API.
//!
//! # Design
//! Records pass through from the backend untouched, so every read type is
//! lenient: missing fields fall back to defaults, unknown fields are
//! ignored, and closed vocabularies that carry an unexpected value decode
//! to `None` (or `ActivityType::Other`) instead of failing the whole list.
//! These types are defined independently of the mock server's; the
//! integration tests catch schema drift between the two crates.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Failed to parse one of the closed vocabularies from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseKindError {
    kind: &'static str,
    value: String,
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a backend resource.
///
/// Users and teams are keyed by integers, everything else by ObjectId
/// strings. Both forms are kept as text and rendered verbatim into paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for ResourceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<u64>() {
            Ok(number) => serializer.serialize_u64(number),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Str(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(number) => ResourceId(number.to_string()),
            Raw::Str(text) => ResourceId(text),
        })
    }
}

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

/// Kind of workout an activity records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Running,
    Walking,
    Cycling,
    Swimming,
    StrengthTraining,
    Yoga,
    Sports,
    #[serde(other)]
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 8] = [
        ActivityType::Running,
        ActivityType::Walking,
        ActivityType::Cycling,
        ActivityType::Swimming,
        ActivityType::StrengthTraining,
        ActivityType::Yoga,
        ActivityType::Sports,
        ActivityType::Other,
    ];

    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Running => "running",
            ActivityType::Walking => "walking",
            ActivityType::Cycling => "cycling",
            ActivityType::Swimming => "swimming",
            ActivityType::StrengthTraining => "strength_training",
            ActivityType::Yoga => "yoga",
            ActivityType::Sports => "sports",
            ActivityType::Other => "other",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Running => "Running",
            ActivityType::Walking => "Walking",
            ActivityType::Cycling => "Cycling",
            ActivityType::Swimming => "Swimming",
            ActivityType::StrengthTraining => "Strength Training",
            ActivityType::Yoga => "Yoga",
            ActivityType::Sports => "Sports",
            ActivityType::Other => "Other",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = ParseKindError;

    /// Accepts the wire value, case-insensitively, with `-` or ` ` in
    /// place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        ActivityType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseKindError {
                kind: "activity type",
                value: s.to_string(),
            })
    }
}

/// Self-reported fitness level of a user, also used to target workouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    pub const ALL: [FitnessLevel; 3] = [
        FitnessLevel::Beginner,
        FitnessLevel::Intermediate,
        FitnessLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "beginner",
            FitnessLevel::Intermediate => "intermediate",
            FitnessLevel::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "Beginner",
            FitnessLevel::Intermediate => "Intermediate",
            FitnessLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessLevel {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        FitnessLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| ParseKindError {
                kind: "fitness level",
                value: s.to_string(),
            })
    }
}

impl<'de> Deserialize<'de> for FitnessLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// What a challenge measures progress in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeType {
    Distance,
    Duration,
    Frequency,
    Points,
}

impl ChallengeType {
    pub const ALL: [ChallengeType; 4] = [
        ChallengeType::Distance,
        ChallengeType::Duration,
        ChallengeType::Frequency,
        ChallengeType::Points,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeType::Distance => "distance",
            ChallengeType::Duration => "duration",
            ChallengeType::Frequency => "frequency",
            ChallengeType::Points => "points",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChallengeType::Distance => "Distance",
            ChallengeType::Duration => "Duration",
            ChallengeType::Frequency => "Frequency",
            ChallengeType::Points => "Points",
        }
    }
}

impl FromStr for ChallengeType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ChallengeType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseKindError {
                kind: "challenge type",
                value: s.to_string(),
            })
    }
}

impl<'de> Deserialize<'de> for ChallengeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Decode an optional vocabulary value, mapping unknown strings to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// Decode a value that the backend may send as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Users and profiles
// ---------------------------------------------------------------------------

/// A registered user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: Option<ResourceId>,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile: Option<ProfileSummary>,
}

impl User {
    /// "First Last", or the username when both names are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// The slice of a profile embedded in `User`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSummary {
    #[serde(deserialize_with = "lenient")]
    pub fitness_level: Option<FitnessLevel>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub bio: Option<String>,
}

/// Full profile of a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<ResourceId>,
    pub user: Option<User>,
    pub age: Option<u32>,
    /// Centimetres.
    pub height: Option<f64>,
    /// Kilograms.
    pub weight: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub fitness_level: Option<FitnessLevel>,
    pub total_points: i64,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Partial profile update. Fields left `None` are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_level: Option<FitnessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UpdateProfile {
    pub fn is_empty(&self) -> bool {
        *self == UpdateProfile::default()
    }
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

/// A logged workout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<ResourceId>,
    pub user: Option<ResourceId>,
    pub user_name: Option<String>,
    pub activity_type: Option<ActivityType>,
    /// Minutes.
    pub duration: i64,
    /// Kilometres.
    pub distance: Option<f64>,
    pub calories: Option<i64>,
    pub points_earned: i64,
    pub notes: Option<String>,
    pub date: Option<String>,
    pub created_at: Option<String>,
}

/// Payload for logging a new activity. Points are computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateActivity {
    pub activity_type: ActivityType,
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(default)]
    pub notes: String,
    pub date: NaiveDate,
}

/// Aggregate totals over the current user's activities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivitySummary {
    pub total_activities: u64,
    pub total_duration: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_distance: f64,
    pub total_points: i64,
    /// Activity type wire value → count. Types with no entries are absent.
    pub activity_breakdown: BTreeMap<String, u64>,
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// A team competing for points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    pub id: Option<ResourceId>,
    #[serde(rename = "_id")]
    pub object_id: Option<String>,
    pub name: String,
    pub description: String,
    pub coach: Option<ResourceId>,
    pub coach_name: Option<String>,
    pub members: Vec<User>,
    pub member_count: u64,
    pub total_points: i64,
    pub avatar: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Payload for creating a team. The caller becomes its coach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

// ---------------------------------------------------------------------------
// Challenges
// ---------------------------------------------------------------------------

/// A time-boxed fitness challenge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Challenge {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<ResourceId>,
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "lenient")]
    pub challenge_type: Option<ChallengeType>,
    pub target_value: f64,
    pub activity_types: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub points_reward: i64,
    pub participant_count: u64,
    pub is_active: bool,
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Workouts
// ---------------------------------------------------------------------------

/// One step of a workout: sets of reps, a timed block, or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Exercise {
    pub name: String,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub duration_minutes: Option<u32>,
}

impl Exercise {
    /// `5×50`, `20 min` or `As prescribed`. Zero counts are treated as absent.
    pub fn prescription(&self) -> String {
        let positive = |value: Option<u32>| value.filter(|v| *v > 0);
        match (positive(self.sets), positive(self.reps), positive(self.duration_minutes)) {
            (Some(sets), Some(reps), _) => format!("{sets}×{reps}"),
            (_, _, Some(minutes)) => format!("{minutes} min"),
            _ => "As prescribed".to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for Exercise {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct Detailed {
            name: String,
            sets: Option<u32>,
            reps: Option<u32>,
            duration_minutes: Option<u32>,
        }

        // Some records list exercises as bare names.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Detailed(Detailed),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Name(name) => Exercise {
                name,
                ..Default::default()
            },
            Repr::Detailed(d) => Exercise {
                name: d.name,
                sets: d.sets,
                reps: d.reps,
                duration_minutes: d.duration_minutes,
            },
        })
    }
}

/// A suggested workout routine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutSuggestion {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<ResourceId>,
    pub title: String,
    pub description: String,
    pub activity_type: Option<String>,
    #[serde(alias = "difficulty", deserialize_with = "lenient")]
    pub fitness_level: Option<FitnessLevel>,
    /// Minutes.
    pub duration: i64,
    pub instructions: String,
    #[serde(deserialize_with = "null_as_default")]
    pub exercises: Vec<Exercise>,
    pub video_url: Option<String>,
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

/// One row of the user leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: Option<ResourceId>,
    pub username: String,
    pub total_points: i64,
    pub activity_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_calories: i64,
    pub team_name: Option<String>,
}

/// One row of the team leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamLeaderboardEntry {
    pub rank: u32,
    pub team_id: Option<ResourceId>,
    pub team_name: String,
    pub total_points: i64,
    pub member_count: u64,
}

/// Body of endpoints that only confirm an action, e.g. leaving a team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Acknowledgement {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resource_id_accepts_numbers_and_strings() {
        let from_int: ResourceId = serde_json::from_value(json!(7)).unwrap();
        let from_str: ResourceId = serde_json::from_value(json!("65a1f0c2")).unwrap();
        assert_eq!(from_int.as_str(), "7");
        assert_eq!(from_str.as_str(), "65a1f0c2");
    }

    #[test]
    fn resource_id_serializes_back_in_its_original_form() {
        assert_eq!(serde_json::to_value(ResourceId::from(7)).unwrap(), json!(7));
        assert_eq!(
            serde_json::to_value(ResourceId::from("65a1f0c2")).unwrap(),
            json!("65a1f0c2")
        );
    }

    #[test]
    fn unknown_activity_type_decodes_as_other() {
        let activity: Activity =
            serde_json::from_value(json!({"_id": "a1", "activity_type": "kayaking", "duration": 30}))
                .unwrap();
        assert_eq!(activity.activity_type, Some(ActivityType::Other));
        assert_eq!(activity.id, Some(ResourceId::from("a1")));
    }

    #[test]
    fn activity_type_parses_loose_spellings() {
        assert_eq!("Strength Training".parse::<ActivityType>(), Ok(ActivityType::StrengthTraining));
        assert_eq!("strength-training".parse::<ActivityType>(), Ok(ActivityType::StrengthTraining));
        assert!("kayaking".parse::<ActivityType>().is_err());
    }

    #[test]
    fn fitness_level_is_case_insensitive() {
        let workout: WorkoutSuggestion =
            serde_json::from_value(json!({"title": "Core", "difficulty": "Intermediate"})).unwrap();
        assert_eq!(workout.fitness_level, Some(FitnessLevel::Intermediate));
    }

    #[test]
    fn exercises_decode_from_objects_and_names() {
        let workout: WorkoutSuggestion = serde_json::from_value(json!({
            "_id": "w1",
            "title": "Hero",
            "exercises": [
                {"name": "Push-ups", "sets": 5, "reps": 50},
                {"name": "Run", "duration_minutes": 30},
                {"name": "Stretch", "sets": null},
                "Plank"
            ]
        }))
        .unwrap();
        let prescriptions: Vec<String> = workout
            .exercises
            .iter()
            .map(|e| format!("{}: {}", e.name, e.prescription()))
            .collect();
        assert_eq!(
            prescriptions,
            ["Push-ups: 5×50", "Run: 30 min", "Stretch: As prescribed", "Plank: As prescribed"]
        );
    }

    #[test]
    fn null_exercises_read_as_empty() {
        let workout: WorkoutSuggestion =
            serde_json::from_value(json!({"title": "Rest", "exercises": null})).unwrap();
        assert!(workout.exercises.is_empty());
    }

    #[test]
    fn unknown_fitness_level_decodes_as_none() {
        let profile: UserProfile =
            serde_json::from_value(json!({"fitness_level": "elite", "total_points": 5})).unwrap();
        assert_eq!(profile.fitness_level, None);
        assert_eq!(profile.total_points, 5);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let team: Team = serde_json::from_value(json!({"id": 3, "name": "Team DC"})).unwrap();
        assert_eq!(team.name, "Team DC");
        assert!(team.members.is_empty());
        assert_eq!(team.member_count, 0);
    }

    #[test]
    fn null_calories_read_as_zero() {
        let entry: LeaderboardEntry = serde_json::from_value(
            json!({"rank": 1, "user_id": 4, "username": "thor", "total_calories": null}),
        )
        .unwrap();
        assert_eq!(entry.total_calories, 0);
        assert_eq!(entry.team_name, None);
    }

    #[test]
    fn create_activity_serializes_date_and_skips_empty_optionals() {
        let input = CreateActivity {
            activity_type: ActivityType::Cycling,
            duration: 45,
            distance: None,
            calories: Some(400),
            notes: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        };
        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(
            body,
            json!({"activity_type": "cycling", "duration": 45, "calories": 400, "notes": "", "date": "2024-03-09"})
        );
    }

    #[test]
    fn update_profile_sends_only_present_fields() {
        let update = UpdateProfile {
            fitness_level: Some(FitnessLevel::Advanced),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"fitness_level": "advanced"})
        );
        assert!(UpdateProfile::default().is_empty());
    }

    #[test]
    fn display_name_prefers_full_name() {
        let user = User {
            username: "ironman".to_string(),
            first_name: "Tony".to_string(),
            last_name: "Stark".to_string(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "Tony Stark");
        let anonymous = User {
            username: "hulk".to_string(),
            ..Default::default()
        };
        assert_eq!(anonymous.display_name(), "hulk");
    }
}
