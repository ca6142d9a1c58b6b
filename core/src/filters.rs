//! Typed filters for the filterable collection endpoints.

use chrono::NaiveDate;

use crate::query::QueryParams;
use crate::types::{ActivityType, FitnessLevel, ResourceId};

/// Filters accepted by `GET /activities/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityFilter {
    pub user: Option<ResourceId>,
    pub activity_type: Option<ActivityType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ActivityFilter {
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .set_opt("user", self.user.as_ref())
            .set_opt("type", self.activity_type)
            .set_opt("start_date", self.start_date.map(|d| d.format("%Y-%m-%d")))
            .set_opt("end_date", self.end_date.map(|d| d.format("%Y-%m-%d")));
        params
    }
}

/// Filters accepted by `GET /challenges/`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChallengeFilter {
    /// Only challenges whose window contains "now".
    pub active_only: bool,
}

impl ChallengeFilter {
    pub fn active() -> Self {
        Self { active_only: true }
    }

    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if self.active_only {
            params.set("active", "true");
        }
        params
    }
}

/// Filters accepted by `GET /workouts/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutFilter {
    pub fitness_level: Option<FitnessLevel>,
    pub activity_type: Option<String>,
}

impl WorkoutFilter {
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .set_opt("fitness_level", self.fitness_level)
            .set_opt("activity_type", self.activity_type.as_deref());
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_filter_uses_backend_parameter_names() {
        let filter = ActivityFilter {
            user: Some(ResourceId::from(3)),
            activity_type: Some(ActivityType::StrengthTraining),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: None,
        };
        assert_eq!(
            filter.to_query().to_query_string(),
            "start_date=2024-01-01&type=strength_training&user=3"
        );
    }

    #[test]
    fn inactive_challenge_filter_sends_nothing() {
        assert!(ChallengeFilter::default().to_query().is_empty());
        assert_eq!(ChallengeFilter::active().to_query().to_query_string(), "active=true");
    }

    #[test]
    fn blank_workout_activity_type_is_dropped() {
        let filter = WorkoutFilter {
            fitness_level: Some(FitnessLevel::Beginner),
            activity_type: Some(String::new()),
        };
        assert_eq!(filter.to_query().to_query_string(), "fitness_level=beginner");
    }
}
