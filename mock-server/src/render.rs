//! JSON representations of store records, shaped like the real backend's
//! serializers: integer `id` for users and teams, ObjectId `_id` strings
//! for everything else.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::store::{
    ActivityRecord, ChallengeRecord, ExerciseRecord, LeaderRow, ProfileRecord, Store, Summary,
    TeamRecord, UserRecord, WorkoutRecord,
};

/// Collections are served in pages of this many items.
pub const PAGE_SIZE: usize = 20;

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn user(store: &Store, user: &UserRecord) -> Value {
    let profile = store.profile_of(user.id).ok().map(|p| {
        json!({
            "fitness_level": p.fitness_level,
            "height": p.height,
            "weight": p.weight,
            "bio": p.bio,
        })
    });
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "first_name": user.first_name,
        "last_name": user.last_name,
        "profile": profile,
    })
}

pub fn profile(store: &Store, profile: &ProfileRecord) -> Value {
    json!({
        "_id": profile.object_id,
        "user": store.user(profile.user_id).ok().map(|u| user(store, u)),
        "age": profile.age,
        "height": profile.height,
        "weight": profile.weight,
        "fitness_level": profile.fitness_level,
        "total_points": profile.total_points,
        "bio": profile.bio,
        "avatar": profile.avatar,
        "created_at": timestamp(profile.created_at),
        "updated_at": timestamp(profile.updated_at),
    })
}

pub fn activity(store: &Store, activity: &ActivityRecord) -> Value {
    json!({
        "_id": activity.object_id,
        "user": activity.user_id,
        "user_name": store.user(activity.user_id).ok().map(|u| u.username.clone()),
        "activity_type": activity.activity_type,
        "duration": activity.duration,
        "distance": activity.distance,
        "calories": activity.calories,
        "points_earned": activity.points_earned,
        "notes": activity.notes,
        "date": timestamp(activity.date),
        "created_at": timestamp(activity.created_at),
    })
}

pub fn summary(summary: &Summary) -> Value {
    let breakdown: serde_json::Map<String, Value> = summary
        .breakdown
        .iter()
        .map(|(kind, count)| (kind.clone(), json!(count)))
        .collect();
    json!({
        "total_activities": summary.total_activities,
        "total_duration": summary.total_duration,
        "total_distance": summary.total_distance,
        "total_points": summary.total_points,
        "activity_breakdown": breakdown,
    })
}

pub fn team(store: &Store, team: &TeamRecord) -> Value {
    let members: Vec<Value> = team
        .members
        .iter()
        .filter_map(|id| store.user(*id).ok())
        .map(|u| user(store, u))
        .collect();
    json!({
        "id": team.id,
        "_id": team.object_id,
        "name": team.name,
        "description": team.description,
        "coach": team.coach,
        "coach_name": team.coach.and_then(|id| store.user(id).ok()).map(|u| u.username.clone()),
        "members": members,
        "member_count": team.members.len(),
        "total_points": team.total_points,
        "avatar": team.avatar,
        "created_at": timestamp(team.created_at),
        "updated_at": timestamp(team.updated_at),
    })
}

pub fn challenge(challenge: &ChallengeRecord, now: DateTime<Utc>) -> Value {
    json!({
        "_id": challenge.object_id,
        "title": challenge.title,
        "description": challenge.description,
        "challenge_type": challenge.challenge_type,
        "target_value": challenge.target_value,
        "activity_types": challenge.activity_types,
        "start_date": timestamp(challenge.start_date),
        "end_date": timestamp(challenge.end_date),
        "points_reward": challenge.points_reward,
        "participant_count": challenge.participants.len(),
        "is_active": challenge.is_active_at(now),
        "created_at": timestamp(challenge.created_at),
    })
}

fn exercise(exercise: &ExerciseRecord) -> Value {
    json!({
        "name": exercise.name,
        "sets": exercise.sets,
        "reps": exercise.reps,
        "duration_minutes": exercise.duration_minutes,
    })
}

pub fn workout(workout: &WorkoutRecord) -> Value {
    json!({
        "_id": workout.object_id,
        "title": workout.title,
        "description": workout.description,
        "activity_type": workout.activity_type,
        "fitness_level": workout.fitness_level,
        "duration": workout.duration,
        "instructions": workout.instructions,
        "exercises": workout.exercises.iter().map(exercise).collect::<Vec<_>>(),
        "video_url": workout.video_url,
        "created_at": timestamp(workout.created_at),
    })
}

pub fn leader(row: &LeaderRow) -> Value {
    json!({
        "user_id": row.user_id,
        "username": row.username,
        "total_points": row.total_points,
        "activity_count": row.activity_count,
        "total_calories": row.total_calories,
        "team_name": row.team_name,
        "rank": row.rank,
    })
}

pub fn team_leader(rank: usize, team: &TeamRecord) -> Value {
    json!({
        "team_id": team.id,
        "team_name": team.name,
        "total_points": team.total_points,
        "member_count": team.members.len(),
        "rank": rank,
    })
}

/// Wrap `items` in a page envelope. Pages are 1-based; a page past the
/// end is `None` unless the collection is empty and page 1 was asked for.
pub fn paginate(path: &str, items: Vec<Value>, page: usize) -> Option<Value> {
    let count = items.len();
    let pages = count.div_ceil(PAGE_SIZE).max(1);
    if page == 0 || page > pages {
        return None;
    }
    let results: Vec<Value> = items
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();
    let next = (page < pages).then(|| format!("{path}?page={}", page + 1));
    let previous = (page > 1).then(|| format!("{path}?page={}", page - 1));
    Some(json!({
        "count": count,
        "next": next,
        "previous": previous,
        "results": results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({"n": i})).collect()
    }

    #[test]
    fn single_page_has_no_links() {
        let page = paginate("/api/users/", items(3), 1).unwrap();
        assert_eq!(page["count"], 3);
        assert!(page["next"].is_null());
        assert!(page["previous"].is_null());
        assert_eq!(page["results"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn later_pages_link_both_ways() {
        let page = paginate("/api/users/", items(45), 2).unwrap();
        assert_eq!(page["results"][0]["n"], 20);
        assert_eq!(page["next"], "/api/users/?page=3");
        assert_eq!(page["previous"], "/api/users/?page=1");
    }

    #[test]
    fn empty_collection_still_has_page_one() {
        let page = paginate("/api/teams/", Vec::new(), 1).unwrap();
        assert_eq!(page["count"], 0);
        assert_eq!(page["results"], json!([]));
    }

    #[test]
    fn out_of_range_pages_are_rejected() {
        assert!(paginate("/api/teams/", items(5), 0).is_none());
        assert!(paginate("/api/teams/", items(5), 2).is_none());
    }
}
