//! Plain-text rendering of each view. Pure functions over fetched data so
//! the empty states and formatting can be tested without a server.

use std::collections::HashSet;

use octofit_core::display::{
    format_date, format_distance, format_period, format_points, or_fallback, rank_badge,
    PLACEHOLDER,
};
use octofit_core::{
    Activity, ActivitySummary, Challenge, LeaderboardEntry, ResourceId, Team,
    TeamLeaderboardEntry, User, UserProfile, WorkoutSuggestion,
};

pub const NO_USERS: &str = "No users found.";
pub const NO_PROFILE: &str = "Profile not available.";
pub const NO_ACTIVITIES: &str = "No activities logged yet. Start tracking your workouts!";
pub const NO_RECENT_ACTIVITIES: &str = "No activities yet. Start logging your workouts!";
pub const NO_TEAMS: &str = "No teams available. Create the first one!";
pub const NO_CHALLENGES: &str = "No challenges available at the moment. Check back soon!";
pub const NO_WORKOUTS: &str = "No workout suggestions found matching your criteria.";
pub const NO_WORKOUTS_FOR_ME: &str = "No workout suggestions found. Try adjusting your filters or complete your profile for personalized recommendations!";
pub const NO_LEADERS: &str =
    "No data available yet. Start logging activities to appear on the leaderboard!";
pub const NO_TEAM_LEADERS: &str = "No team data available yet. Create or join a team to compete!";

/// How many activities the dashboard lists.
pub const RECENT_ACTIVITY_COUNT: usize = 5;

fn id_text(id: Option<&ResourceId>) -> &str {
    id.map_or(PLACEHOLDER, ResourceId::as_str)
}

fn membership_marker(id: Option<&ResourceId>, joined: &HashSet<ResourceId>) -> &'static str {
    match id {
        Some(id) if joined.contains(id) => "✓",
        _ => " ",
    }
}

fn activity_label(activity: &Activity) -> &'static str {
    activity.activity_type.map_or(PLACEHOLDER, |kind| kind.label())
}

pub fn users(users: &[User]) -> String {
    if users.is_empty() {
        return NO_USERS.to_string();
    }
    users
        .iter()
        .map(|user| {
            let level = user
                .profile
                .as_ref()
                .and_then(|p| p.fitness_level)
                .map_or(PLACEHOLDER, |level| level.label());
            format!(
                "{:>4}  {:<16} {:<22} {:<28} {}",
                id_text(user.id.as_ref()),
                user.username,
                user.display_name(),
                user.email,
                level
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn profile(profile: &UserProfile) -> String {
    let (name, username) = profile
        .user
        .as_ref()
        .map_or((PLACEHOLDER.to_string(), PLACEHOLDER.to_string()), |u| {
            (u.display_name(), u.username.clone())
        });
    let number = |value: Option<f64>, unit: &str| {
        value.map_or(PLACEHOLDER.to_string(), |v| format!("{v} {unit}"))
    };
    [
        format!("{name} (@{username})"),
        format!(
            "Fitness level: {}",
            profile.fitness_level.map_or(PLACEHOLDER, |l| l.label())
        ),
        format!("Points: {}", format_points(profile.total_points)),
        format!(
            "Age: {}",
            profile.age.map_or(PLACEHOLDER.to_string(), |a| a.to_string())
        ),
        format!("Height: {}", number(profile.height, "cm")),
        format!("Weight: {}", number(profile.weight, "kg")),
        format!("Bio: {}", or_fallback(profile.bio.as_deref(), PLACEHOLDER)),
        format!("Member since: {}", format_date(profile.created_at.as_deref())),
    ]
    .join("\n")
}

fn activity_line(activity: &Activity) -> String {
    format!(
        "{:<14} {:<18} {:>4} min  {:>9}  {:>8}",
        format_date(activity.date.as_deref()),
        activity_label(activity),
        activity.duration,
        format_distance(activity.distance),
        format_points(activity.points_earned),
    )
}

pub fn activities(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return NO_ACTIVITIES.to_string();
    }
    activities
        .iter()
        .map(activity_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn dashboard(summary: &ActivitySummary, recent: &[Activity]) -> String {
    let mut lines = vec![
        format!("Activities: {}", summary.total_activities),
        format!("Duration:   {} min", summary.total_duration),
        format!("Distance:   {}", format_distance(Some(summary.total_distance))),
        format!("Points:     {}", format_points(summary.total_points)),
    ];
    if !summary.activity_breakdown.is_empty() {
        let breakdown: Vec<String> = summary
            .activity_breakdown
            .iter()
            .map(|(kind, count)| format!("{kind} {count}"))
            .collect();
        lines.push(format!("Breakdown:  {}", breakdown.join(", ")));
    }
    lines.push(String::new());
    lines.push("Recent activities".to_string());
    if recent.is_empty() {
        lines.push(NO_RECENT_ACTIVITIES.to_string());
    } else {
        lines.extend(recent.iter().take(RECENT_ACTIVITY_COUNT).map(activity_line));
    }
    lines.join("\n")
}

/// One line per team; those in `joined` are marked.
pub fn teams(teams: &[Team], joined: &HashSet<ResourceId>) -> String {
    if teams.is_empty() {
        return NO_TEAMS.to_string();
    }
    teams
        .iter()
        .map(|team| {
            format!(
                "{} {:>4}  {:<24} {:>3} members  {:>10}  coach {}",
                membership_marker(team.id.as_ref(), joined),
                id_text(team.id.as_ref()),
                team.name,
                team.member_count,
                format_points(team.total_points),
                or_fallback(team.coach_name.as_deref(), PLACEHOLDER),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per challenge; those in `joined` are marked.
pub fn challenges(challenges: &[Challenge], joined: &HashSet<ResourceId>) -> String {
    if challenges.is_empty() {
        return NO_CHALLENGES.to_string();
    }
    challenges
        .iter()
        .map(|challenge| {
            let marker = membership_marker(challenge.id.as_ref(), joined);
            let kind = challenge.challenge_type.map_or(PLACEHOLDER, |k| k.label());
            format!(
                "{marker} {:<26} {:<24} {:<10} {:>8}  {} participants  [{}]",
                id_text(challenge.id.as_ref()),
                challenge.title,
                kind,
                format_points(challenge.points_reward),
                challenge.participant_count,
                format_period(challenge.start_date.as_deref(), challenge.end_date.as_deref()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn workouts(workouts: &[WorkoutSuggestion], for_me: bool) -> String {
    if workouts.is_empty() {
        let empty = if for_me { NO_WORKOUTS_FOR_ME } else { NO_WORKOUTS };
        return empty.to_string();
    }
    let mut lines = Vec::new();
    for workout in workouts {
        lines.push(format!(
            "{} ({}, {}, {} min)",
            workout.title,
            or_fallback(workout.activity_type.as_deref(), PLACEHOLDER),
            workout.fitness_level.map_or(PLACEHOLDER, |l| l.label()),
            workout.duration,
        ));
        if !workout.description.trim().is_empty() {
            lines.push(format!("  {}", workout.description));
        }
        lines.extend(
            workout
                .exercises
                .iter()
                .map(|exercise| format!("  - {}: {}", exercise.name, exercise.prescription())),
        );
    }
    lines.join("\n")
}

pub fn leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return NO_LEADERS.to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{:>3}  {:<16} {:>10}  {:>3} activities  {:>6} kcal  {}",
                rank_badge(entry.rank),
                entry.username,
                format_points(entry.total_points),
                entry.activity_count,
                entry.total_calories,
                or_fallback(entry.team_name.as_deref(), "N/A"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn team_leaderboard(entries: &[TeamLeaderboardEntry]) -> String {
    if entries.is_empty() {
        return NO_TEAM_LEADERS.to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{:>3}  {:<24} {:>10}  {} members",
                rank_badge(entry.rank),
                entry.team_name,
                format_points(entry.total_points),
                entry.member_count,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Both rankings, users first.
pub fn leaderboards(users: &[LeaderboardEntry], teams: &[TeamLeaderboardEntry]) -> String {
    [
        "Users".to_string(),
        leaderboard(users),
        String::new(),
        "Teams".to_string(),
        team_leaderboard(teams),
    ]
    .join("\n")
}
