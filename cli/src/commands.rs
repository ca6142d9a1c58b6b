//! Subcommand execution.
//!
//! Read views never fail: a request error is logged and the view renders
//! its empty state. Mutations propagate the error so the process exits
//! non-zero with the server's message.

use std::collections::HashSet;
use std::thread;

use anyhow::bail;
use octofit_core::display::format_points;
use octofit_core::{
    Api, ApiError, ChallengeFilter, CreateActivity, CreateTeam, Transport, UpdateProfile,
    WorkoutFilter,
};

use crate::cli::{
    ActivitiesAction, ChallengesAction, ChallengesArgs, Command, LeaderboardArgs,
    LogActivityArgs, ProfileAction, ProfileArgs, TeamsAction, TeamsArgs, UpdateProfileArgs,
    WorkoutsArgs,
};
use crate::views;

/// The value, or its default after logging why it is missing.
fn degrade<R: Default>(view: &str, result: Result<R, ApiError>) -> R {
    result.unwrap_or_else(|err| {
        tracing::warn!(view, error = %err, "Showing empty view");
        R::default()
    })
}

/// Run two requests on scoped threads and return both results.
fn both<A, B, FA, FB>(first: FA, second: FB) -> (A, B)
where
    A: Send,
    B: Send,
    FA: FnOnce() -> A + Send,
    FB: FnOnce() -> B + Send,
{
    thread::scope(|scope| {
        let a = scope.spawn(first);
        let b = scope.spawn(second);
        let a = a.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        let b = b.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (a, b)
    })
}

pub fn run<T: Transport + Sync>(api: &Api<T>, command: Command) -> anyhow::Result<String> {
    match command {
        Command::Users => Ok(views::users(&degrade("users", api.users()))),
        Command::Profile(args) => profile(api, args),
        Command::Dashboard => Ok(dashboard(api)),
        Command::Activities(args) => match args.action {
            None => Ok(views::activities(&degrade(
                "activities",
                api.my_activities(),
            ))),
            Some(ActivitiesAction::Log(args)) => log_activity(api, args),
        },
        Command::Teams(args) => teams(api, args),
        Command::Challenges(args) => challenges(api, args),
        Command::Workouts(args) => Ok(workouts(api, args)),
        Command::Leaderboard(args) => Ok(leaderboard(api, args)),
    }
}

fn profile<T: Transport>(api: &Api<T>, args: ProfileArgs) -> anyhow::Result<String> {
    if let Some(ProfileAction::Update(update)) = args.action {
        return update_profile(api, update);
    }
    let fetched = match &args.id {
        Some(id) => api.profile(id),
        None => api.my_profile(),
    };
    Ok(match fetched {
        Ok(profile) => views::profile(&profile),
        Err(err) => {
            tracing::warn!(view = "profile", error = %err, "Showing empty view");
            views::NO_PROFILE.to_string()
        }
    })
}

fn update_profile<T: Transport>(api: &Api<T>, args: UpdateProfileArgs) -> anyhow::Result<String> {
    let input = UpdateProfile {
        age: args.age,
        height: args.height,
        weight: args.weight,
        fitness_level: args.fitness_level,
        bio: args.bio,
        avatar: None,
    };
    if input.is_empty() {
        bail!("nothing to update: pass at least one profile field");
    }
    let updated = api.update_my_profile(&input)?;
    tracing::info!("Profile updated");
    Ok(format!("Profile updated.\n{}", views::profile(&updated)))
}

fn dashboard<T: Transport + Sync>(api: &Api<T>) -> String {
    let (summary, recent) = both(|| api.activity_summary(), || api.my_activities());
    views::dashboard(
        &degrade("activity summary", summary),
        &degrade("recent activities", recent),
    )
}

fn log_activity<T: Transport>(api: &Api<T>, args: LogActivityArgs) -> anyhow::Result<String> {
    let input = CreateActivity {
        activity_type: args.activity_type,
        duration: args.duration,
        distance: args.distance,
        calories: args.calories,
        notes: args.notes,
        date: args
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
    };
    let created = api.create_activity(&input)?;
    tracing::info!(points = created.points_earned, "Activity logged");
    Ok(format!(
        "Logged {} for {} min, earning {}.",
        input.activity_type.label(),
        input.duration,
        format_points(created.points_earned)
    ))
}

fn teams<T: Transport + Sync>(api: &Api<T>, args: TeamsArgs) -> anyhow::Result<String> {
    match args.action {
        None if args.mine => {
            let mine = degrade("my teams", api.my_teams());
            let joined: HashSet<_> = mine.iter().filter_map(|t| t.id.clone()).collect();
            Ok(views::teams(&mine, &joined))
        }
        None => {
            let (listed, mine) = both(|| api.teams(), || api.my_teams());
            let joined: HashSet<_> = degrade("my teams", mine)
                .into_iter()
                .filter_map(|t| t.id)
                .collect();
            Ok(views::teams(&degrade("teams", listed), &joined))
        }
        Some(TeamsAction::Create { name, description }) => {
            let team = api.create_team(&CreateTeam {
                name,
                description,
                avatar: None,
            })?;
            Ok(format!(
                "Created team {} (id {}). You are its coach.",
                team.name,
                team.id.as_ref().map_or("-", |id| id.as_str())
            ))
        }
        Some(TeamsAction::Join { id }) => {
            let team = api.join_team(&id)?;
            Ok(format!("Joined {}.", team.name))
        }
        Some(TeamsAction::Leave { id }) => Ok(api.leave_team(&id)?.message),
    }
}

fn challenges<T: Transport + Sync>(api: &Api<T>, args: ChallengesArgs) -> anyhow::Result<String> {
    match args.action {
        None => {
            let filter = ChallengeFilter {
                active_only: !args.all,
            };
            let (listed, mine) = both(|| api.challenges(&filter), || api.my_challenges());
            let joined: HashSet<_> = degrade("my challenges", mine)
                .into_iter()
                .filter_map(|c| c.id)
                .collect();
            Ok(views::challenges(&degrade("challenges", listed), &joined))
        }
        Some(ChallengesAction::Join { id }) => {
            let challenge = api.join_challenge(&id)?;
            Ok(format!("Joined {}.", challenge.title))
        }
        Some(ChallengesAction::Leave { id }) => Ok(api.leave_challenge(&id)?.message),
    }
}

fn workouts<T: Transport>(api: &Api<T>, args: WorkoutsArgs) -> String {
    let fetched = if args.for_me {
        api.workouts_for_me()
    } else {
        api.workouts(&WorkoutFilter {
            fitness_level: args.fitness_level,
            activity_type: args.activity_type,
        })
    };
    views::workouts(&degrade("workouts", fetched), args.for_me)
}

fn leaderboard<T: Transport + Sync>(api: &Api<T>, args: LeaderboardArgs) -> String {
    if args.teams {
        return views::team_leaderboard(&degrade(
            "team leaderboard",
            api.team_leaderboard(args.limit),
        ));
    }
    if args.users {
        return views::leaderboard(&degrade("leaderboard", api.leaderboard(args.limit)));
    }
    let (users, teams) = both(
        || api.leaderboard(args.limit),
        || api.team_leaderboard(args.limit),
    );
    views::leaderboards(
        &degrade("leaderboard", users),
        &degrade("team leaderboard", teams),
    )
}
