//! Command line definition.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use octofit_core::{ActivityType, FitnessLevel, ResourceId};

/// Command-line client for the OctoFit Tracker API.
#[derive(Parser, Debug)]
#[command(name = "octofit")]
#[command(about = "Track workouts, teams and challenges on OctoFit")]
pub struct Cli {
    /// API base URL, overriding OCTOFIT_API_URL and CODESPACE_NAME
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered users
    Users,
    /// Show a profile (yours by default) or update yours
    Profile(ProfileArgs),
    /// Activity totals and the most recent workouts
    Dashboard,
    /// List or log your activities
    Activities(ActivitiesArgs),
    /// Browse, create, join or leave teams
    Teams(TeamsArgs),
    /// Browse, join or leave challenges
    Challenges(ChallengesArgs),
    /// Suggested workouts
    Workouts(WorkoutsArgs),
    /// User and team rankings
    Leaderboard(LeaderboardArgs),
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Profile to show instead of your own
    #[arg(long)]
    pub id: Option<ResourceId>,

    #[command(subcommand)]
    pub action: Option<ProfileAction>,
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Change fields of your profile
    Update(UpdateProfileArgs),
}

#[derive(Args, Debug)]
pub struct UpdateProfileArgs {
    #[arg(long)]
    pub age: Option<u32>,
    /// Centimetres
    #[arg(long)]
    pub height: Option<f64>,
    /// Kilograms
    #[arg(long)]
    pub weight: Option<f64>,
    #[arg(long)]
    pub fitness_level: Option<FitnessLevel>,
    #[arg(long)]
    pub bio: Option<String>,
}

#[derive(Args, Debug)]
pub struct ActivitiesArgs {
    #[command(subcommand)]
    pub action: Option<ActivitiesAction>,
}

#[derive(Subcommand, Debug)]
pub enum ActivitiesAction {
    /// Log a new activity
    Log(LogActivityArgs),
}

#[derive(Args, Debug)]
pub struct LogActivityArgs {
    #[arg(long = "type", value_name = "TYPE")]
    pub activity_type: ActivityType,
    /// Minutes
    #[arg(long)]
    pub duration: u32,
    /// Kilometres
    #[arg(long)]
    pub distance: Option<f64>,
    #[arg(long)]
    pub calories: Option<u32>,
    #[arg(long, default_value = "")]
    pub notes: String,
    /// YYYY-MM-DD, today when omitted
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct TeamsArgs {
    /// Only teams you belong to
    #[arg(long)]
    pub mine: bool,

    #[command(subcommand)]
    pub action: Option<TeamsAction>,
}

#[derive(Subcommand, Debug)]
pub enum TeamsAction {
    /// Create a team with you as coach
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Join { id: ResourceId },
    Leave { id: ResourceId },
}

#[derive(Args, Debug)]
pub struct ChallengesArgs {
    /// Include challenges that are not running right now
    #[arg(long)]
    pub all: bool,

    #[command(subcommand)]
    pub action: Option<ChallengesAction>,
}

#[derive(Subcommand, Debug)]
pub enum ChallengesAction {
    Join { id: ResourceId },
    Leave { id: ResourceId },
}

#[derive(Args, Debug)]
pub struct WorkoutsArgs {
    #[arg(long)]
    pub fitness_level: Option<FitnessLevel>,
    #[arg(long)]
    pub activity_type: Option<String>,
    /// Workouts matching your profile's fitness level
    #[arg(long, conflicts_with_all = ["fitness_level", "activity_type"])]
    pub for_me: bool,
}

#[derive(Args, Debug)]
pub struct LeaderboardArgs {
    #[arg(long, default_value_t = 20)]
    pub limit: u32,
    /// Only the user ranking
    #[arg(long, conflicts_with = "teams")]
    pub users: bool,
    /// Only the team ranking
    #[arg(long)]
    pub teams: bool,
}
