//! Demo dataset for running the mock server by hand.

use chrono::{Duration, Utc};

use crate::render::timestamp;
use crate::store::{
    new_object_id, ChallengeRecord, ExerciseRecord, NewActivity, NewTeam, Store, WorkoutRecord,
};

fn sets(name: &str, sets: u32, reps: u32) -> ExerciseRecord {
    ExerciseRecord {
        name: name.to_string(),
        sets: Some(sets),
        reps: Some(reps),
        duration_minutes: None,
    }
}

fn timed(name: &str, minutes: u32) -> ExerciseRecord {
    ExerciseRecord {
        name: name.to_string(),
        sets: None,
        reps: None,
        duration_minutes: Some(minutes),
    }
}

fn free(name: &str) -> ExerciseRecord {
    ExerciseRecord {
        name: name.to_string(),
        sets: None,
        reps: None,
        duration_minutes: None,
    }
}

const MARVEL: [(&str, &str, &str, &str); 5] = [
    ("ironman", "Tony", "Stark", "advanced"),
    ("captainamerica", "Steve", "Rogers", "advanced"),
    ("thor", "Thor", "Odinson", "advanced"),
    ("blackwidow", "Natasha", "Romanoff", "advanced"),
    ("hulk", "Bruce", "Banner", "advanced"),
];

const DC: [(&str, &str, &str, &str); 5] = [
    ("superman", "Clark", "Kent", "advanced"),
    ("batman", "Bruce", "Wayne", "advanced"),
    ("wonderwoman", "Diana", "Prince", "advanced"),
    ("flash", "Barry", "Allen", "intermediate"),
    ("aquaman", "Arthur", "Curry", "intermediate"),
];

const ROTATION: [&str; 7] = [
    "running",
    "cycling",
    "swimming",
    "strength_training",
    "yoga",
    "walking",
    "sports",
];

impl Store {
    /// Two hero teams, a few weeks of activities, challenges and workouts.
    /// The signed-in user `octocat` starts out on no team.
    pub fn seeded() -> Self {
        let mut store = Store::new();
        let now = Utc::now();

        for (roster, team_name, motto) in [
            (&MARVEL, "Team Marvel", "Earth's Mightiest Heroes"),
            (&DC, "Team DC", "Justice League United"),
        ] {
            let ids: Vec<u64> = roster
                .iter()
                .map(|(username, first, last, level)| store.add_user(username, first, last, level))
                .collect();
            let coach = ids[0];
            let team_id = store
                .create_team(
                    coach,
                    NewTeam {
                        name: team_name.to_string(),
                        description: motto.to_string(),
                        avatar: None,
                    },
                )
                .map(|t| t.id)
                .unwrap_or_default();
            if let Some(team) = store.teams.iter_mut().find(|t| t.id == team_id) {
                team.members.extend(ids.iter().skip(1));
            }

            for (i, user_id) in ids.iter().enumerate() {
                for n in 0..(5 + i % 4) {
                    let kind = ROTATION[(i + n) % ROTATION.len()];
                    let distance = matches!(kind, "running" | "walking" | "cycling")
                        .then(|| 1.0 + ((i * 7 + n * 3) % 14) as f64 + 0.5);
                    let input = NewActivity {
                        activity_type: kind.to_string(),
                        duration: 20 + ((i * 13 + n * 17) % 100) as i64,
                        distance,
                        calories: Some(100 + ((i * 37 + n * 53) % 700) as i64),
                        notes: format!("{}'s {kind} session", roster[i].1),
                        date: timestamp(now - Duration::days(((i * 5 + n * 3) % 30) as i64)),
                    };
                    if let Err(err) = store.log_activity(*user_id, input) {
                        tracing::warn!(error = %err, "Skipping seed activity");
                    }
                }
            }
        }

        let challenges = [
            (
                "30-Day Running Streak",
                "Run at least 100 km this month",
                "distance",
                100.0,
                vec!["running"],
                now - Duration::days(7),
                now + Duration::days(23),
                200,
            ),
            (
                "Mindful Minutes",
                "Log 600 minutes of yoga",
                "duration",
                600.0,
                vec!["yoga"],
                now - Duration::days(3),
                now + Duration::days(27),
                150,
            ),
            (
                "Summer Splash",
                "Swim 20 sessions",
                "frequency",
                20.0,
                vec!["swimming"],
                now + Duration::days(14),
                now + Duration::days(44),
                250,
            ),
            (
                "Winter Points Rally",
                "Earn 500 points",
                "points",
                500.0,
                vec![],
                now - Duration::days(60),
                now - Duration::days(30),
                100,
            ),
        ];
        for (title, description, kind, target, types, start, end, reward) in challenges {
            store.challenges.push(ChallengeRecord {
                object_id: new_object_id(),
                title: title.to_string(),
                description: description.to_string(),
                challenge_type: kind.to_string(),
                target_value: target,
                activity_types: types.into_iter().map(str::to_string).collect(),
                start_date: start,
                end_date: end,
                points_reward: reward,
                participants: Vec::new(),
                created_at: now,
            });
        }

        let workouts = [
            (
                "Beginner 5K Walk-Run",
                "running",
                "beginner",
                25,
                vec![
                    timed("Brisk walk", 5),
                    sets("Jog / walk interval", 6, 1),
                    timed("Cool-down walk", 5),
                ],
            ),
            (
                "Morning Yoga Flow",
                "yoga",
                "beginner",
                20,
                vec![sets("Sun salutation A", 3, 1), free("Warrior II"), free("Child's pose")],
            ),
            (
                "Tempo Ride",
                "cycling",
                "intermediate",
                45,
                vec![timed("Warm-up", 10), sets("Tempo block", 3, 1), timed("Spin-out", 5)],
            ),
            (
                "Full-Body Strength",
                "strength_training",
                "intermediate",
                40,
                vec![
                    sets("Squats", 4, 8),
                    sets("Push-ups", 4, 12),
                    sets("Rows", 4, 10),
                    free("Plank"),
                ],
            ),
            (
                "Interval Swim",
                "swimming",
                "advanced",
                60,
                vec![timed("Warm-up", 10), sets("100 m repeats", 10, 1), timed("Cool-down", 5)],
            ),
            (
                "Hill Repeats",
                "running",
                "advanced",
                50,
                vec![timed("Easy run", 15), sets("Hill sprint", 8, 1), timed("Easy run", 10)],
            ),
        ];
        for (title, kind, level, duration, exercises) in workouts {
            let instructions = exercises
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            store.workouts.push(WorkoutRecord {
                object_id: new_object_id(),
                title: title.to_string(),
                description: format!("{title} for {level} athletes"),
                activity_type: kind.to_string(),
                fitness_level: level.to_string(),
                duration,
                instructions,
                exercises,
                video_url: None,
                created_at: now,
            });
        }

        store
    }
}
