//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use chrono::NaiveDate;
use octofit_core::{
    ActivityFilter, ActivityType, ApiError, ChallengeFilter, CreateActivity, CreateTeam,
    FitnessLevel, HttpMethod, HttpRequest, HttpResponse, OctofitClient, ResourceId,
    UpdateProfile, WorkoutFilter,
};
use serde::Serialize;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8000/api";

fn client() -> OctofitClient {
    OctofitClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn id(args: &Value) -> ResourceId {
    serde_json::from_value(args["id"].clone()).unwrap()
}

fn text<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args[key].as_str()
}

fn date(args: &Value, key: &str) -> Option<NaiveDate> {
    text(args, key).map(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap())
}

/// Dispatch a vector's `operation` to the matching builder.
fn build(c: &OctofitClient, operation: &str, args: &Value) -> HttpRequest {
    match operation {
        "list_users" => c.build_list_users(),
        "get_user" => c.build_get_user(&id(args)),
        "get_my_profile" => c.build_get_my_profile(),
        "get_profile" => c.build_get_profile(&id(args)),
        "update_my_profile" => {
            let input: UpdateProfile = serde_json::from_value(args["input"].clone()).unwrap();
            c.build_update_my_profile(&input).unwrap()
        }
        "list_activities" => c.build_list_activities(&ActivityFilter {
            user: serde_json::from_value(args["user"].clone()).unwrap(),
            activity_type: text(args, "type").map(|t| t.parse::<ActivityType>().unwrap()),
            start_date: date(args, "start_date"),
            end_date: date(args, "end_date"),
        }),
        "create_activity" => {
            let input: CreateActivity = serde_json::from_value(args["input"].clone()).unwrap();
            c.build_create_activity(&input).unwrap()
        }
        "list_my_activities" => c.build_list_my_activities(),
        "activity_summary" => c.build_activity_summary(),
        "create_team" => {
            let input: CreateTeam = serde_json::from_value(args["input"].clone()).unwrap();
            c.build_create_team(&input).unwrap()
        }
        "join_team" => c.build_join_team(&id(args)),
        "leave_team" => c.build_leave_team(&id(args)),
        "list_my_teams" => c.build_list_my_teams(),
        "list_challenges" => c.build_list_challenges(&ChallengeFilter {
            active_only: args["active"].as_bool().unwrap_or(false),
        }),
        "join_challenge" => c.build_join_challenge(&id(args)),
        "list_workouts" => c.build_list_workouts(&WorkoutFilter {
            fitness_level: text(args, "fitness_level").map(|l| l.parse::<FitnessLevel>().unwrap()),
            activity_type: text(args, "activity_type").map(str::to_string),
        }),
        "workouts_for_me" => c.build_workouts_for_me(),
        "leaderboard" => c.build_leaderboard(args["limit"].as_u64().unwrap() as u32),
        "team_leaderboard" => c.build_team_leaderboard(args["limit"].as_u64().unwrap() as u32),
        other => panic!("unknown operation: {other}"),
    }
}

fn response(case: &Value) -> HttpResponse {
    let status = case["response"]["status"].as_u64().unwrap() as u16;
    let body = match &case["response"]["body"] {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    };
    HttpResponse::new(status, body)
}

/// Every key in `expected` must be present in `actual` with the same value.
fn assert_subset(actual: &Value, expected: &Value, name: &str) {
    for (key, value) in expected.as_object().unwrap() {
        assert_eq!(&actual[key], value, "{name}: field {key}");
    }
}

fn assert_items<T: Serialize>(items: &[T], expected: &Value, name: &str) {
    let expected = expected.as_array().unwrap();
    assert_eq!(items.len(), expected.len(), "{name}: length");
    for (item, want) in items.iter().zip(expected) {
        assert_subset(&serde_json::to_value(item).unwrap(), want, name);
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];
        let req = build(&c, case["operation"].as_str().unwrap(), &case["args"]);

        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content-type");
        assert_eq!(req.header("accept"), Some("application/json"), "{name}: accept");

        match expected_req.get("body") {
            Some(expected_body) => {
                let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&body, expected_body, "{name}: body");
            }
            None => assert!(req.body.is_none(), "{name}: unexpected body"),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected"];
        let resp = response(case);
        match case["kind"].as_str().unwrap() {
            "teams" => assert_items(&c.parse_teams(resp).unwrap(), expected, name),
            "activities" => assert_items(&c.parse_activities(resp).unwrap(), expected, name),
            "challenges" => assert_items(&c.parse_challenges(resp).unwrap(), expected, name),
            "leaderboard" => assert_items(&c.parse_leaderboard(resp).unwrap(), expected, name),
            "workouts" => assert_items(&c.parse_workouts(resp).unwrap(), expected, name),
            other => panic!("unknown kind: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_error"];
        let err = c.parse_teams(response(case)).unwrap_err();

        match &err {
            ApiError::RequestFailed { status, message } => {
                assert_eq!(*status as u64, expected["status"].as_u64().unwrap(), "{name}: status");
                assert_eq!(message, expected["message"].as_str().unwrap(), "{name}: message");
            }
            other => panic!("{name}: expected RequestFailed, got {other:?}"),
        }
        // Display is the bare message.
        assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: display");
    }
}
