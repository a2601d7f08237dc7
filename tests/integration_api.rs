//! Integration tests for the comparison and reading endpoints.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use serde_json::Value;
use tariff_compare::domain::Reading;

use common::{METER, PLAN_1, PLAN_2, PLAN_3, before_now, build_state, get, send};

fn json(body: &str) -> Value {
    serde_json::from_str(body).expect("body should be JSON")
}

/// Index of a quoted key in a raw JSON body, for key-order assertions.
fn key_pos(body: &str, key: &str) -> usize {
    body.find(&format!("\"{key}\""))
        .unwrap_or_else(|| panic!("missing key {key} in {body}"))
}

#[tokio::test]
async fn compare_all_costs_every_plan() {
    let state = build_state(vec![
        before_now(3600, Decimal::from(15)),
        before_now(0, Decimal::from(5)),
    ]);

    let (status, body) = get(state, "/price-plans/compare-all/smart-meter-id").await;
    assert_eq!(status, StatusCode::OK);

    let json = json(&body);
    assert_eq!(json["pricePlanId"], PLAN_1);
    let comparisons = &json["pricePlanComparisons"];
    assert_eq!(comparisons.as_object().map(|o| o.len()), Some(3));
    assert_eq!(comparisons[PLAN_1].as_f64(), Some(100.0));
    assert_eq!(comparisons[PLAN_2].as_f64(), Some(10.0));
    assert_eq!(comparisons[PLAN_3].as_f64(), Some(20.0));
}

#[tokio::test]
async fn unknown_meter_is_a_bad_request_everywhere() {
    for uri in [
        "/price-plans/compare-all/not-found",
        "/price-plans/recommend/not-found",
        "/price-plans/recommend/not-found?limit=1",
        "/price-plans/cost-lastweek/not-found",
        "/price-plans/cost-dayofweek/not-found",
        "/price-plans/cost-compare/daysofweek/not-found",
        "/price-plans/cost-compare/daysofweek-plans/not-found",
    ] {
        let (status, body) = get(build_state(vec![]), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json(&body)["Message"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn single_reading_has_no_comparison() {
    let state = build_state(vec![before_now(0, Decimal::from(5))]);
    let (status, body) = get(state, "/price-plans/compare-all/smart-meter-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn recommend_without_limit_returns_all_ascending() {
    let state = build_state(vec![
        before_now(1800, Decimal::from(35)),
        before_now(0, Decimal::from(3)),
    ]);

    let (status, body) = get(state, "/price-plans/recommend/smart-meter-id").await;
    assert_eq!(status, StatusCode::OK);

    let json = json(&body);
    assert_eq!(json.as_object().map(|o| o.len()), Some(3));
    assert_eq!(json[PLAN_2].as_f64(), Some(38.0));
    assert_eq!(json[PLAN_3].as_f64(), Some(76.0));
    assert_eq!(json[PLAN_1].as_f64(), Some(380.0));
    assert!(key_pos(&body, PLAN_2) < key_pos(&body, PLAN_3));
    assert!(key_pos(&body, PLAN_3) < key_pos(&body, PLAN_1));
}

#[tokio::test]
async fn recommend_with_limit_keeps_cheapest() {
    let readings = vec![
        before_now(3600, Decimal::from(25)),
        before_now(0, Decimal::from(3)),
    ];

    let (status, body) = get(
        build_state(readings.clone()),
        "/price-plans/recommend/smart-meter-id?limit=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let limited = json(&body);
    assert_eq!(limited.as_object().map(|o| o.len()), Some(2));
    assert_eq!(limited[PLAN_2].as_f64(), Some(14.0));
    assert_eq!(limited[PLAN_3].as_f64(), Some(28.0));

    let (_, body) = get(
        build_state(readings),
        "/price-plans/recommend/smart-meter-id?limit=5",
    )
    .await;
    assert_eq!(json(&body).as_object().map(|o| o.len()), Some(3));
}

#[tokio::test]
async fn cost_last_week_for_subscribed_plan() {
    // Monday 2024-01-08 and Tuesday 2024-01-09, both midnight
    let state = build_state(vec![
        before_now(9 * 86_400 + 12 * 3600, Decimal::from(2)),
        before_now(8 * 86_400 + 12 * 3600, Decimal::from(4)),
        before_now(0, Decimal::from(50)),
    ]);

    let (status, body) = get(state, "/price-plans/cost-lastweek/smart-meter-id").await;
    assert_eq!(status, StatusCode::OK);

    let json = json(&body);
    assert_eq!(json.as_object().map(|o| o.len()), Some(1));
    assert_eq!(json[PLAN_1].as_f64(), Some(1.25));
}

#[tokio::test]
async fn cost_last_week_is_zero_without_readings_in_window() {
    let state = build_state(vec![
        before_now(3600, Decimal::new(2569, 4)),
        before_now(0, Decimal::from(3)),
    ]);

    let (status, body) = get(state, "/price-plans/cost-lastweek/smart-meter-id").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)[PLAN_1].as_f64(), Some(0.0));
}

#[tokio::test]
async fn cost_day_of_week_reports_today() {
    let state = build_state(vec![
        before_now(1800, Decimal::ONE),
        before_now(1, Decimal::ONE),
    ]);

    let (status, body) = get(state, "/price-plans/cost-dayofweek/smart-meter-id").await;
    assert_eq!(status, StatusCode::OK);

    let json = json(&body);
    // average 1 over 1799s at rate 10
    assert_eq!(json["consumptions"].as_f64(), Some(20.01));
    assert_eq!(json["pricePlanId"], PLAN_1);
    assert_eq!(json["day_of_week"], "WEDNESDAY");
}

#[tokio::test]
async fn cost_days_of_week_has_one_entry_per_elapsed_day() {
    let state = build_state(vec![
        before_now(1800, Decimal::ONE),
        before_now(0, Decimal::ONE),
    ]);

    let (status, body) = get(state, "/price-plans/cost-compare/daysofweek/smart-meter-id").await;
    assert_eq!(status, StatusCode::OK);

    let json = json(&body);
    assert_eq!(json.as_object().map(|o| o.len()), Some(3));
    assert_eq!(json["MONDAY"].as_f64(), Some(0.0));
    assert_eq!(json["TUESDAY"].as_f64(), Some(0.0));
    assert_eq!(json["WEDNESDAY"].as_f64(), Some(20.0));
    assert!(key_pos(&body, "MONDAY") < key_pos(&body, "TUESDAY"));
    assert!(key_pos(&body, "TUESDAY") < key_pos(&body, "WEDNESDAY"));
}

#[tokio::test]
async fn cost_days_of_week_per_plan_without_limit() {
    let state = build_state(vec![
        before_now(1800, Decimal::from(3)),
        before_now(0, Decimal::from(3)),
    ]);

    let (status, body) = get(
        state,
        "/price-plans/cost-compare/daysofweek-plans/smart-meter-id",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json = json(&body);
    assert_eq!(json.as_object().map(|o| o.len()), Some(3));
    assert_eq!(json["MONDAY"].as_object().map(|o| o.len()), Some(0));
    let today = &json["WEDNESDAY"];
    assert_eq!(today[PLAN_2].as_f64(), Some(6.0));
    assert_eq!(today[PLAN_3].as_f64(), Some(12.0));
    assert_eq!(today[PLAN_1].as_f64(), Some(60.0));
}

#[tokio::test]
async fn cost_days_of_week_per_plan_with_limit() {
    let readings = vec![
        before_now(1800, Decimal::from(35)),
        before_now(0, Decimal::from(3)),
    ];

    let (_, body) = get(
        build_state(readings.clone()),
        "/price-plans/cost-compare/daysofweek-plans/smart-meter-id?limit=1",
    )
    .await;
    let today = json(&body)["WEDNESDAY"].clone();
    assert_eq!(today.as_object().map(|o| o.len()), Some(1));
    assert_eq!(today[PLAN_2].as_f64(), Some(38.0));

    let (status, body) = get(
        build_state(readings),
        "/price-plans/cost-compare/daysofweek-plans/smart-meter-id?limit=0",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json(&body)["WEDNESDAY"].as_object().map(|o| o.len()),
        Some(0)
    );
}

#[tokio::test]
async fn stored_readings_feed_compare_all() {
    let state = build_state(vec![]);

    let payload = serde_json::json!({
        "smartMeterId": METER,
        "electricityReadings": [
            {"time": "2024-01-17T10:00:00Z", "reading": 15.0},
            {"time": "2024-01-17T11:00:00Z", "reading": 5.0}
        ]
    });
    let req = Request::builder()
        .method("POST")
        .uri("/readings/store")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, _) = send(state.clone(), req).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(state.clone(), "/readings/read/smart-meter-id").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body).as_array().map(Vec::len), Some(2));

    let (status, body) = get(state, "/price-plans/compare-all/smart-meter-id").await;
    assert_eq!(status, StatusCode::OK);
    let comparisons = &json(&body)["pricePlanComparisons"];
    assert_eq!(comparisons.as_object().map(|o| o.len()), Some(3));
    assert_eq!(comparisons[PLAN_1].as_f64(), Some(100.0));
}

#[tokio::test]
async fn store_rejects_empty_readings() {
    let req = Request::builder()
        .method("POST")
        .uri("/readings/store")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"smartMeterId":"smart-meter-id","electricityReadings":[]}"#,
        ))
        .unwrap();
    let (status, body) = send(build_state(vec![]), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["Message"].is_string());
}

/// One reading on Monday of last week and one earlier today: every window
/// holds a single instant, so no time elapses inside it.
fn single_reading_windows() -> Vec<Reading> {
    vec![
        before_now(9 * 86_400 + 12 * 3600, Decimal::from(4)),
        before_now(1800, Decimal::from(3)),
    ]
}

#[tokio::test]
async fn cost_last_week_is_zero_for_single_reading() {
    let (status, body) = get(
        build_state(single_reading_windows()),
        "/price-plans/cost-lastweek/smart-meter-id",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json = json(&body);
    assert_eq!(json.as_object().map(|o| o.len()), Some(1));
    assert_eq!(json[PLAN_1].as_f64(), Some(0.0));
}

#[tokio::test]
async fn cost_day_of_week_is_null_for_single_reading() {
    let (status, body) = get(
        build_state(single_reading_windows()),
        "/price-plans/cost-dayofweek/smart-meter-id",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json = json(&body);
    assert!(json["consumptions"].is_null());
    assert_eq!(json["pricePlanId"], PLAN_1);
    assert_eq!(json["day_of_week"], "WEDNESDAY");
}

#[tokio::test]
async fn cost_days_of_week_is_zero_for_single_reading() {
    let (status, body) = get(
        build_state(single_reading_windows()),
        "/price-plans/cost-compare/daysofweek/smart-meter-id",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json = json(&body);
    assert_eq!(json.as_object().map(|o| o.len()), Some(3));
    assert_eq!(json["WEDNESDAY"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn cost_days_of_week_per_plan_drops_plans_for_single_reading() {
    let (status, body) = get(
        build_state(single_reading_windows()),
        "/price-plans/cost-compare/daysofweek-plans/smart-meter-id",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json = json(&body);
    assert_eq!(json.as_object().map(|o| o.len()), Some(3));
    for day in ["MONDAY", "TUESDAY", "WEDNESDAY"] {
        assert_eq!(json[day].as_object().map(|o| o.len()), Some(0), "{day}");
    }
}
