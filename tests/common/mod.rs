//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rust_decimal::Decimal;
use tower::util::ServiceExt;

use tariff_compare::api::{AppState, router};
use tariff_compare::domain::{PricePlan, PricePlanCatalog, Reading};
use tariff_compare::pricing::{Calendar, FixedClock};
use tariff_compare::store::{AccountDirectory, ReadingStore};

pub const METER: &str = "smart-meter-id";
pub const PLAN_1: &str = "test-supplier";
pub const PLAN_2: &str = "best-supplier";
pub const PLAN_3: &str = "second-best-supplier";

/// Reference instant for every test: Wednesday 2024-01-17 12:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 17, 12, 0, 0).unwrap()
}

/// A reading `secs` seconds before [`now`].
pub fn before_now(secs: i64, value: Decimal) -> Reading {
    Reading::new(now() - TimeDelta::seconds(secs), value)
}

/// Three plans with unit rates 10, 1 and 2, in that catalog order.
pub fn catalog() -> PricePlanCatalog {
    PricePlanCatalog::new(vec![
        PricePlan::new(PLAN_1, "Test Supplier", Decimal::TEN),
        PricePlan::new(PLAN_2, "Best Supplier", Decimal::ONE),
        PricePlan::new(PLAN_3, "Second Best Supplier", Decimal::TWO),
    ])
}

/// API state with [`METER`] subscribed to [`PLAN_1`] and holding `readings`.
pub fn build_state(readings: Vec<Reading>) -> Arc<AppState> {
    let accounts: AccountDirectory = [(METER.to_string(), PLAN_1.to_string())]
        .into_iter()
        .collect();
    let store = ReadingStore::new();
    if !readings.is_empty() {
        store.store(METER, readings);
    }

    Arc::new(AppState::new(
        Arc::new(catalog()),
        Arc::new(accounts),
        Arc::new(store),
        Calendar::utc(),
        Arc::new(FixedClock::new(now())),
    ))
}

/// Sends `req` through a fresh router and returns status and raw body.
pub async fn send(state: Arc<AppState>, req: Request<Body>) -> (StatusCode, String) {
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// `GET uri` against a fresh router.
pub async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(state, req).await
}
