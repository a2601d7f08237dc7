//! Request handlers for the API endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Datelike;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::AppState;
use super::error::ApiError;
use super::types::{CompareAllResponse, DayOfWeekCostResponse, LimitQuery, StoreReadingsRequest};
use crate::domain::{DayOfWeek, Reading};
use crate::pricing::{CostError, PlanCosts};

/// Resolves the meter's subscribed plan or fails with `UnknownMeter`.
fn subscribed_plan<'a>(state: &'a AppState, meter_id: &str) -> Result<&'a str, ApiError> {
    state.accounts.price_plan_id(meter_id).ok_or_else(|| {
        warn!(meter_id, "unknown smart meter");
        ApiError::UnknownMeter(meter_id.to_string())
    })
}

/// Cost of the meter's whole history under every plan.
///
/// `GET /price-plans/compare-all/{meter_id}` → 200 + `CompareAllResponse`
/// Unknown meter → 400, no usable readings → 404
pub async fn compare_all(
    State(state): State<Arc<AppState>>,
    Path(meter_id): Path<String>,
) -> Result<Json<CompareAllResponse>, ApiError> {
    let plan_id = subscribed_plan(&state, &meter_id)?;
    let costs = state.comparator.cost_for_each_plan(&meter_id)?;

    Ok(Json(CompareAllResponse {
        price_plan_id: plan_id.to_string(),
        price_plan_comparisons: costs,
    }))
}

/// Plans ranked cheapest first.
///
/// `GET /price-plans/recommend/{meter_id}` → every plan
/// `GET /price-plans/recommend/{meter_id}?limit=N` → the N cheapest
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Path(meter_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<PlanCosts>, ApiError> {
    subscribed_plan(&state, &meter_id)?;
    let ranked = state.comparator.recommend(&meter_id, query.limit)?;
    Ok(Json(ranked))
}

/// Previous calendar week's cost under the subscribed plan.
///
/// `GET /price-plans/cost-lastweek/{meter_id}` → `{planId: cost}`, with
/// cost 0 when the week has no usable readings
pub async fn cost_last_week(
    State(state): State<Arc<AppState>>,
    Path(meter_id): Path<String>,
) -> Result<Json<PlanCosts>, ApiError> {
    let plan_id = subscribed_plan(&state, &meter_id)?;
    let now = state.clock.now();
    let cost = CostError::or_fallback(
        state.comparator.cost_last_week(&meter_id, plan_id, now),
        Decimal::ZERO,
    )?;

    let mut body = PlanCosts::new();
    body.push(plan_id, cost);
    Ok(Json(body))
}

/// Today's cost so far under the subscribed plan.
///
/// `GET /price-plans/cost-dayofweek/{meter_id}` → 200 +
/// `DayOfWeekCostResponse`; `consumptions` is `null` when today has no
/// usable readings yet
pub async fn cost_day_of_week(
    State(state): State<Arc<AppState>>,
    Path(meter_id): Path<String>,
) -> Result<Json<DayOfWeekCostResponse>, ApiError> {
    let plan_id = subscribed_plan(&state, &meter_id)?;
    let now = state.clock.now();
    let consumptions = CostError::or_fallback(
        state.comparator.cost_today(&meter_id, plan_id, now).map(Some),
        None,
    )?;
    let today = state.comparator.calendar().date_of(now).weekday();
    debug!(%meter_id, plan_id, ?consumptions, "cost today");

    Ok(Json(DayOfWeekCostResponse {
        consumptions,
        price_plan_id: plan_id.to_string(),
        day_of_week: DayOfWeek::from(today),
    }))
}

/// Per-day cost under the subscribed plan, Monday through today.
///
/// `GET /price-plans/cost-compare/daysofweek/{meter_id}` →
/// `{"MONDAY": cost, ...}`, zero for days without usable readings
pub async fn cost_days_of_week(
    State(state): State<Arc<AppState>>,
    Path(meter_id): Path<String>,
) -> Result<Json<BTreeMap<DayOfWeek, Decimal>>, ApiError> {
    let plan_id = subscribed_plan(&state, &meter_id)?;
    let now = state.clock.now();
    let by_day = state
        .comparator
        .cost_days_of_week(&meter_id, plan_id, now)?;
    Ok(Json(by_day))
}

/// Per-day cost under every plan, Monday through today.
///
/// `GET /price-plans/cost-compare/daysofweek-plans/{meter_id}?limit=N` →
/// `{"MONDAY": {planId: cost}, ...}`, each day ranked cheapest first
pub async fn cost_days_of_week_per_plan(
    State(state): State<Arc<AppState>>,
    Path(meter_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<BTreeMap<DayOfWeek, PlanCosts>>, ApiError> {
    subscribed_plan(&state, &meter_id)?;
    let now = state.clock.now();
    let by_day = state
        .comparator
        .cost_days_of_week_per_plan(&meter_id, now, query.limit);
    Ok(Json(by_day))
}

/// Appends readings to a meter's history.
///
/// `POST /readings/store` → 200, or 400 + `{"Message": ...}` when the
/// meter id is blank, the list is empty or a reading is negative
pub async fn store_readings(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StoreReadingsRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate().map_err(ApiError::BadRequest)?;

    let count = request.electricity_readings.len();
    state
        .readings
        .store(&request.smart_meter_id, request.electricity_readings);
    info!(meter_id = %request.smart_meter_id, readings = count, "stored readings");

    Ok(StatusCode::OK)
}

/// Returns a meter's stored readings.
///
/// `GET /readings/read/{meter_id}` → 200 + `Vec<Reading>`, or 404 when
/// the meter has none
pub async fn read_readings(
    State(state): State<Arc<AppState>>,
    Path(meter_id): Path<String>,
) -> Result<Json<Vec<Reading>>, ApiError> {
    let readings = state.readings.readings(&meter_id);
    if readings.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(readings))
}
