//! REST API for price plan comparison and recommendation.
//!
//! Provides the `/price-plans/...` comparison endpoints and the
//! `/readings/...` endpoints for storing and reading meter readings.

mod error;
mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

pub use error::ApiError;
pub use types::{
    CompareAllResponse, DayOfWeekCostResponse, LimitQuery, MessageResponse, StoreReadingsRequest,
};

use crate::domain::PricePlanCatalog;
use crate::pricing::{Calendar, Clock, PricePlanComparator};
use crate::store::{AccountDirectory, ReadingStore};

/// Application state shared across all request handlers.
///
/// The catalog and account directory are immutable; the reading store
/// synchronises its own writes.
pub struct AppState {
    /// Meter id → subscribed plan id.
    pub accounts: Arc<AccountDirectory>,
    /// Reading history, written by `POST /readings/store`.
    pub readings: Arc<ReadingStore>,
    /// Cost aggregation over the shared store and catalog.
    pub comparator: PricePlanComparator,
    /// Reference instant for the "as of now" views.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        catalog: Arc<PricePlanCatalog>,
        accounts: Arc<AccountDirectory>,
        readings: Arc<ReadingStore>,
        calendar: Calendar,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let comparator = PricePlanComparator::new(Arc::clone(&readings), catalog, calendar);
        Self {
            accounts,
            readings,
            comparator,
            clock,
        }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/price-plans/compare-all/{meter_id}",
            get(handlers::compare_all),
        )
        .route("/price-plans/recommend/{meter_id}", get(handlers::recommend))
        .route(
            "/price-plans/cost-lastweek/{meter_id}",
            get(handlers::cost_last_week),
        )
        .route(
            "/price-plans/cost-dayofweek/{meter_id}",
            get(handlers::cost_day_of_week),
        )
        .route(
            "/price-plans/cost-compare/daysofweek/{meter_id}",
            get(handlers::cost_days_of_week),
        )
        .route(
            "/price-plans/cost-compare/daysofweek-plans/{meter_id}",
            get(handlers::cost_days_of_week_per_plan),
        )
        .route("/readings/store", post(handlers::store_readings))
        .route("/readings/read/{meter_id}", get(handlers::read_readings))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
