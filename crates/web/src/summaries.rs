//! ライブ集計データの API

use crate::{AppState, error::ApiError};
use axum::extract::{Path, Query, State};
use axum::http::header::{CACHE_CONTROL, X_CONTENT_TYPE_OPTIONS};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use common::market;
use common::types::{HeroStats, ListingFilter, LocationSummary, LocationWithGeo, SummaryRow};
use logging::{DEFAULT, error, o, trace};
use serde::Deserialize;
use std::sync::Arc;

pub fn add_route(app: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    app.route("/api/summaries", get(summaries))
        .route("/api/map", get(map))
        .route("/api/hero", get(hero))
        .route("/api/locations/{location}/trend", get(trend))
}

/// `type` は Sale / Rent / Both のみ受け付け、それ以外は Both として扱う
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TypeParams {
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
}

impl TypeParams {
    fn filter(&self) -> ListingFilter {
        ListingFilter::parse_lenient(self.listing_type.as_deref())
    }
}

pub(crate) async fn summaries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TypeParams>,
) -> Response {
    let filter = params.filter();
    let log = DEFAULT.new(o!(
        "function" => "summaries",
        "listing_type" => filter.as_str(),
    ));
    trace!(log, "start");

    match market::latest_summaries(state.store.as_ref(), filter, state.settings.summary_limit).await
    {
        Ok(rows) => {
            let rows: Vec<SummaryRow> = rows.iter().map(SummaryRow::from).collect();
            trace!(log, "finish"; "count" => rows.len());
            (
                [
                    (CACHE_CONTROL, state.settings.cache_control()),
                    (X_CONTENT_TYPE_OPTIONS, "nosniff".to_owned()),
                ],
                Json(rows),
            )
                .into_response()
        }
        Err(e) => {
            error!(log, "failed to fetch summaries"; "error" => %e);
            ApiError::internal("Failed to fetch summaries").into_response()
        }
    }
}

pub(crate) async fn map(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TypeParams>,
) -> Result<Json<Vec<LocationWithGeo>>, ApiError> {
    let filter = params.filter();
    let log = DEFAULT.new(o!(
        "function" => "map",
        "listing_type" => filter.as_str(),
    ));

    let rows = market::summaries_with_geo(state.store.as_ref(), filter, state.settings.summary_limit)
        .await
        .map_err(|e| {
            error!(log, "failed to fetch map data"; "error" => %e);
            ApiError::internal("Failed to fetch map data")
        })?;
    trace!(log, "finish"; "count" => rows.len());
    Ok(Json(rows))
}

pub(crate) async fn hero(State(state): State<Arc<AppState>>) -> Result<Json<HeroStats>, ApiError> {
    let log = DEFAULT.new(o!("function" => "hero"));

    let stats = market::load_hero_stats(
        state.store.as_ref(),
        state.settings.summary_limit,
        state.settings.fallback_active_sources,
    )
    .await
    .map_err(|e| {
        error!(log, "failed to fetch hero stats"; "error" => %e);
        ApiError::internal("Failed to fetch stats")
    })?;
    Ok(Json(stats))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TrendParams {
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    pub days: Option<u32>,
}

pub(crate) async fn trend(
    State(state): State<Arc<AppState>>,
    Path(location): Path<String>,
    Query(params): Query<TrendParams>,
) -> Result<Json<Vec<LocationSummary>>, ApiError> {
    let filter = ListingFilter::parse_lenient(params.listing_type.as_deref());
    let days = params.days.unwrap_or(state.settings.trend_days);
    let since = market::trend_since(Utc::now().date_naive(), days);
    let log = DEFAULT.new(o!(
        "function" => "trend",
        "location" => location.clone(),
        "listing_type" => filter.as_str(),
        "since" => format!("{}", since),
    ));

    let rows = state
        .store
        .location_trend(&location, filter, since)
        .await
        .map_err(|e| {
            error!(log, "failed to fetch trend"; "error" => %e);
            ApiError::internal("Failed to fetch trend")
        })?;
    trace!(log, "finish"; "count" => rows.len());
    Ok(Json(rows))
}
