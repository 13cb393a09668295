use crate::{AppState, error::ApiError};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use common::types::{Listing, ListingPage, ListingQuery, ListingType, Page};
use logging::{DEFAULT, error, o, trace};
use serde::Deserialize;
use std::sync::Arc;

const MAX_PAGE_SIZE: u32 = 100;

pub fn add_route(app: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    app.route("/api/deals", get(deals))
        .route("/api/listings", get(listings))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DealsParams {
    pub page: Option<u32>,
}

pub(crate) async fn deals(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DealsParams>, QueryRejection>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let page = Page::new(params.page.unwrap_or(0), state.settings.deals_page_size);
    let log = DEFAULT.new(o!(
        "function" => "deals",
        "page" => page.index,
    ));

    let deals = state.store.deals(page).await.map_err(|e| {
        error!(log, "failed to fetch deals"; "error" => %e);
        ApiError::internal("Failed to fetch deals")
    })?;
    trace!(log, "finish"; "count" => deals.len());
    Ok(Json(deals))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingsParams {
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub bedrooms: Option<i32>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListingsParams {
    fn into_query(self) -> Result<ListingQuery, ApiError> {
        let listing_type = self
            .listing_type
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<ListingType>())
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        let size = self
            .page_size
            .unwrap_or(Page::DEFAULT_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Ok(ListingQuery {
            location: self.location,
            listing_type,
            min_price: self.min_price,
            max_price: self.max_price,
            bedrooms: self.bedrooms,
            page: Page::new(self.page.unwrap_or(0), size),
        }
        .normalized())
    }
}

pub(crate) async fn listings(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListingsParams>, QueryRejection>,
) -> Result<Json<ListingPage>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let query = params.into_query()?;
    let log = DEFAULT.new(o!(
        "function" => "listings",
        "query" => format!("{:?}", query),
    ));

    let page = state.store.listings(&query).await.map_err(|e| {
        error!(log, "failed to fetch listings"; "error" => %e);
        ApiError::internal("Failed to fetch listings")
    })?;
    trace!(log, "finish"; "count" => page.count);
    Ok(Json(page))
}
