//! 価格予測 API。モデルだけを使い、ストアには触れない

use crate::{AppState, error::ApiError};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use common::model::{GlobalStats, ModelMeta};
use common::prediction::{
    self, Comparable, DEFAULT_COMPARABLES, PredictionFactors, PredictionResult, PriceQuery,
};
use logging::{DEFAULT, debug, info, o};
use serde::Serialize;
use std::sync::Arc;

pub fn add_route(app: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    app.route("/api/predict", get(predict))
        .route("/api/model", get(model_summary))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PredictResponse {
    pub result: PredictionResult,
    pub factors: PredictionFactors,
    pub comparables: Vec<Comparable>,
}

pub(crate) async fn predict(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let log = DEFAULT.new(o!("function" => "predict"));

    let Query(query) = query.map_err(|e| {
        debug!(log, "rejected query"; "error" => %e);
        ApiError::bad_request(e.body_text())
    })?;
    query.validate().map_err(|e| {
        debug!(log, "rejected query"; "error" => %e);
        ApiError::bad_request(e.to_string())
    })?;

    let model = state.model.as_ref();
    let result = query.predict(model);
    let factors = prediction::explain(model, &query.location, query.bedrooms, query.listing_type);
    let comparables = prediction::comparables(
        model,
        &query.location,
        query.listing_type,
        result.predicted,
        DEFAULT_COMPARABLES,
    );
    info!(log, "predicted";
        "location" => query.location.as_str(),
        "bedrooms" => query.bedrooms,
        "listing_type" => query.listing_type.as_str(),
        "predicted" => result.predicted,
        "confidence" => ?result.confidence,
    );

    Ok(Json(PredictResponse {
        result,
        factors,
        comparables,
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ModelSummary {
    pub meta: ModelMeta,
    pub global_stats: GlobalStats,
    pub locations: usize,
}

pub(crate) async fn model_summary(State(state): State<Arc<AppState>>) -> Json<ModelSummary> {
    let model = state.model.as_ref();
    Json(ModelSummary {
        meta: model.meta.clone(),
        global_stats: model.global_stats,
        locations: model.location_stats.len(),
    })
}
