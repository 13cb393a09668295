//! 予算・投資利回りの計算 API

use crate::{AppState, error::ApiError};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use common::affordability::{
    self, AffordabilityReport, BudgetMode, DEFAULT_BEDROOMS, DEFAULT_DOWN_PCT,
    DEFAULT_OPERATING_PCT, DEFAULT_TENURE_YEARS, DEFAULT_VACANCY_PCT, InvestmentInputs,
    InvestmentReport,
};
use common::market;
use common::types::{ListingFilter, SummaryRow};
use logging::{DEFAULT, debug, error, o};
use serde::Deserialize;
use std::sync::Arc;

pub fn add_route(app: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    app.route("/api/affordability", get(affordability))
        .route("/api/invest", get(invest))
}

#[derive(Debug, Deserialize)]
pub(crate) struct AffordabilityParams {
    pub mode: Option<String>,
    pub income: f64,
    pub down: Option<f64>,
    pub tenure: Option<f64>,
    pub bedrooms: Option<f64>,
}

impl AffordabilityParams {
    fn budget_mode(&self) -> Result<BudgetMode, ApiError> {
        match self.mode.as_deref().unwrap_or("buy") {
            "rent" => Ok(BudgetMode::Rent),
            "buy" => Ok(BudgetMode::Buy {
                down_pct: self.down.unwrap_or(DEFAULT_DOWN_PCT),
                tenure_years: self.tenure.unwrap_or(DEFAULT_TENURE_YEARS),
                bedrooms: self.bedrooms.unwrap_or(DEFAULT_BEDROOMS),
            }),
            other => Err(ApiError::bad_request(format!("unknown mode: {other}"))),
        }
    }
}

pub(crate) async fn affordability(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AffordabilityParams>, QueryRejection>,
) -> Result<Json<AffordabilityReport>, ApiError> {
    let log = DEFAULT.new(o!("function" => "affordability"));
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let mode = params.budget_mode()?;

    // 賃貸は賃料の集計、購入は売買の集計と比べる
    let filter = match mode {
        BudgetMode::Rent => ListingFilter::Rent,
        BudgetMode::Buy { .. } => ListingFilter::Sale,
    };
    let rows = market::latest_summaries(state.store.as_ref(), filter, state.settings.summary_limit)
        .await
        .map_err(|e| {
            error!(log, "failed to fetch summaries"; "error" => %e);
            ApiError::internal("Failed to fetch summaries")
        })?;
    let rows: Vec<SummaryRow> = rows.iter().map(SummaryRow::from).collect();

    let report = affordability::assess(&mode, params.income, &rows)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    debug!(log, "assessed";
        "budget" => report.budget,
        "affordable" => report.affordable.len(),
        "stretch" => report.stretch.len(),
    );
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvestParams {
    pub purchase_price: f64,
    pub monthly_rent: f64,
    pub vacancy: Option<f64>,
    pub operating: Option<f64>,
}

pub(crate) async fn invest(
    params: Result<Query<InvestParams>, QueryRejection>,
) -> Result<Json<InvestmentReport>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let inputs = InvestmentInputs {
        purchase_price: params.purchase_price,
        monthly_rent: params.monthly_rent,
        vacancy_pct: params.vacancy.unwrap_or(DEFAULT_VACANCY_PCT),
        operating_pct: params.operating.unwrap_or(DEFAULT_OPERATING_PCT),
    };
    let report = inputs
        .evaluate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(Json(report))
}
