use anyhow::Context;
use common::model::PriceModel;
use common::prediction::{
    self, Comparable, DEFAULT_COMPARABLES, PredictionFactors, PredictionResult, PriceQuery,
};
use common::types::ListingType;
use logging::{DEFAULT, error, info, o};
use persistence::PgStore;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use web::{AppState, Settings};

/// モデルの読み込みに失敗したら待ち受けを始める前に終了する
pub fn load_model(path: &Path) -> anyhow::Result<PriceModel> {
    let log = DEFAULT.new(o!(
        "function" => "load_model",
        "path" => path.display().to_string(),
    ));
    match PriceModel::load(path) {
        Ok(model) => {
            info!(log, "model loaded";
                "locations" => model.location_stats.len(),
                "training_rows" => model.meta.training_rows,
            );
            Ok(model)
        }
        Err(e) => {
            error!(log, "invalid model"; "error" => %e);
            Err(e).with_context(|| format!("Failed to load model from {}", path.display()))
        }
    }
}

pub async fn serve(model: PriceModel, addr: &str) -> anyhow::Result<()> {
    let pool = persistence::connection_pool::from_config()?;
    let settings = Settings::from_config()?;
    let state = Arc::new(AppState {
        model: Arc::new(model),
        store: Arc::new(PgStore::new(pool)),
        settings,
    });
    web::serve(addr, state).await
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictReport {
    pub location: String,
    pub bedrooms: u32,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    #[serde(flatten)]
    pub result: PredictionResult,
    pub factors: PredictionFactors,
    pub comparables: Vec<Comparable>,
}

pub fn predict(
    model: &PriceModel,
    location: &str,
    bedrooms: u32,
    listing_type: ListingType,
) -> anyhow::Result<PredictReport> {
    let query = PriceQuery {
        location: location.to_owned(),
        bedrooms,
        listing_type,
    };
    query.validate()?;
    let result = query.predict(model);
    Ok(PredictReport {
        location: location.to_owned(),
        bedrooms,
        listing_type,
        factors: prediction::explain(model, location, bedrooms, listing_type),
        comparables: prediction::comparables(
            model,
            location,
            listing_type,
            result.predicted,
            DEFAULT_COMPARABLES,
        ),
        result,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelReport {
    pub locations: usize,
    pub premiums: usize,
    pub sale_buckets: usize,
    pub rent_buckets: usize,
    pub training_rows: u64,
    pub r2: f64,
}

pub fn describe(model: &PriceModel) -> ModelReport {
    let count = |t: ListingType| model.locations().filter(|l| l.bucket(t).is_some()).count();
    ModelReport {
        locations: model.location_stats.len(),
        premiums: model.regression.location_premiums.len(),
        sale_buckets: count(ListingType::Sale),
        rent_buckets: count(ListingType::Rent),
        training_rows: model.meta.training_rows,
        r2: model.meta.r2,
    }
}

#[cfg(test)]
mod tests;
