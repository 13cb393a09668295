//! Price prediction.
//!
//! Evaluates the log-linear regression stored in a [`PriceModel`]:
//!
//! ```text
//! ln(price) = intercept + coef_bedrooms * bedrooms + coef_rent * is_rent + premium[location]
//! ```
//!
//! The band around the estimate is multiplicative, `predicted / m ..= predicted * m`
//! with `m = exp(rmse_log)`, which is symmetric in log space.
//!
//! Every function here is total over a validated model: an unknown location
//! falls back to the citywide baseline and is reported through
//! [`Confidence::Low`] rather than an error.

use crate::model::PriceModel;
use crate::types::ListingType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bucket size from which a modelled location earns [`Confidence::High`].
pub const MIN_CONFIDENT_COUNT: u32 = 10;

/// Comparable locations returned alongside a prediction by default.
pub const DEFAULT_COMPARABLES: usize = 5;

/// Largest bedroom count a request may ask about. Far above any listing in
/// the market and far below where `exp` of the log price overflows.
pub const MAX_BEDROOMS: u32 = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceQueryError {
    #[error("bedrooms must be at most {max}, got {0}", max = MAX_BEDROOMS)]
    TooManyBedrooms(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// `enough_data` is irrelevant once the location has no premium: without
    /// one the location's own history does not feed the estimate.
    pub fn classify(in_model: bool, enough_data: bool) -> Self {
        match (in_model, enough_data) {
            (true, true) => Confidence::High,
            (true, false) => Confidence::Medium,
            (false, _) => Confidence::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Rounded to whole currency units.
    pub predicted: f64,
    pub low: f64,
    pub high: f64,
    pub confidence: Confidence,
    /// Whether the location has its own premium in the regression.
    pub in_model: bool,
}

/// One prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuery {
    pub location: String,
    pub bedrooms: u32,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
}

impl PriceQuery {
    /// Bounds checks for user input. [`predict`] itself accepts anything.
    pub fn validate(&self) -> Result<(), PriceQueryError> {
        if self.bedrooms > MAX_BEDROOMS {
            return Err(PriceQueryError::TooManyBedrooms(self.bedrooms));
        }
        Ok(())
    }

    pub fn predict(&self, model: &PriceModel) -> PredictionResult {
        predict(model, &self.location, self.bedrooms, self.listing_type)
    }
}

fn log_price(model: &PriceModel, location_id: &str, bedrooms: u32, listing_type: ListingType) -> f64 {
    let r = &model.regression;
    let is_rent = if listing_type.is_rent() { 1.0 } else { 0.0 };
    let premium = model.premium(location_id).unwrap_or(0.0);
    r.intercept + r.coef_bedrooms * f64::from(bedrooms) + r.coef_rent * is_rent + premium
}

pub fn predict(
    model: &PriceModel,
    location_id: &str,
    bedrooms: u32,
    listing_type: ListingType,
) -> PredictionResult {
    let in_model = model.premium(location_id).is_some();

    // predicted を先に丸め、low/high は丸めた値から求める
    let predicted = log_price(model, location_id, bedrooms, listing_type)
        .exp()
        .round();
    let multiplier = model.meta.approx_rmse_multiplier;
    let low = (predicted / multiplier).round();
    let high = (predicted * multiplier).round();

    let count = model
        .bucket(location_id, listing_type)
        .map_or(0, |b| b.count);
    let confidence = Confidence::classify(in_model, count >= MIN_CONFIDENT_COUNT);

    PredictionResult {
        predicted,
        low,
        high,
        confidence,
        in_model,
    }
}

/// Human-readable decomposition of a prediction, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionFactors {
    /// `None` when the location uses the citywide baseline.
    pub location_premium_pct: Option<f64>,
    /// Uplift over a studio with the same other inputs.
    pub bedroom_uplift_pct: f64,
    /// `None` for sales.
    pub rent_adjustment_pct: Option<f64>,
    pub r2_pct: f64,
}

pub fn explain(
    model: &PriceModel,
    location_id: &str,
    bedrooms: u32,
    listing_type: ListingType,
) -> PredictionFactors {
    let r = &model.regression;
    PredictionFactors {
        location_premium_pct: model.premium(location_id).map(|p| p * 100.0),
        bedroom_uplift_pct: ((r.coef_bedrooms * f64::from(bedrooms)).exp() - 1.0) * 100.0,
        rent_adjustment_pct: listing_type.is_rent().then(|| r.coef_rent * 100.0),
        r2_pct: model.meta.r2 * 100.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparable {
    pub slug: String,
    pub name: String,
    pub median: f64,
}

/// Other locations whose historical median for `listing_type` is closest to
/// `predicted`, nearest first.
pub fn comparables(
    model: &PriceModel,
    location_id: &str,
    listing_type: ListingType,
    predicted: f64,
    limit: usize,
) -> Vec<Comparable> {
    let mut candidates: Vec<(f64, Comparable)> = model
        .locations()
        .filter(|l| l.slug != location_id)
        .filter_map(|l| {
            let bucket = l.bucket(listing_type)?;
            let distance = (bucket.median - predicted).abs();
            Some((
                distance,
                Comparable {
                    slug: l.slug.clone(),
                    name: l.name.clone(),
                    median: bucket.median,
                },
            ))
        })
        .collect();

    candidates.sort_by(|(da, a), (db, b)| {
        da.total_cmp(db).then_with(|| a.slug.cmp(&b.slug))
    });
    candidates
        .into_iter()
        .take(limit)
        .map(|(_, c)| c)
        .collect()
}
