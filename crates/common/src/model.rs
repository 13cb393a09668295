//! Price model artifact (`model.json`).
//!
//! Statistical snapshot produced by the offline training job: regression
//! coefficients for the log-linear price model plus the per-location and
//! citywide aggregates shown next to a prediction.
//!
//! The artifact is parsed into the typed schema below and validated once at
//! load time. A model that fails validation is never handed to the predictor,
//! so per-query code can index into it without re-checking anything.

mod error;
mod unique;
mod validate;

pub use self::error::ModelError;

use crate::types::ListingType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Training provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub trained_at: String,
    /// Rows used to fit the regression.
    pub training_rows: u64,
    pub r2: f64,
    /// RMSE of the fit in log-price space.
    pub rmse_log: f64,
    /// `exp(rmse_log)`; width of the multiplicative confidence band.
    pub approx_rmse_multiplier: f64,
    pub locations_in_model: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub intercept: f64,
    /// Log-price per additional bedroom.
    pub coef_bedrooms: f64,
    /// Log-price offset of a rental relative to a sale.
    pub coef_rent: f64,
    /// Log-price adjustment relative to the citywide baseline. A location
    /// without an entry uses the baseline.
    #[serde(deserialize_with = "unique::deserialize")]
    pub location_premiums: BTreeMap<String, f64>,
}

/// Historical price distribution for one location and listing type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBucket {
    pub count: u32,
    pub median: f64,
    pub q25: f64,
    pub q75: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub count: u32,
    pub median: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStats {
    pub name: String,
    pub slug: String,
    pub sale: Option<PriceBucket>,
    pub rent: Option<PriceBucket>,
    #[serde(default)]
    pub all: OverallStats,
}

impl LocationStats {
    pub fn bucket(&self, listing_type: ListingType) -> Option<&PriceBucket> {
        match listing_type {
            ListingType::Sale => self.sale.as_ref(),
            ListingType::Rent => self.rent.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BedroomStats {
    pub count: u32,
    pub median_sale: Option<f64>,
    pub median_rent: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub sale_min: f64,
    pub sale_max: f64,
    pub rent_min: f64,
    pub rent_max: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_listings: u64,
    pub total_sale: u64,
    pub total_rent: u64,
    pub median_sale_price: f64,
    pub median_rent_price: f64,
    pub avg_bedrooms: f64,
    pub price_range: PriceRange,
}

/// Tier boundaries keyed by tier label, e.g. `p25`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTiers {
    pub sale: BTreeMap<String, f64>,
    pub rent: BTreeMap<String, f64>,
}

impl PriceTiers {
    pub fn for_type(&self, listing_type: ListingType) -> &BTreeMap<String, f64> {
        match listing_type {
            ListingType::Sale => &self.sale,
            ListingType::Rent => &self.rent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopItem {
    pub slug: String,
    pub name: String,
    pub median: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopLists {
    pub affordable_sale: Vec<TopItem>,
    pub expensive_sale: Vec<TopItem>,
    pub affordable_rent: Vec<TopItem>,
    pub expensive_rent: Vec<TopItem>,
}

/// The whole artifact. Immutable once loaded; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceModel {
    pub meta: ModelMeta,
    pub regression: Regression,
    #[serde(deserialize_with = "unique::deserialize")]
    pub location_stats: BTreeMap<String, LocationStats>,
    #[serde(default)]
    pub bedroom_median_price: BTreeMap<String, f64>,
    #[serde(default)]
    pub bedroom_distribution: BTreeMap<String, BedroomStats>,
    #[serde(default)]
    pub global_stats: GlobalStats,
    #[serde(default)]
    pub price_tiers: PriceTiers,
    #[serde(default)]
    pub top_lists: TopLists,
}

impl PriceModel {
    /// Reads, parses and validates the artifact at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ModelError> {
        let model: PriceModel = serde_json::from_str(content)?;
        model.validate()?;
        Ok(model)
    }

    /// Checks every structural invariant the predictor relies on.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate::meta(&self.meta)?;
        validate::regression(&self.regression)?;
        for (key, stats) in &self.location_stats {
            validate::location(key, stats)?;
        }
        validate::tiers(ListingType::Sale, &self.price_tiers.sale)?;
        validate::tiers(ListingType::Rent, &self.price_tiers.rent)?;
        validate::descriptive(self)?;
        Ok(())
    }

    pub fn location(&self, slug: &str) -> Option<&LocationStats> {
        self.location_stats.get(slug)
    }

    pub fn locations(&self) -> impl Iterator<Item = &LocationStats> {
        self.location_stats.values()
    }

    pub fn bucket(&self, slug: &str, listing_type: ListingType) -> Option<&PriceBucket> {
        self.location(slug).and_then(|l| l.bucket(listing_type))
    }

    pub fn premium(&self, slug: &str) -> Option<f64> {
        self.regression.location_premiums.get(slug).copied()
    }
}

#[cfg(test)]
pub(crate) mod fixtures;
