//! Rows of the live listing store as the rest of the workspace sees them.

use super::{ListingFilter, ListingType};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scrape status: {0}")]
pub struct ParseScrapeStatusError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    Running,
    Success,
    Error,
}

impl ScrapeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeStatus::Running => "running",
            ScrapeStatus::Success => "success",
            ScrapeStatus::Error => "error",
        }
    }
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrapeStatus {
    type Err = ParseScrapeStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(ScrapeStatus::Running),
            "success" => Ok(ScrapeStatus::Success),
            "error" => Ok(ScrapeStatus::Error),
            other => Err(ParseScrapeStatusError(other.to_owned())),
        }
    }
}

/// One execution of the upstream scraping pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeRun {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub listings_scraped: Option<i32>,
    pub status: ScrapeStatus,
    pub error_msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub scrape_run_id: Option<Uuid>,
    pub source: String,
    pub listing_type: ListingType,
    pub title: Option<String>,
    pub price_kes: Option<f64>,
    pub location: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub size_sqm: Option<f64>,
    pub property_type: Option<String>,
    pub url: Option<String>,
    pub scraped_at: Option<DateTime<Utc>>,
    pub price_per_bedroom: Option<f64>,
    pub price_per_sqm: Option<f64>,
    pub is_deal: bool,
}

/// Daily per-location aggregate produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub id: Uuid,
    pub location: String,
    pub summary_date: NaiveDate,
    pub listing_type: ListingFilter,
    pub avg_price: Option<f64>,
    pub median_price: Option<f64>,
    pub avg_price_per_bedroom: Option<f64>,
    pub median_price_per_bedroom: Option<f64>,
    pub affordability_rank: Option<i32>,
    pub listing_count: Option<i32>,
    pub median_bedrooms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub location: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub strategy: Option<String>,
    pub geocoded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationWithGeo {
    #[serde(flatten)]
    pub summary: LocationSummary,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Public projection of a [`LocationSummary`] served over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub location: String,
    pub avg_price: Option<f64>,
    pub avg_price_per_bedroom: Option<f64>,
    pub median_price: Option<f64>,
    pub listing_count: Option<i32>,
    pub affordability_rank: Option<i32>,
    pub median_bedrooms: Option<f64>,
}

impl From<&LocationSummary> for SummaryRow {
    fn from(s: &LocationSummary) -> Self {
        Self {
            location: s.location.clone(),
            avg_price: s.avg_price,
            avg_price_per_bedroom: s.avg_price_per_bedroom,
            median_price: s.median_price,
            listing_count: s.listing_count,
            affordability_rank: s.affordability_rank,
            median_bedrooms: s.median_bedrooms,
        }
    }
}

/// Headline numbers for the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroStats {
    pub total_listings: i64,
    pub median_price: Option<f64>,
    pub most_affordable: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub active_sources: i64,
}
