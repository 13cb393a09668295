use crate::types::ListingType;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a model artifact is refused. All of them are fatal: no
/// prediction is served from a model that produced one of these.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("cannot read model artifact {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("approx_rmse_multiplier must be a finite number >= 1, got {0}")]
    MultiplierOutOfRange(f64),
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: String, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: f64 },
    #[error("location premium for {location} must be finite, got {value}")]
    NonFinitePremium { location: String, value: f64 },
    #[error("{location}/{listing_type}: a bucket without listings must be null")]
    EmptyBucket {
        location: String,
        listing_type: ListingType,
    },
    #[error("{location}/{listing_type}: expected min <= q25 <= median <= q75 <= max")]
    BucketOutOfOrder {
        location: String,
        listing_type: ListingType,
    },
    #[error("location_stats key {key} does not match its slug {slug}")]
    SlugMismatch { key: String, slug: String },
    #[error("price tier {tier} ({listing_type}) is below the preceding tier")]
    TierOutOfOrder {
        listing_type: ListingType,
        tier: String,
    },
}
