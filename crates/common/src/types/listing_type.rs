use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown listing type: {0}")]
pub struct ParseListingTypeError(pub String);

/// Whether a listing is offered for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ListingType {
    Sale,
    Rent,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Sale => "Sale",
            ListingType::Rent => "Rent",
        }
    }

    pub fn is_rent(&self) -> bool {
        matches!(self, ListingType::Rent)
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = ParseListingTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sale" | "sale" => Ok(ListingType::Sale),
            "Rent" | "rent" => Ok(ListingType::Rent),
            other => Err(ParseListingTypeError(other.to_owned())),
        }
    }
}

/// Listing-type selector used by the summary tables.
///
/// `Both` is stored as its own aggregate row set, it is not the union of
/// the `Sale` and `Rent` rows.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ListingFilter {
    Sale,
    Rent,
    #[default]
    Both,
}

impl ListingFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingFilter::Sale => "Sale",
            ListingFilter::Rent => "Rent",
            ListingFilter::Both => "Both",
        }
    }

    /// Accepts only the three known spellings, anything else (or nothing)
    /// selects `Both`.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for ListingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingFilter {
    type Err = ParseListingTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sale" => Ok(ListingFilter::Sale),
            "Rent" => Ok(ListingFilter::Rent),
            "Both" => Ok(ListingFilter::Both),
            other => Err(ParseListingTypeError(other.to_owned())),
        }
    }
}

impl From<ListingType> for ListingFilter {
    fn from(value: ListingType) -> Self {
        match value {
            ListingType::Sale => ListingFilter::Sale,
            ListingType::Rent => ListingFilter::Rent,
        }
    }
}
