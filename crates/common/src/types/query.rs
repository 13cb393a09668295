use super::{Listing, ListingType};
use serde::{Deserialize, Serialize};

/// Zero-based page of fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub index: u32,
    pub size: u32,
}

impl Page {
    pub const DEFAULT_SIZE: u32 = 20;

    pub fn new(index: u32, size: u32) -> Self {
        Self { index, size }
    }

    pub fn first(size: u32) -> Self {
        Self::new(0, size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.index) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(Self::DEFAULT_SIZE)
    }
}

/// Optional filters for browsing listings. Unset fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Case-insensitive substring of the location name.
    pub location: Option<String>,
    pub listing_type: Option<ListingType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub bedrooms: Option<i32>,
    #[serde(default)]
    pub page: Page,
}

impl ListingQuery {
    /// Drops filters that would not narrow anything: empty location text and
    /// zero bounds or bedrooms.
    pub fn normalized(mut self) -> Self {
        self.location = self
            .location
            .map(|l| l.trim().to_owned())
            .filter(|l| !l.is_empty());
        self.min_price = self.min_price.filter(|v| *v > 0.0);
        self.max_price = self.max_price.filter(|v| *v > 0.0);
        self.bedrooms = self.bedrooms.filter(|v| *v != 0);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPage {
    pub listings: Vec<Listing>,
    /// Matching rows across all pages.
    pub count: i64,
}
