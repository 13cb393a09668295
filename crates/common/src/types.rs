pub mod listing_type;
pub mod query;
pub mod records;

pub use self::listing_type::{ListingFilter, ListingType, ParseListingTypeError};
pub use self::query::{ListingPage, ListingQuery, Page};
pub use self::records::{
    GeocodedLocation, HeroStats, Listing, LocationSummary, LocationWithGeo, ParseScrapeStatusError,
    ScrapeRun, ScrapeStatus, SummaryRow,
};
