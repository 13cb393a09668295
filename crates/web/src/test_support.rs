use crate::{AppState, Settings};
use chrono::{NaiveDate, Utc};
use common::model::PriceModel;
use common::store::memory::MemoryStore;
use common::types::{
    GeocodedLocation, Listing, ListingFilter, ListingType, LocationSummary, ScrapeRun,
    ScrapeStatus,
};
use std::sync::Arc;
use uuid::Uuid;

pub const MODEL_JSON: &str = include_str!("../../../model/model.json");

pub fn model() -> Arc<PriceModel> {
    Arc::new(PriceModel::from_json_str(MODEL_JSON).unwrap())
}

pub fn state(store: MemoryStore) -> Arc<AppState> {
    Arc::new(AppState {
        model: model(),
        store: Arc::new(store),
        settings: Settings::default(),
    })
}

pub fn summary(
    location: &str,
    date: NaiveDate,
    filter: ListingFilter,
    median: f64,
    per_bedroom: f64,
    rank: i32,
) -> LocationSummary {
    LocationSummary {
        id: Uuid::new_v4(),
        location: location.to_string(),
        summary_date: date,
        listing_type: filter,
        avg_price: Some(median * 1.1),
        median_price: Some(median),
        avg_price_per_bedroom: Some(per_bedroom),
        median_price_per_bedroom: Some(per_bedroom),
        affordability_rank: Some(rank),
        listing_count: Some(10 + rank),
        median_bedrooms: Some(2.0),
    }
}

pub fn listing(location: &str, listing_type: ListingType, price: f64, deal: bool) -> Listing {
    Listing {
        id: Uuid::new_v4(),
        scrape_run_id: None,
        source: "buyrentkenya".to_string(),
        listing_type,
        title: Some(format!("Apartment in {location}")),
        price_kes: Some(price),
        location: Some(location.to_string()),
        bedrooms: Some(2),
        bathrooms: Some(2),
        size_sqm: None,
        property_type: Some("Apartment".to_string()),
        url: None,
        scraped_at: Some(Utc::now()),
        price_per_bedroom: Some(price / 2.0),
        price_per_sqm: None,
        is_deal: deal,
    }
}

/// 今日と昨日の集計、成功した実行 1 件、座標 1 件
pub fn populated_store() -> MemoryStore {
    let today = Utc::now().date_naive();
    let yesterday = today.pred_opt().unwrap();
    MemoryStore {
        runs: vec![ScrapeRun {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed_at: Some(Utc::now()),
            listings_scraped: Some(1157),
            status: ScrapeStatus::Success,
            error_msg: None,
        }],
        summaries: vec![
            summary("Kilimani", yesterday, ListingFilter::Both, 13_000_000.0, 6_000_000.0, 1),
            summary("Kilimani", today, ListingFilter::Both, 14_500_000.0, 6_500_000.0, 2),
            summary("Ruaka", today, ListingFilter::Both, 6_800_000.0, 3_000_000.0, 1),
            summary("Ruaka", today, ListingFilter::Sale, 6_800_000.0, 1_500_000.0, 1),
            summary("Kilimani", today, ListingFilter::Sale, 14_500_000.0, 1_700_000.0, 2),
            summary("Karen", today, ListingFilter::Sale, 48_000_000.0, 9_000_000.0, 3),
            summary("Ruaka", today, ListingFilter::Rent, 25_000.0, 12_000.0, 1),
            summary("Kilimani", today, ListingFilter::Rent, 33_000.0, 16_000.0, 2),
            summary("Karen", today, ListingFilter::Rent, 250_000.0, 80_000.0, 3),
        ],
        listings: vec![
            listing("Kilimani", ListingType::Sale, 12_000_000.0, true),
            listing("Kilimani, Nairobi", ListingType::Rent, 90_000.0, false),
            listing("Westlands", ListingType::Sale, 25_000_000.0, true),
        ],
        geocodes: vec![GeocodedLocation {
            location: "Kilimani".to_string(),
            lat: Some(-1.2921),
            lon: Some(36.7856),
            strategy: Some("nominatim".to_string()),
            geocoded_at: None,
        }],
        sources: Some(5),
        unavailable: false,
    }
}

pub fn broken_store() -> MemoryStore {
    MemoryStore {
        unavailable: true,
        ..MemoryStore::default()
    }
}
