use super::*;
use crate::store::ListingStore;
use crate::store::memory::MemoryStore;
use crate::types::{Listing, ListingQuery, ListingType, Page, ScrapeStatus};
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
}

fn summary(
    location: &str,
    day: u32,
    filter: ListingFilter,
    median: Option<f64>,
    rank: Option<i32>,
    count: Option<i32>,
) -> LocationSummary {
    LocationSummary {
        id: Uuid::new_v4(),
        location: location.to_owned(),
        summary_date: date(day),
        listing_type: filter,
        avg_price: median,
        median_price: median,
        avg_price_per_bedroom: median.map(|m| m / 2.0),
        median_price_per_bedroom: median.map(|m| m / 2.0),
        affordability_rank: rank,
        listing_count: count,
        median_bedrooms: Some(2.0),
    }
}

fn run(status: ScrapeStatus, completed: Option<DateTime<Utc>>, scraped: Option<i32>) -> ScrapeRun {
    ScrapeRun {
        id: Uuid::new_v4(),
        started_at: at(1, 0),
        completed_at: completed,
        listings_scraped: scraped,
        status,
        error_msg: None,
    }
}

fn listing(location: &str, listing_type: ListingType, price: f64, deal: bool, day: u32) -> Listing {
    Listing {
        id: Uuid::new_v4(),
        scrape_run_id: None,
        source: "buyrentkenya".to_owned(),
        listing_type,
        title: Some(format!("{location} apartment")),
        price_kes: Some(price),
        location: Some(location.to_owned()),
        bedrooms: Some(2),
        bathrooms: Some(1),
        size_sqm: None,
        property_type: Some("Apartment".to_owned()),
        url: None,
        scraped_at: Some(at(day, 12)),
        price_per_bedroom: Some(price / 2.0),
        price_per_sqm: None,
        is_deal: deal,
    }
}

fn locations(rows: &[LocationSummary]) -> Vec<&str> {
    rows.iter().map(|r| r.location.as_str()).collect()
}

// ==================== 純粋関数 ====================

#[test]
fn test_latest_only_keeps_first_date() {
    let rows = vec![
        summary("kilimani", 10, ListingFilter::Both, Some(1.0), Some(1), None),
        summary("westlands", 10, ListingFilter::Both, Some(2.0), Some(2), None),
        summary("kilimani", 9, ListingFilter::Both, Some(1.0), Some(1), None),
    ];
    let latest = latest_only(rows);
    assert_eq!(locations(&latest), vec!["kilimani", "westlands"]);
}

#[test]
fn test_latest_only_empty() {
    assert!(latest_only(Vec::new()).is_empty());
}

#[test]
fn test_join_geo_fills_missing_with_none() {
    let summaries = vec![
        summary("kilimani", 10, ListingFilter::Both, None, None, None),
        summary("ruaka", 10, ListingFilter::Both, None, None, None),
    ];
    let geocodes = vec![GeocodedLocation {
        location: "kilimani".to_owned(),
        lat: Some(-1.29),
        lon: Some(36.78),
        strategy: Some("nominatim".to_owned()),
        geocoded_at: None,
    }];
    let joined = join_geo(summaries, &geocodes);
    assert_eq!(joined[0].lat, Some(-1.29));
    assert_eq!(joined[0].lon, Some(36.78));
    assert_eq!(joined[1].summary.location, "ruaka");
    assert_eq!(joined[1].lat, None);
}

#[test]
fn test_join_geo_serializes_flat() {
    let joined = join_geo(
        vec![summary("kilimani", 10, ListingFilter::Sale, Some(5.0), Some(1), Some(3))],
        &[],
    );
    let json = serde_json::to_value(&joined[0]).unwrap();
    assert_eq!(json["location"], "kilimani");
    assert_eq!(json["listing_type"], "Sale");
    assert!(json["lat"].is_null());
}

#[test]
fn test_upper_median() {
    assert_eq!(upper_median(vec![]), None);
    assert_eq!(upper_median(vec![3.0]), Some(3.0));
    assert_eq!(upper_median(vec![4.0, 1.0, 3.0, 2.0]), Some(3.0));
    assert_eq!(upper_median(vec![5.0, 1.0, 3.0]), Some(3.0));
}

#[test]
fn test_hero_stats_with_run() {
    let summaries = vec![
        summary("westlands", 10, ListingFilter::Both, Some(200.0), Some(2), Some(5)),
        summary("ruaka", 10, ListingFilter::Both, Some(100.0), Some(1), Some(7)),
        summary("karen", 10, ListingFilter::Both, None, Some(3), None),
    ];
    let latest = run(ScrapeStatus::Success, Some(at(10, 6)), Some(1234));
    let stats = hero_stats(Some(&latest), &summaries, Some(6), DEFAULT_FALLBACK_SOURCES);
    assert_eq!(stats.total_listings, 1234);
    assert_eq!(stats.median_price, Some(200.0));
    assert_eq!(stats.most_affordable.as_deref(), Some("ruaka"));
    assert_eq!(stats.last_updated, Some(at(10, 6)));
    assert_eq!(stats.active_sources, 6);
}

#[test]
fn test_hero_stats_fallbacks() {
    let summaries = vec![
        summary("westlands", 10, ListingFilter::Both, Some(200.0), Some(2), Some(5)),
        summary("kilimani", 10, ListingFilter::Both, Some(150.0), None, Some(7)),
    ];
    let stats = hero_stats(None, &summaries, None, DEFAULT_FALLBACK_SOURCES);
    // 実行記録が無ければ件数は集計の合計
    assert_eq!(stats.total_listings, 12);
    assert_eq!(stats.most_affordable, None);
    assert_eq!(stats.last_updated, None);
    assert_eq!(stats.active_sources, 4);
}

#[test]
fn test_hero_stats_empty() {
    let stats = hero_stats(None, &[], None, 4);
    assert_eq!(stats.total_listings, 0);
    assert_eq!(stats.median_price, None);
}

#[test]
fn test_trend_since() {
    assert_eq!(trend_since(date(31), 30), date(1));
    assert_eq!(trend_since(date(10), 0), date(10));
}

// ==================== ストア経由 ====================

fn store() -> MemoryStore {
    MemoryStore {
        runs: vec![
            run(ScrapeStatus::Success, Some(at(9, 6)), Some(900)),
            run(ScrapeStatus::Success, Some(at(10, 6)), None),
            run(ScrapeStatus::Error, Some(at(11, 6)), Some(5)),
        ],
        summaries: vec![
            summary("kilimani", 9, ListingFilter::Both, Some(90.0), Some(1), Some(3)),
            summary("westlands", 10, ListingFilter::Both, Some(300.0), Some(2), Some(4)),
            summary("kilimani", 10, ListingFilter::Both, Some(100.0), Some(1), Some(6)),
            summary("kilimani", 10, ListingFilter::Rent, Some(80.0), Some(1), Some(2)),
        ],
        geocodes: vec![GeocodedLocation {
            location: "westlands".to_owned(),
            lat: Some(-1.26),
            lon: Some(36.81),
            strategy: None,
            geocoded_at: None,
        }],
        sources: None,
        ..MemoryStore::default()
    }
}

#[tokio::test]
async fn test_latest_summaries_orders_by_rank_on_latest_date() {
    let store = store();
    let rows = latest_summaries(&store, ListingFilter::Both, DEFAULT_SUMMARY_LIMIT)
        .await
        .unwrap();
    assert_eq!(locations(&rows), vec!["kilimani", "westlands"]);
    assert!(rows.iter().all(|r| r.summary_date == date(10)));

    let rent = latest_summaries(&store, ListingFilter::Rent, DEFAULT_SUMMARY_LIMIT)
        .await
        .unwrap();
    assert_eq!(rent.len(), 1);
    assert_eq!(rent[0].median_price, Some(80.0));
}

#[tokio::test]
async fn test_latest_summaries_empty_store() {
    let store = MemoryStore::default();
    let rows = latest_summaries(&store, ListingFilter::Sale, 10).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_summaries_with_geo() {
    let store = store();
    let rows = summaries_with_geo(&store, ListingFilter::Both, DEFAULT_SUMMARY_LIMIT)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].lat, None);
    assert_eq!(rows[1].summary.location, "westlands");
    assert_eq!(rows[1].lat, Some(-1.26));
}

#[tokio::test]
async fn test_load_hero_stats_uses_latest_successful_run() {
    let store = store();
    let stats = load_hero_stats(&store, DEFAULT_SUMMARY_LIMIT, DEFAULT_FALLBACK_SOURCES)
        .await
        .unwrap();
    // 最新の成功 run は listings_scraped が無いので集計の合計 6 + 4
    assert_eq!(stats.total_listings, 10);
    assert_eq!(stats.last_updated, Some(at(10, 6)));
    assert_eq!(stats.median_price, Some(300.0));
    assert_eq!(stats.most_affordable.as_deref(), Some("kilimani"));
    assert_eq!(stats.active_sources, DEFAULT_FALLBACK_SOURCES);
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let store = MemoryStore {
        unavailable: true,
        ..store()
    };
    assert!(latest_summaries(&store, ListingFilter::Both, 10).await.is_err());
    assert!(load_hero_stats(&store, 10, 4).await.is_err());
}

#[tokio::test]
async fn test_memory_store_listing_filters() {
    let store = MemoryStore {
        listings: vec![
            listing("Kilimani, Nairobi", ListingType::Sale, 12_000_000.0, false, 1),
            listing("Kilimani", ListingType::Rent, 90_000.0, true, 3),
            listing("Westlands", ListingType::Sale, 25_000_000.0, true, 2),
        ],
        ..MemoryStore::default()
    };

    let query = ListingQuery {
        location: Some(" kili ".to_owned()),
        ..ListingQuery::default()
    };
    let found = store.listings(&query).await.unwrap();
    assert_eq!(found.count, 2);
    // 新しい順
    assert_eq!(found.listings[0].listing_type, ListingType::Rent);

    let query = ListingQuery {
        min_price: Some(10_000_000.0),
        max_price: Some(20_000_000.0),
        ..ListingQuery::default()
    };
    let found = store.listings(&query).await.unwrap();
    assert_eq!(found.count, 1);

    let query = ListingQuery {
        page: Page::new(1, 2),
        ..ListingQuery::default()
    };
    let found = store.listings(&query).await.unwrap();
    assert_eq!(found.count, 3);
    assert_eq!(found.listings.len(), 1);

    let deals = store.deals(Page::first(20)).await.unwrap();
    assert_eq!(deals.len(), 2);
    assert_eq!(deals[0].location.as_deref(), Some("Kilimani"));
}
