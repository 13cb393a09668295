//! ストアから取得した集計行を画面用に組み立てる

use crate::Result;
use crate::store::ListingStore;
use crate::types::{
    GeocodedLocation, HeroStats, ListingFilter, LocationSummary, LocationWithGeo, ScrapeRun,
};
use chrono::{Days, NaiveDate};
use std::collections::HashMap;

pub const DEFAULT_SUMMARY_LIMIT: i64 = 200;
pub const DEFAULT_FALLBACK_SOURCES: i64 = 4;

/// Keeps the rows dated like the first one. Rows are expected newest first.
pub fn latest_only(rows: Vec<LocationSummary>) -> Vec<LocationSummary> {
    let Some(latest) = rows.first().map(|r| r.summary_date) else {
        return rows;
    };
    rows.into_iter()
        .filter(|r| r.summary_date == latest)
        .collect()
}

pub fn join_geo(
    summaries: Vec<LocationSummary>,
    geocodes: &[GeocodedLocation],
) -> Vec<LocationWithGeo> {
    let by_location: HashMap<&str, &GeocodedLocation> = geocodes
        .iter()
        .map(|g| (g.location.as_str(), g))
        .collect();
    summaries
        .into_iter()
        .map(|summary| {
            let geo = by_location.get(summary.location.as_str());
            LocationWithGeo {
                lat: geo.and_then(|g| g.lat),
                lon: geo.and_then(|g| g.lon),
                summary,
            }
        })
        .collect()
}

/// Element at `len / 2` of the sorted values, so even counts take the upper one.
pub fn upper_median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    Some(values[values.len() / 2])
}

pub fn hero_stats(
    run: Option<&ScrapeRun>,
    summaries: &[LocationSummary],
    sources: Option<i64>,
    fallback_sources: i64,
) -> HeroStats {
    let total_listings = run
        .and_then(|r| r.listings_scraped)
        .map(i64::from)
        .unwrap_or_else(|| {
            summaries
                .iter()
                .map(|s| i64::from(s.listing_count.unwrap_or(0)))
                .sum()
        });
    let median_price = upper_median(summaries.iter().filter_map(|s| s.median_price).collect());
    let most_affordable = summaries
        .iter()
        .find(|s| s.affordability_rank == Some(1))
        .map(|s| s.location.clone());

    HeroStats {
        total_listings,
        median_price,
        most_affordable,
        last_updated: run.and_then(|r| r.completed_at),
        active_sources: sources.unwrap_or(fallback_sources),
    }
}

/// First day of a trend window of `days` days ending `today`.
pub fn trend_since(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

pub async fn latest_summaries(
    store: &dyn ListingStore,
    filter: ListingFilter,
    limit: i64,
) -> Result<Vec<LocationSummary>> {
    let rows = store.recent_summaries(filter, limit).await?;
    Ok(latest_only(rows))
}

pub async fn summaries_with_geo(
    store: &dyn ListingStore,
    filter: ListingFilter,
    limit: i64,
) -> Result<Vec<LocationWithGeo>> {
    let summaries = latest_summaries(store, filter, limit).await?;
    if summaries.is_empty() {
        return Ok(Vec::new());
    }
    let locations: Vec<String> = summaries.iter().map(|s| s.location.clone()).collect();
    let geocodes = store.geocodes(&locations).await?;
    Ok(join_geo(summaries, &geocodes))
}

pub async fn load_hero_stats(
    store: &dyn ListingStore,
    limit: i64,
    fallback_sources: i64,
) -> Result<HeroStats> {
    let run = store.latest_run().await?;
    let summaries = latest_summaries(store, ListingFilter::Both, limit).await?;
    // 掲載元の数が取れなくても画面は出す
    let sources = store.count_distinct_sources().await.ok().flatten();
    Ok(hero_stats(
        run.as_ref(),
        &summaries,
        sources,
        fallback_sources,
    ))
}

#[cfg(test)]
mod tests;
