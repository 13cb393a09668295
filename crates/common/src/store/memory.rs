//! テスト用のインメモリ実装。Postgres 実装と同じ並び順・絞り込みを再現する。

use super::ListingStore;
use crate::Result;
use crate::types::{
    GeocodedLocation, Listing, ListingFilter, ListingPage, ListingQuery, LocationSummary, Page,
    ScrapeRun, ScrapeStatus,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub runs: Vec<ScrapeRun>,
    pub summaries: Vec<LocationSummary>,
    pub listings: Vec<Listing>,
    pub geocodes: Vec<GeocodedLocation>,
    pub sources: Option<i64>,
    /// 全操作を失敗させる
    pub unavailable: bool,
}

impl MemoryStore {
    fn check(&self) -> Result<()> {
        if self.unavailable {
            return Err(anyhow!("store unavailable"));
        }
        Ok(())
    }
}

// DESC NULLS LAST
fn newest_first<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ASC NULLS LAST
fn ascending<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn paged<T>(rows: Vec<T>, page: Page) -> Vec<T> {
    rows.into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn latest_run(&self) -> Result<Option<ScrapeRun>> {
        self.check()?;
        let mut runs: Vec<_> = self
            .runs
            .iter()
            .filter(|r| r.status == ScrapeStatus::Success)
            .cloned()
            .collect();
        runs.sort_by(|a, b| newest_first(&a.completed_at, &b.completed_at));
        Ok(runs.into_iter().next())
    }

    async fn recent_summaries(
        &self,
        filter: ListingFilter,
        limit: i64,
    ) -> Result<Vec<LocationSummary>> {
        self.check()?;
        let mut rows: Vec<_> = self
            .summaries
            .iter()
            .filter(|s| s.listing_type == filter)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.summary_date
                .cmp(&a.summary_date)
                .then_with(|| ascending(&a.affordability_rank, &b.affordability_rank))
        });
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn location_trend(
        &self,
        location: &str,
        filter: ListingFilter,
        since: NaiveDate,
    ) -> Result<Vec<LocationSummary>> {
        self.check()?;
        let mut rows: Vec<_> = self
            .summaries
            .iter()
            .filter(|s| s.location == location && s.listing_type == filter)
            .filter(|s| s.summary_date >= since)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.summary_date);
        Ok(rows)
    }

    async fn deals(&self, page: Page) -> Result<Vec<Listing>> {
        self.check()?;
        let mut rows: Vec<_> = self.listings.iter().filter(|l| l.is_deal).cloned().collect();
        rows.sort_by(|a, b| newest_first(&a.scraped_at, &b.scraped_at));
        Ok(paged(rows, page))
    }

    async fn listings(&self, query: &ListingQuery) -> Result<ListingPage> {
        self.check()?;
        let query = query.clone().normalized();
        let needle = query.location.as_deref().map(str::to_lowercase);
        let mut rows: Vec<_> = self
            .listings
            .iter()
            .filter(|l| match &needle {
                Some(n) => l
                    .location
                    .as_deref()
                    .is_some_and(|loc| loc.to_lowercase().contains(n)),
                None => true,
            })
            .filter(|l| query.listing_type.is_none_or(|t| l.listing_type == t))
            .filter(|l| {
                query
                    .min_price
                    .is_none_or(|min| l.price_kes.is_some_and(|p| p >= min))
            })
            .filter(|l| {
                query
                    .max_price
                    .is_none_or(|max| l.price_kes.is_some_and(|p| p <= max))
            })
            .filter(|l| query.bedrooms.is_none_or(|b| l.bedrooms == Some(b)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| newest_first(&a.scraped_at, &b.scraped_at));
        let count = rows.len() as i64;
        Ok(ListingPage {
            listings: paged(rows, query.page),
            count,
        })
    }

    async fn geocodes(&self, locations: &[String]) -> Result<Vec<GeocodedLocation>> {
        self.check()?;
        Ok(self
            .geocodes
            .iter()
            .filter(|g| locations.contains(&g.location))
            .cloned()
            .collect())
    }

    async fn count_distinct_sources(&self) -> Result<Option<i64>> {
        self.check()?;
        Ok(self.sources)
    }
}
