use crate::connection_pool::Client;
use crate::{Result, geocode, listing, location_summary, scrape_run};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use common::store::ListingStore;
use common::types::{
    GeocodedLocation, Listing, ListingFilter, ListingPage, ListingQuery, LocationSummary, Page,
    ScrapeRun,
};
use deadpool_diesel::postgres::Pool;
use diesel::PgConnection;
use logging::*;

/// Postgres 上の [`ListingStore`]
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<Client> {
        self.pool
            .get()
            .await
            .map_err(|e| anyhow!("Failed to get connection: {}", e))
    }

    async fn interact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut PgConnection) -> diesel::QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn().await?;
        let result = conn
            .interact(f)
            .await
            .map_err(|e| anyhow!("Failed to interact with database: {}", e))?;
        Ok(result?)
    }
}

#[async_trait]
impl ListingStore for PgStore {
    async fn latest_run(&self) -> Result<Option<ScrapeRun>> {
        let log = DEFAULT.new(o!("function" => "PgStore::latest_run"));
        trace!(log, "start");

        let row = self
            .interact(scrape_run::latest_success)
            .await
            .context("Failed to get latest scrape run")?;
        let run = row.map(ScrapeRun::try_from).transpose()?;

        trace!(log, "finish"; "found" => run.is_some());
        Ok(run)
    }

    async fn recent_summaries(
        &self,
        filter: ListingFilter,
        limit: i64,
    ) -> Result<Vec<LocationSummary>> {
        let log = DEFAULT.new(o!(
            "function" => "PgStore::recent_summaries",
            "listing_type" => filter.as_str(),
            "limit" => limit,
        ));
        trace!(log, "start");

        let rows = self
            .interact(move |conn| location_summary::recent(conn, filter.as_str(), limit))
            .await
            .context("Failed to get location summaries")?;
        let summaries = rows
            .into_iter()
            .map(LocationSummary::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        trace!(log, "finish"; "count" => summaries.len());
        Ok(summaries)
    }

    async fn location_trend(
        &self,
        location: &str,
        filter: ListingFilter,
        since: NaiveDate,
    ) -> Result<Vec<LocationSummary>> {
        let log = DEFAULT.new(o!(
            "function" => "PgStore::location_trend",
            "location" => location.to_owned(),
            "listing_type" => filter.as_str(),
            "since" => format!("{}", since),
        ));
        trace!(log, "start");

        let location = location.to_owned();
        let rows = self
            .interact(move |conn| location_summary::trend(conn, &location, filter.as_str(), since))
            .await
            .context("Failed to get location trend")?;
        let summaries = rows
            .into_iter()
            .map(LocationSummary::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        trace!(log, "finish"; "count" => summaries.len());
        Ok(summaries)
    }

    async fn deals(&self, page: Page) -> Result<Vec<Listing>> {
        let log = DEFAULT.new(o!(
            "function" => "PgStore::deals",
            "page" => page.index,
            "size" => page.size,
        ));
        trace!(log, "start");

        let rows = self
            .interact(move |conn| listing::deals(conn, page))
            .await
            .context("Failed to get deals")?;
        let deals = rows
            .into_iter()
            .map(Listing::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        trace!(log, "finish"; "count" => deals.len());
        Ok(deals)
    }

    async fn listings(&self, query: &ListingQuery) -> Result<ListingPage> {
        let log = DEFAULT.new(o!(
            "function" => "PgStore::listings",
            "query" => format!("{:?}", query),
        ));
        trace!(log, "start");

        let query = query.clone();
        let (rows, count) = self
            .interact(move |conn| listing::search(conn, &query))
            .await
            .context("Failed to search listings")?;
        let listings = rows
            .into_iter()
            .map(Listing::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        trace!(log, "finish"; "count" => count, "returned" => listings.len());
        Ok(ListingPage { listings, count })
    }

    async fn geocodes(&self, locations: &[String]) -> Result<Vec<GeocodedLocation>> {
        let log = DEFAULT.new(o!(
            "function" => "PgStore::geocodes",
            "locations" => locations.len(),
        ));
        trace!(log, "start");

        if locations.is_empty() {
            return Ok(Vec::new());
        }
        let locations = locations.to_vec();
        let rows = self
            .interact(move |conn| geocode::for_locations(conn, locations))
            .await
            .context("Failed to get geocodes")?;

        trace!(log, "finish"; "count" => rows.len());
        Ok(rows.into_iter().map(GeocodedLocation::from).collect())
    }

    async fn count_distinct_sources(&self) -> Result<Option<i64>> {
        let log = DEFAULT.new(o!("function" => "PgStore::count_distinct_sources"));
        trace!(log, "start");

        let count = self
            .interact(listing::count_distinct_sources)
            .await
            .context("Failed to count listing sources")?;

        trace!(log, "finish"; "count" => count);
        Ok(Some(count))
    }
}
