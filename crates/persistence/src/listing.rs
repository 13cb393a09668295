use crate::schema::listings;
use chrono::{DateTime, Utc};
use common::types::{Listing, ListingQuery, Page, ParseListingTypeError};
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ListingRow {
    pub id: Uuid,
    pub scrape_run_id: Option<Uuid>,
    pub source: String,
    pub listing_type: String,
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

impl TryFrom<ListingRow> for Listing {
    type Error = ParseListingTypeError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        Ok(Listing {
            id: row.id,
            scrape_run_id: row.scrape_run_id,
            source: row.source,
            listing_type: row.listing_type.parse()?,
            title: row.title,
            price_kes: row.price_kes,
            location: row.location,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            size_sqm: row.size_sqm,
            property_type: row.property_type,
            url: row.url,
            scraped_at: row.scraped_at,
            price_per_bedroom: row.price_per_bedroom,
            price_per_sqm: row.price_per_sqm,
            is_deal: row.is_deal,
        })
    }
}

/// 絞り込み条件だけを適用したクエリ。件数取得とページ取得で共有する
fn filtered(query: &ListingQuery) -> listings::BoxedQuery<'static, Pg> {
    let mut q = listings::table.into_boxed();
    if let Some(location) = &query.location {
        q = q.filter(listings::location.ilike(format!("%{location}%")));
    }
    if let Some(listing_type) = query.listing_type {
        q = q.filter(listings::listing_type.eq(listing_type.as_str()));
    }
    if let Some(min) = query.min_price {
        q = q.filter(listings::price_kes.ge(min));
    }
    if let Some(max) = query.max_price {
        q = q.filter(listings::price_kes.le(max));
    }
    if let Some(bedrooms) = query.bedrooms {
        q = q.filter(listings::bedrooms.eq(bedrooms));
    }
    q
}

/// 条件に合う物件を新しい順に 1 ページ分と、全体の件数
pub fn search(
    conn: &mut PgConnection,
    query: &ListingQuery,
) -> QueryResult<(Vec<ListingRow>, i64)> {
    let query = query.clone().normalized();
    let count = filtered(&query).count().get_result(conn)?;
    let rows = filtered(&query)
        .order(listings::scraped_at.desc().nulls_last())
        .offset(query.page.offset())
        .limit(query.page.limit())
        .load(conn)?;
    Ok((rows, count))
}

pub fn deals(conn: &mut PgConnection, page: Page) -> QueryResult<Vec<ListingRow>> {
    listings::table
        .filter(listings::is_deal.eq(true))
        .order(listings::scraped_at.desc().nulls_last())
        .offset(page.offset())
        .limit(page.limit())
        .select(ListingRow::as_select())
        .load(conn)
}

#[allow(deprecated)]
pub fn count_distinct_sources(conn: &mut PgConnection) -> QueryResult<i64> {
    listings::table
        .select(diesel::dsl::count_distinct(listings::source))
        .get_result(conn)
}

#[cfg(test)]
mod tests;
