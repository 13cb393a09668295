use crate::schema::location_summary;
use chrono::NaiveDate;
use common::types::{LocationSummary, ParseListingTypeError};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = location_summary)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LocationSummaryRow {
    pub id: Uuid,
    pub location: String,
    pub summary_date: NaiveDate,
    pub listing_type: String,
    pub avg_price: Option<f64>,
    pub median_price: Option<f64>,
    pub avg_price_per_bedroom: Option<f64>,
    pub median_price_per_bedroom: Option<f64>,
    pub affordability_rank: Option<i32>,
    pub listing_count: Option<i32>,
    pub median_bedrooms: Option<f64>,
}

impl TryFrom<LocationSummaryRow> for LocationSummary {
    type Error = ParseListingTypeError;

    fn try_from(row: LocationSummaryRow) -> Result<Self, Self::Error> {
        Ok(LocationSummary {
            id: row.id,
            location: row.location,
            summary_date: row.summary_date,
            listing_type: row.listing_type.parse()?,
            avg_price: row.avg_price,
            median_price: row.median_price,
            avg_price_per_bedroom: row.avg_price_per_bedroom,
            median_price_per_bedroom: row.median_price_per_bedroom,
            affordability_rank: row.affordability_rank,
            listing_count: row.listing_count,
            median_bedrooms: row.median_bedrooms,
        })
    }
}

/// 集計日の新しい順、同日内は順位順
pub fn recent(
    conn: &mut PgConnection,
    listing_type: &str,
    limit: i64,
) -> QueryResult<Vec<LocationSummaryRow>> {
    location_summary::table
        .filter(location_summary::listing_type.eq(listing_type))
        .order((
            location_summary::summary_date.desc(),
            location_summary::affordability_rank.asc(),
        ))
        .limit(limit)
        .select(LocationSummaryRow::as_select())
        .load(conn)
}

pub fn trend(
    conn: &mut PgConnection,
    location: &str,
    listing_type: &str,
    since: NaiveDate,
) -> QueryResult<Vec<LocationSummaryRow>> {
    location_summary::table
        .filter(location_summary::location.eq(location))
        .filter(location_summary::listing_type.eq(listing_type))
        .filter(location_summary::summary_date.ge(since))
        .order(location_summary::summary_date.asc())
        .select(LocationSummaryRow::as_select())
        .load(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::ListingFilter;

    fn row(listing_type: &str) -> LocationSummaryRow {
        LocationSummaryRow {
            id: Uuid::new_v4(),
            location: "Kilimani".to_string(),
            summary_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            listing_type: listing_type.to_string(),
            avg_price: Some(15_000_000.0),
            median_price: Some(14_000_000.0),
            avg_price_per_bedroom: Some(6_000_000.0),
            median_price_per_bedroom: None,
            affordability_rank: Some(3),
            listing_count: Some(42),
            median_bedrooms: Some(2.0),
        }
    }

    #[test]
    fn test_row_into_record() {
        let summary = LocationSummary::try_from(row("Both")).unwrap();
        assert_eq!(summary.listing_type, ListingFilter::Both);
        assert_eq!(summary.affordability_rank, Some(3));
        assert_eq!(summary.median_price_per_bedroom, None);
    }

    #[test]
    fn test_unknown_listing_type_is_rejected() {
        assert!(LocationSummary::try_from(row("Lease")).is_err());
    }
}
