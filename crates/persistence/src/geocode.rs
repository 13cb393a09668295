use crate::schema::geocoded_cache;
use chrono::{DateTime, Utc};
use common::types::GeocodedLocation;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = geocoded_cache)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GeocodeRow {
    pub location: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub strategy: Option<String>,
    pub geocoded_at: Option<DateTime<Utc>>,
}

impl From<GeocodeRow> for GeocodedLocation {
    fn from(row: GeocodeRow) -> Self {
        GeocodedLocation {
            location: row.location,
            lat: row.lat,
            lon: row.lon,
            strategy: row.strategy,
            geocoded_at: row.geocoded_at,
        }
    }
}

pub fn for_locations(
    conn: &mut PgConnection,
    locations: Vec<String>,
) -> QueryResult<Vec<GeocodeRow>> {
    geocoded_cache::table
        .filter(geocoded_cache::location.eq_any(locations))
        .select(GeocodeRow::as_select())
        .load(conn)
}
