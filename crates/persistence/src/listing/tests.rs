use super::*;
use common::types::ListingType;

fn sql(query: &ListingQuery) -> String {
    diesel::debug_query::<Pg, _>(&filtered(query)).to_string()
}

fn row(listing_type: &str) -> ListingRow {
    ListingRow {
        id: Uuid::new_v4(),
        scrape_run_id: None,
        source: "property24".to_string(),
        listing_type: listing_type.to_string(),
        title: Some("2 bedroom apartment".to_string()),
        price_kes: Some(12_500_000.0),
        location: Some("Kilimani, Nairobi".to_string()),
        bedrooms: Some(2),
        bathrooms: Some(2),
        size_sqm: Some(110.0),
        property_type: Some("Apartment".to_string()),
        url: None,
        scraped_at: None,
        price_per_bedroom: Some(6_250_000.0),
        price_per_sqm: None,
        is_deal: true,
    }
}

#[test]
fn test_row_into_record() {
    let listing = Listing::try_from(row("Sale")).unwrap();
    assert_eq!(listing.listing_type, ListingType::Sale);
    assert_eq!(listing.bedrooms, Some(2));
    assert!(listing.is_deal);
}

#[test]
fn test_row_with_bad_type_is_rejected() {
    let err = Listing::try_from(row("Auction")).unwrap_err();
    assert_eq!(err.0, "Auction");
}

#[test]
fn test_no_filters() {
    let sql = sql(&ListingQuery::default());
    assert!(!sql.contains("WHERE"), "{sql}");
}

#[test]
fn test_all_filters() {
    let query = ListingQuery {
        location: Some("kili".to_string()),
        listing_type: Some(ListingType::Rent),
        min_price: Some(50_000.0),
        max_price: Some(120_000.0),
        bedrooms: Some(2),
        ..ListingQuery::default()
    };
    let sql = sql(&query);
    assert!(sql.contains("ILIKE"), "{sql}");
    assert!(sql.contains("%kili%"), "{sql}");
    assert!(sql.contains(">="), "{sql}");
    assert!(sql.contains("<="), "{sql}");
    assert!(sql.contains("\"bedrooms\" ="), "{sql}");
}
