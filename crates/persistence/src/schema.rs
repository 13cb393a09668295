// Tables are written by the scraping pipeline; this workspace only reads them.

diesel::table! {
    scrape_runs (id) {
        id -> Uuid,
        started_at -> Timestamptz,
        completed_at -> Nullable<Timestamptz>,
        listings_scraped -> Nullable<Int4>,
        status -> Varchar,
        error_msg -> Nullable<Text>,
    }
}

diesel::table! {
    listings (id) {
        id -> Uuid,
        scrape_run_id -> Nullable<Uuid>,
        source -> Varchar,
        listing_type -> Varchar,
        title -> Nullable<Text>,
        price_kes -> Nullable<Float8>,
        location -> Nullable<Varchar>,
        bedrooms -> Nullable<Int4>,
        bathrooms -> Nullable<Int4>,
        size_sqm -> Nullable<Float8>,
        property_type -> Nullable<Varchar>,
        url -> Nullable<Text>,
        scraped_at -> Nullable<Timestamptz>,
        price_per_bedroom -> Nullable<Float8>,
        price_per_sqm -> Nullable<Float8>,
        is_deal -> Bool,
    }
}

diesel::table! {
    location_summary (id) {
        id -> Uuid,
        location -> Varchar,
        summary_date -> Date,
        listing_type -> Varchar,
        avg_price -> Nullable<Float8>,
        median_price -> Nullable<Float8>,
        avg_price_per_bedroom -> Nullable<Float8>,
        median_price_per_bedroom -> Nullable<Float8>,
        affordability_rank -> Nullable<Int4>,
        listing_count -> Nullable<Int4>,
        median_bedrooms -> Nullable<Float8>,
    }
}

diesel::table! {
    geocoded_cache (location) {
        location -> Varchar,
        lat -> Nullable<Float8>,
        lon -> Nullable<Float8>,
        strategy -> Nullable<Varchar>,
        geocoded_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(listings -> scrape_runs (scrape_run_id));

diesel::allow_tables_to_appear_in_same_query!(
    geocoded_cache,
    listings,
    location_summary,
    scrape_runs,
);
