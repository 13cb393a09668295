//! Small synthetic models shared by the unit tests of this crate.

use super::*;

pub(crate) fn bucket(count: u32, median: f64) -> PriceBucket {
    PriceBucket {
        count,
        median,
        q25: median * 0.8,
        q75: median * 1.2,
        min: median * 0.5,
        max: median * 2.0,
    }
}

pub(crate) fn location(slug: &str, sale: Option<PriceBucket>, rent: Option<PriceBucket>) -> LocationStats {
    let count = sale.map_or(0, |b| b.count) + rent.map_or(0, |b| b.count);
    LocationStats {
        name: crate::format::title_case(slug),
        slug: slug.to_owned(),
        sale,
        rent,
        all: OverallStats {
            count,
            median: sale.or(rent).map(|b| b.median),
        },
    }
}

/// intercept=15.0, coef_bedrooms=0.1, coef_rent=-2.0, kilimani premium 0.2,
/// multiplier 1.3.
pub(crate) fn sample_model() -> PriceModel {
    let mut location_stats = BTreeMap::new();
    location_stats.insert(
        "kilimani".to_owned(),
        location(
            "kilimani",
            Some(bucket(25, 14_000_000.0)),
            Some(bucket(9, 85_000.0)),
        ),
    );
    location_stats.insert(
        "westlands".to_owned(),
        location(
            "westlands",
            Some(bucket(40, 22_000_000.0)),
            Some(bucket(10, 150_000.0)),
        ),
    );
    location_stats.insert(
        "ruaka".to_owned(),
        location("ruaka", Some(bucket(12, 6_500_000.0)), None),
    );

    let mut location_premiums = BTreeMap::new();
    location_premiums.insert("kilimani".to_owned(), 0.2);
    location_premiums.insert("westlands".to_owned(), 0.45);

    PriceModel {
        meta: ModelMeta {
            trained_at: "2026-01-15T03:00:00Z".to_owned(),
            training_rows: 4_812,
            r2: 0.71,
            rmse_log: 0.262_364_264_467_491,
            approx_rmse_multiplier: 1.3,
            locations_in_model: 2,
        },
        regression: Regression {
            intercept: 15.0,
            coef_bedrooms: 0.1,
            coef_rent: -2.0,
            location_premiums,
        },
        location_stats,
        bedroom_median_price: BTreeMap::new(),
        bedroom_distribution: BTreeMap::new(),
        global_stats: GlobalStats::default(),
        price_tiers: PriceTiers::default(),
        top_lists: TopLists::default(),
    }
}
