use super::{LocationStats, ModelError, ModelMeta, PriceBucket, PriceModel, Regression};
use crate::types::ListingType;
use std::collections::BTreeMap;

fn finite(field: impl Into<String>, value: f64) -> Result<(), ModelError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::NonFinite {
            field: field.into(),
            value,
        })
    }
}

fn non_negative(field: impl Into<String>, value: f64) -> Result<(), ModelError> {
    let field = field.into();
    finite(field.clone(), value)?;
    if value < 0.0 {
        return Err(ModelError::Negative { field, value });
    }
    Ok(())
}

pub(super) fn meta(meta: &ModelMeta) -> Result<(), ModelError> {
    let m = meta.approx_rmse_multiplier;
    // NaN は比較が常に false になるのでここで弾かれる
    if !(m.is_finite() && m >= 1.0) {
        return Err(ModelError::MultiplierOutOfRange(m));
    }
    finite("meta.r2", meta.r2)?;
    non_negative("meta.rmse_log", meta.rmse_log)?;
    Ok(())
}

pub(super) fn regression(regression: &Regression) -> Result<(), ModelError> {
    finite("regression.intercept", regression.intercept)?;
    finite("regression.coef_bedrooms", regression.coef_bedrooms)?;
    finite("regression.coef_rent", regression.coef_rent)?;
    for (location, &value) in &regression.location_premiums {
        if !value.is_finite() {
            return Err(ModelError::NonFinitePremium {
                location: location.clone(),
                value,
            });
        }
    }
    Ok(())
}

pub(super) fn location(key: &str, stats: &LocationStats) -> Result<(), ModelError> {
    if stats.slug != key {
        return Err(ModelError::SlugMismatch {
            key: key.to_owned(),
            slug: stats.slug.clone(),
        });
    }
    if let Some(bucket) = &stats.sale {
        price_bucket(key, ListingType::Sale, bucket)?;
    }
    if let Some(bucket) = &stats.rent {
        price_bucket(key, ListingType::Rent, bucket)?;
    }
    if let Some(median) = stats.all.median {
        non_negative(format!("location_stats.{key}.all.median"), median)?;
    }
    Ok(())
}

fn price_bucket(
    location: &str,
    listing_type: ListingType,
    bucket: &PriceBucket,
) -> Result<(), ModelError> {
    if bucket.count == 0 {
        return Err(ModelError::EmptyBucket {
            location: location.to_owned(),
            listing_type,
        });
    }
    let prefix = format!("location_stats.{location}.{}", listing_type_key(listing_type));
    for (name, value) in [
        ("min", bucket.min),
        ("q25", bucket.q25),
        ("median", bucket.median),
        ("q75", bucket.q75),
        ("max", bucket.max),
    ] {
        non_negative(format!("{prefix}.{name}"), value)?;
    }
    let ordered = bucket.min <= bucket.q25
        && bucket.q25 <= bucket.median
        && bucket.median <= bucket.q75
        && bucket.q75 <= bucket.max;
    if !ordered {
        return Err(ModelError::BucketOutOfOrder {
            location: location.to_owned(),
            listing_type,
        });
    }
    Ok(())
}

fn listing_type_key(listing_type: ListingType) -> &'static str {
    match listing_type {
        ListingType::Sale => "sale",
        ListingType::Rent => "rent",
    }
}

/// Position of a tier label, taken from its trailing integer (`p25` -> 25).
pub(super) fn tier_rank(label: &str) -> Option<u32> {
    let digits_at = label
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    label[digits_at..].parse().ok()
}

pub(super) fn tiers(
    listing_type: ListingType,
    tiers: &BTreeMap<String, f64>,
) -> Result<(), ModelError> {
    let key = listing_type_key(listing_type);
    for (label, &value) in tiers {
        non_negative(format!("price_tiers.{key}.{label}"), value)?;
    }

    // ラベルに順位が無い場合は順序を判定できない
    let ranked: Option<Vec<(u32, &String, f64)>> = tiers
        .iter()
        .map(|(label, &value)| tier_rank(label).map(|rank| (rank, label, value)))
        .collect();
    let Some(mut ranked) = ranked else {
        return Ok(());
    };
    ranked.sort_by_key(|(rank, _, _)| *rank);
    for pair in ranked.windows(2) {
        let (_, _, previous) = pair[0];
        let (_, label, value) = pair[1];
        if value < previous {
            return Err(ModelError::TierOutOfOrder {
                listing_type,
                tier: label.clone(),
            });
        }
    }
    Ok(())
}

pub(super) fn descriptive(model: &PriceModel) -> Result<(), ModelError> {
    for (bedrooms, &value) in &model.bedroom_median_price {
        non_negative(format!("bedroom_median_price.{bedrooms}"), value)?;
    }
    for (bedrooms, stats) in &model.bedroom_distribution {
        if let Some(v) = stats.median_sale {
            non_negative(format!("bedroom_distribution.{bedrooms}.median_sale"), v)?;
        }
        if let Some(v) = stats.median_rent {
            non_negative(format!("bedroom_distribution.{bedrooms}.median_rent"), v)?;
        }
    }

    let g = &model.global_stats;
    for (name, value) in [
        ("median_sale_price", g.median_sale_price),
        ("median_rent_price", g.median_rent_price),
        ("avg_bedrooms", g.avg_bedrooms),
        ("price_range.sale_min", g.price_range.sale_min),
        ("price_range.sale_max", g.price_range.sale_max),
        ("price_range.rent_min", g.price_range.rent_min),
        ("price_range.rent_max", g.price_range.rent_max),
    ] {
        non_negative(format!("global_stats.{name}"), value)?;
    }

    let lists = &model.top_lists;
    for (name, items) in [
        ("affordable_sale", &lists.affordable_sale),
        ("expensive_sale", &lists.expensive_sale),
        ("affordable_rent", &lists.affordable_rent),
        ("expensive_rent", &lists.expensive_rent),
    ] {
        for item in items {
            non_negative(format!("top_lists.{name}.{}", item.slug), item.median)?;
        }
    }
    Ok(())
}
