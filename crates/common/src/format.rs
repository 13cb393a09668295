//! Display helpers for Kenyan shilling amounts, location names and rank tiers.

use serde::{Deserialize, Serialize};

const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// `KES 4.9M`, `KES 85K`, `KES 950`, or `N/A` when the value is unknown.
pub fn format_kes(value: Option<f64>) -> String {
    match value {
        None => "N/A".to_owned(),
        Some(v) if v >= THOUSAND => format!("KES {}", format_kes_compact(v)),
        Some(v) => format!("KES {}", group_thousands(v)),
    }
}

/// Axis-label variant of [`format_kes`] without the currency prefix.
pub fn format_kes_compact(value: f64) -> String {
    if value >= MILLION {
        format!("{:.1}M", value / MILLION)
    } else if value >= THOUSAND {
        format!("{:.0}K", value / THOUSAND)
    } else {
        trim_number(value)
    }
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let s = format!("{value:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}

fn group_thousands(value: f64) -> String {
    let plain = trim_number(value);
    let (sign, rest) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `"south-b"` -> `"South B"`. Splits on whitespace, `-` and `_`.
pub fn title_case(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"Kilimani, Nairobi"` -> `"kilimani-nairobi"`.
pub fn to_slug(location: &str) -> String {
    let mut slug = String::with_capacity(location.len());
    let mut pending_dash = false;
    for c in location.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn rank_ratio(rank: u32, total: u32) -> f64 {
    f64::from(rank) / f64::from(total)
}

/// Tercile of the affordability ranking, rank 1 being the cheapest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceTier {
    Affordable,
    #[serde(rename = "Mid-Range")]
    MidRange,
    Premium,
}

impl PriceTier {
    pub fn from_rank(rank: u32, total: u32) -> Self {
        let ratio = rank_ratio(rank, total);
        if ratio <= 0.33 {
            PriceTier::Affordable
        } else if ratio <= 0.66 {
            PriceTier::MidRange
        } else {
            PriceTier::Premium
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceTier::Affordable => "Affordable",
            PriceTier::MidRange => "Mid-Range",
            PriceTier::Premium => "Premium",
        }
    }
}

/// Quartile of the affordability ranking used to shade the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffordabilityBand {
    Best,
    Good,
    Fair,
    Poor,
}

impl AffordabilityBand {
    pub fn from_rank(rank: u32, total: u32) -> Self {
        let ratio = rank_ratio(rank, total);
        if ratio <= 0.25 {
            AffordabilityBand::Best
        } else if ratio <= 0.5 {
            AffordabilityBand::Good
        } else if ratio <= 0.75 {
            AffordabilityBand::Fair
        } else {
            AffordabilityBand::Poor
        }
    }
}

/// Absolute segment of a sale median.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSegment {
    Unknown,
    Affordable,
    Mid,
    Premium,
    Luxury,
}

impl MarketSegment {
    pub fn from_sale_median(median: Option<f64>) -> Self {
        match median {
            None => MarketSegment::Unknown,
            Some(v) if v == 0.0 || v.is_nan() => MarketSegment::Unknown,
            Some(v) if v < 5.0 * MILLION => MarketSegment::Affordable,
            Some(v) if v < 15.0 * MILLION => MarketSegment::Mid,
            Some(v) if v < 30.0 * MILLION => MarketSegment::Premium,
            Some(_) => MarketSegment::Luxury,
        }
    }
}
