use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// A geocoded location that a map click can snap to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub slug: String,
    pub name: String,
    #[serde(flatten)]
    pub position: LatLon,
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: LatLon, b: LatLon) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Closest candidate to `target`; the earliest one wins ties.
pub fn nearest(target: LatLon, candidates: &[GeoPoint]) -> Option<&GeoPoint> {
    candidates.iter().fold(None, |best: Option<(&GeoPoint, f64)>, p| {
        let d = haversine_km(target, p.position);
        match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((p, d)),
        }
    })
    .map(|(p, _)| p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::*;

    fn point(slug: &str, lat: f64, lon: f64) -> GeoPoint {
        GeoPoint {
            slug: slug.to_owned(),
            name: slug.to_owned(),
            position: LatLon { lat, lon },
        }
    }

    #[test]
    fn test_haversine_zero() {
        let p = LatLon { lat: -1.29, lon: 36.78 };
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = LatLon { lat: 0.0, lon: 36.8 };
        let b = LatLon { lat: 1.0, lon: 36.8 };
        // 6371 * π / 180
        assert_in_delta!(haversine_km(a, b), 111.195, 0.01);
    }

    #[test]
    fn test_haversine_symmetric() {
        let kilimani = LatLon { lat: -1.2921, lon: 36.7856 };
        let westlands = LatLon { lat: -1.2676, lon: 36.8108 };
        assert_in_delta!(
            haversine_km(kilimani, westlands),
            haversine_km(westlands, kilimani),
            1e-12
        );
        let d = haversine_km(kilimani, westlands);
        assert_ge!(d, 3.0);
        assert_le!(d, 4.5);
    }

    #[test]
    fn test_nearest() {
        let points = vec![
            point("kilimani", -1.2921, 36.7856),
            point("westlands", -1.2676, 36.8108),
            point("karen", -1.3197, 36.7076),
        ];
        let click = LatLon { lat: -1.27, lon: 36.81 };
        assert_eq!(nearest(click, &points).unwrap().slug, "westlands");
    }

    #[test]
    fn test_nearest_tie_keeps_first() {
        let points = vec![point("a", 0.0, 1.0), point("b", 0.0, -1.0)];
        let origin = LatLon { lat: 0.0, lon: 0.0 };
        assert_eq!(nearest(origin, &points).unwrap().slug, "a");
    }

    #[test]
    fn test_nearest_empty() {
        assert!(nearest(LatLon { lat: 0.0, lon: 0.0 }, &[]).is_none());
    }
}
