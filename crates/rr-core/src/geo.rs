//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` stores latitude/longitude in **radians** as `f64`.  Edge weights
//! and the A* heuristic are both derived from [`GeoPoint::distance_m`], so
//! the heuristic never overestimates a road's length.

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 coordinate in radians.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn from_radians(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    #[inline]
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self { lat: lat.to_radians(), lon: lon.to_radians() }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = other.lat - self.lat;
        let d_lon = other.lon - self.lon;

        let a = (d_lat * 0.5).sin().powi(2)
            + self.lat.cos() * other.lat.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}°, {:.6}°)", self.lat.to_degrees(), self.lon.to_degrees())
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Axis-aligned lat/lon extent of a set of points.
///
/// Computed once by the loader and handed to renderers by value.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Degenerate bounds around a single point.
    pub fn around(p: GeoPoint) -> Self {
        Self { min_lat: p.lat, max_lat: p.lat, min_lon: p.lon, max_lon: p.lon }
    }

    /// Bounds of every point in `points`, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = GeoPoint>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::around(first), |mut b, p| {
            b.extend(p);
            b
        }))
    }

    pub fn extend(&mut self, p: GeoPoint) {
        self.min_lat = self.min_lat.min(p.lat);
        self.max_lat = self.max_lat.max(p.lat);
        self.min_lon = self.min_lon.min(p.lon);
        self.max_lon = self.max_lon.max(p.lon);
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&p.lat)
            && (self.min_lon..=self.max_lon).contains(&p.lon)
    }

    /// Map `p` into the unit square: `(x, y)` with x along longitude and y
    /// along latitude.  A zero-width axis maps to 0.5.
    pub fn normalize(&self, p: GeoPoint) -> (f64, f64) {
        fn scale(v: f64, lo: f64, hi: f64) -> f64 {
            let span = hi - lo;
            if span <= f64::EPSILON { 0.5 } else { (v - lo) / span }
        }
        (
            scale(p.lon, self.min_lon, self.max_lon),
            scale(p.lat, self.min_lat, self.max_lat),
        )
    }
}
