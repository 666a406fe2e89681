use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position in the local tangent-plane frame, in nautical miles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint {
    pub north: f64,
    pub east: f64,
}

impl LocalPoint {
    pub const ORIGIN: LocalPoint = LocalPoint {
        north: 0.0,
        east: 0.0,
    };

    pub fn new(north: f64, east: f64) -> Self {
        Self { north, east }
    }

    /// Planar Euclidean distance in nautical miles.
    pub fn distance_to(&self, other: LocalPoint) -> f64 {
        (self.north - other.north).hypot(self.east - other.east)
    }

    pub fn is_finite(&self) -> bool {
        self.north.is_finite() && self.east.is_finite()
    }
}

impl Add for LocalPoint {
    type Output = LocalPoint;

    fn add(self, rhs: LocalPoint) -> LocalPoint {
        LocalPoint::new(self.north + rhs.north, self.east + rhs.east)
    }
}

impl Sub for LocalPoint {
    type Output = LocalPoint;

    fn sub(self, rhs: LocalPoint) -> LocalPoint {
        LocalPoint::new(self.north - rhs.north, self.east - rhs.east)
    }
}

/// WGS84 latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_planar() {
        let a = LocalPoint::new(0.0, 0.0);
        let b = LocalPoint::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
        assert_eq!(b - a, b);
        assert_eq!(a + b, b);
    }
}
