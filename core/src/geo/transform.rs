//! Conversions between geodetic coordinates and the local north/east frame.
//!
//! The local frame is a small-area equirectangular projection anchored at the
//! scenario origin: one degree of latitude is sixty nautical miles and a degree
//! of longitude shrinks with the cosine of the origin latitude. It is accurate
//! enough for encounter-sized areas and is never used for ellipsoidal work.

use crate::geo::point::{GeoPoint, LocalPoint};
use crate::prelude::{EngineError, EngineResult};

pub const NM_PER_DEGREE_LATITUDE: f64 = 60.0;

/// Wraps a compass bearing into `[0, 360)`.
pub fn normalize_bearing(bearing_deg: f64) -> f64 {
    let wrapped = bearing_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Resolves a compass bearing (0 = north, clockwise) and distance into a
/// north/east displacement.
pub fn bearing_to_offset(bearing_deg: f64, distance_nm: f64) -> LocalPoint {
    let (sin, cos) = bearing_deg.to_radians().sin_cos();
    LocalPoint::new(distance_nm * cos, distance_nm * sin)
}

fn wrap_longitude_delta(delta: f64) -> f64 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}

/// Numeric primitive the engine uses to move between frames.
pub trait FrameConverter {
    fn bearing_to_offset(&self, bearing_deg: f64, distance_nm: f64) -> LocalPoint {
        bearing_to_offset(bearing_deg, distance_nm)
    }

    fn geodetic_to_local(&self, origin: GeoPoint, point: GeoPoint) -> EngineResult<LocalPoint>;

    fn local_to_geodetic(&self, origin: GeoPoint, point: LocalPoint) -> EngineResult<GeoPoint>;
}

/// Flat tangent-plane approximation around the scenario origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TangentPlane;

impl TangentPlane {
    fn nm_per_degree_longitude(origin: GeoPoint) -> f64 {
        NM_PER_DEGREE_LATITUDE * origin.lat.to_radians().cos()
    }
}

impl FrameConverter for TangentPlane {
    fn geodetic_to_local(&self, origin: GeoPoint, point: GeoPoint) -> EngineResult<LocalPoint> {
        if !origin.is_finite() || !point.is_finite() {
            return Err(EngineError::Conversion(format!(
                "non-finite geodetic input: origin {:?}, point {:?}",
                origin, point
            )));
        }
        let north = (point.lat - origin.lat) * NM_PER_DEGREE_LATITUDE;
        let east =
            wrap_longitude_delta(point.lon - origin.lon) * Self::nm_per_degree_longitude(origin);
        Ok(LocalPoint::new(north, east))
    }

    fn local_to_geodetic(&self, origin: GeoPoint, point: LocalPoint) -> EngineResult<GeoPoint> {
        if !origin.is_finite() || !point.is_finite() {
            return Err(EngineError::Conversion(format!(
                "non-finite local input: origin {:?}, point {:?}",
                origin, point
            )));
        }
        let scale = Self::nm_per_degree_longitude(origin);
        if scale.abs() < 1e-9 {
            return Err(EngineError::Conversion(format!(
                "origin latitude {} is too close to a pole",
                origin.lat
            )));
        }
        let lat = origin.lat + point.north / NM_PER_DEGREE_LATITUDE;
        let lon = origin.lon + point.east / scale;
        let lon = wrap_longitude_delta(lon);
        if !lat.is_finite() || !lon.is_finite() {
            return Err(EngineError::Conversion(format!(
                "conversion of {:?} produced a non-finite result",
                point
            )));
        }
        Ok(GeoPoint::new(lat, lon))
    }
}
