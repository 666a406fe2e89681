use crate::geo::GeoPoint;
use crate::kinematics::Sample;
use crate::proximity::ProximityRecord;
use serde::Serialize;

/// State of one vessel inside a [`Frame`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselSample {
    pub index: usize,
    pub label: String,
    pub sample: Sample,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geodetic: Option<GeoPoint>,
}

impl VesselSample {
    /// Position text for display: degrees when geodetic, nautical miles otherwise.
    pub fn coordinate_text(&self) -> String {
        match self.geodetic {
            Some(point) => format!("{:.5}° {:.5}°", point.lat, point.lon),
            None => format!(
                "{:.2} nm {:.2} nm",
                self.sample.position.north, self.sample.position.east
            ),
        }
    }
}

/// Everything a renderer needs for one instant of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Scenario time in seconds.
    pub time: f64,
    pub percent: f64,
    pub safe_radius: f64,
    pub vessels: Vec<VesselSample>,
    pub proximity: Vec<ProximityRecord>,
}

impl Frame {
    pub fn time_hours(&self) -> f64 {
        self.time / 3600.0
    }

    pub fn vessel(&self, index: usize) -> Option<&VesselSample> {
        self.vessels.iter().find(|vessel| vessel.index == index)
    }
}
