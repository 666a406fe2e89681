use crate::geo::{FrameConverter, GeoPoint, LocalPoint, TangentPlane};
use crate::kinematics::{sample_at, Route};
use crate::prelude::{EngineError, EngineResult};
use crate::proximity::{ProximityDetector, REFERENCE_INDEX};
use crate::scenario::frame::{Frame, VesselSample};
use serde::Serialize;

/// One vessel and its route. Index 0 is the own vessel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vessel {
    pub index: usize,
    pub label: String,
    pub route: Route,
}

impl Vessel {
    pub fn new(index: usize, label: impl Into<String>, route: Route) -> Self {
        Self {
            index,
            label: label.into(),
            route,
        }
    }

    pub fn is_reference(&self) -> bool {
        self.index == REFERENCE_INDEX
    }

    /// Label used when a description does not name the vessel.
    pub fn default_label(index: usize) -> String {
        if index == REFERENCE_INDEX {
            "Own".to_string()
        } else {
            format!("Tar {}", index)
        }
    }
}

/// Immutable, fully assembled traffic scenario.
///
/// `origin` anchors the local frame when the description used geodetic
/// coordinates; it is `None` when all coordinates were already local.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    vessels: Vec<Vessel>,
    origin: Option<GeoPoint>,
}

impl Scenario {
    pub fn new(vessels: Vec<Vessel>, origin: Option<GeoPoint>) -> EngineResult<Self> {
        if vessels.is_empty() {
            return Err(EngineError::EmptyScenario("scenario has no vessels".into()));
        }
        let references = vessels.iter().filter(|vessel| vessel.is_reference()).count();
        if references != 1 {
            return Err(EngineError::Parse(format!(
                "expected exactly one own vessel, found {}",
                references
            )));
        }
        Ok(Self { vessels, origin })
    }

    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.origin
    }

    pub fn own_vessel(&self) -> &Vessel {
        self.vessels
            .iter()
            .find(|vessel| vessel.is_reference())
            .unwrap_or(&self.vessels[0])
    }

    pub fn targets(&self) -> impl Iterator<Item = &Vessel> {
        self.vessels.iter().filter(|vessel| !vessel.is_reference())
    }

    /// Duration of the longest route.
    pub fn total_duration(&self) -> f64 {
        self.vessels
            .iter()
            .map(|vessel| vessel.route.total_duration())
            .fold(0.0, f64::max)
    }

    /// Geodetic display coordinates of a local point, if the scenario has an origin.
    pub fn to_geodetic_with<C: FrameConverter>(
        &self,
        converter: &C,
        point: LocalPoint,
    ) -> Option<GeoPoint> {
        let origin = self.origin?;
        converter.local_to_geodetic(origin, point).ok()
    }

    pub fn to_geodetic(&self, point: LocalPoint) -> Option<GeoPoint> {
        self.to_geodetic_with(&TangentPlane, point)
    }

    /// Samples every vessel at the same scenario time.
    pub fn sample_all_with<C: FrameConverter>(&self, converter: &C, time: f64) -> Vec<VesselSample> {
        self.vessels
            .iter()
            .map(|vessel| {
                let sample = sample_at(&vessel.route, time);
                VesselSample {
                    index: vessel.index,
                    label: vessel.label.clone(),
                    geodetic: self.to_geodetic_with(converter, sample.position),
                    sample,
                }
            })
            .collect()
    }

    pub fn sample_all(&self, time: f64) -> Vec<VesselSample> {
        self.sample_all_with(&TangentPlane, time)
    }

    /// Positions and proximity at `percent` of the scenario duration.
    pub fn snapshot_with<C: FrameConverter>(
        &self,
        converter: &C,
        percent: f64,
        safe_radius: f64,
    ) -> Frame {
        let time = percent / 100.0 * self.total_duration();
        let vessels = self.sample_all_with(converter, time);
        let positions: Vec<(usize, LocalPoint)> = vessels
            .iter()
            .map(|vessel| (vessel.index, vessel.sample.position))
            .collect();
        let proximity = ProximityDetector::new(safe_radius).assess(&positions);
        Frame {
            time: time.clamp(0.0, self.total_duration()),
            percent,
            safe_radius,
            vessels,
            proximity,
        }
    }

    pub fn snapshot(&self, percent: f64, safe_radius: f64) -> Frame {
        self.snapshot_with(&TangentPlane, percent, safe_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::Leg;
    use crate::proximity::RiskBand;

    fn straight(bearing: f64, length: f64, duration: f64, start: LocalPoint) -> Route {
        Route::new(vec![Leg::new(bearing, 0.0, length, duration, start).unwrap()]).unwrap()
    }

    #[test]
    fn scenario_requires_one_own_vessel() {
        let route = straight(0.0, 1.0, 60.0, LocalPoint::ORIGIN);
        assert!(matches!(
            Scenario::new(Vec::new(), None),
            Err(EngineError::EmptyScenario(_))
        ));
        let targets_only = vec![Vessel::new(1, "Tar 1", route.clone())];
        assert!(Scenario::new(targets_only, None).is_err());
        let doubled = vec![
            Vessel::new(0, "Own", route.clone()),
            Vessel::new(0, "Own", route),
        ];
        assert!(Scenario::new(doubled, None).is_err());
    }

    #[test]
    fn snapshot_uses_longest_route_and_clamps_shorter_ones() {
        let own = straight(0.0, 10.0, 3600.0, LocalPoint::ORIGIN);
        let target = straight(90.0, 1.0, 1800.0, LocalPoint::new(0.0, 20.0));
        let scenario = Scenario::new(
            vec![Vessel::new(0, "Own", own), Vessel::new(1, "Tar 1", target)],
            None,
        )
        .unwrap();
        assert_eq!(scenario.total_duration(), 3600.0);

        let frame = scenario.snapshot(100.0, 1.0);
        assert_eq!(frame.time, 3600.0);
        assert!((frame.vessels[0].sample.position.north - 10.0).abs() < 1e-9);
        assert!((frame.vessels[1].sample.position.east - 21.0).abs() < 1e-9);
        assert_eq!(frame.proximity.len(), 1);
        assert_eq!(frame.proximity[0].band, RiskBand::Clear);
        assert!(frame.vessels[0].geodetic.is_none());
    }

    #[test]
    fn geodetic_display_needs_an_origin() {
        let own = straight(0.0, 60.0, 3600.0, LocalPoint::ORIGIN);
        let scenario = Scenario::new(
            vec![Vessel::new(0, "Own", own)],
            Some(GeoPoint::new(60.0, 30.0)),
        )
        .unwrap();
        let frame = scenario.snapshot(100.0, 1.0);
        let geodetic = frame.vessels[0].geodetic.unwrap();
        assert!((geodetic.lat - 61.0).abs() < 1e-9);
        assert!((geodetic.lon - 30.0).abs() < 1e-9);
        assert!(frame.proximity.is_empty());
    }
}
