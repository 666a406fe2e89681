//! Turns a raw scenario description into an immutable [`Scenario`].
//!
//! Geodetic start points are projected into the local frame anchored at the
//! first vessel's first leg. Local start points are used as-is, and a leg with
//! no coordinates continues from the previous leg's end. Any malformed leg
//! aborts the whole scenario.

use crate::geo::{FrameConverter, GeoPoint, LocalPoint, TangentPlane};
use crate::kinematics::{Leg, Route};
use crate::prelude::{EngineError, EngineResult};
use crate::scenario::model::{Scenario, Vessel};
use crate::scenario::raw::{RawLeg, RawPoint, RawScenario, RawVessel};
use crate::telemetry::log::LogManager;

/// Distance above which a declared start point counts as a jump.
const CONTINUITY_TOLERANCE_NM: f64 = 1e-6;

pub struct Assembler<C: FrameConverter = TangentPlane> {
    converter: C,
    logger: LogManager,
}

impl Assembler<TangentPlane> {
    pub fn new() -> Self {
        Self::with_converter(TangentPlane)
    }
}

impl Default for Assembler<TangentPlane> {
    fn default() -> Self {
        Self::new()
    }
}

fn required(value: Option<f64>, names: &str) -> EngineResult<f64> {
    value.ok_or_else(|| EngineError::Parse(format!("missing `{}`", names)))
}

fn in_leg(err: EngineError, vessel: usize, leg: usize) -> EngineError {
    match err {
        EngineError::Parse(message) => {
            EngineError::Parse(format!("vessel {} leg {}: {}", vessel, leg, message))
        }
        EngineError::Conversion(message) => {
            EngineError::Conversion(format!("vessel {} leg {}: {}", vessel, leg, message))
        }
        other => other,
    }
}

impl<C: FrameConverter> Assembler<C> {
    pub fn with_converter(converter: C) -> Self {
        Self {
            converter,
            logger: LogManager::new("assembler"),
        }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn assemble(&self, raw: &RawScenario) -> EngineResult<Scenario> {
        if raw.vessels.is_empty() {
            return Err(EngineError::EmptyScenario("scenario has no vessels".into()));
        }
        let origin = Self::resolve_origin(raw)?;

        let mut vessels = Vec::with_capacity(raw.vessels.len());
        for (index, raw_vessel) in raw.vessels.iter().enumerate() {
            let route = self.assemble_route(index, raw_vessel, origin)?;
            let label = raw_vessel
                .label
                .clone()
                .unwrap_or_else(|| Vessel::default_label(index));
            self.logger.detail(&format!(
                "{}: {} legs, {:.1} nm over {:.0} s",
                label,
                route.legs().len(),
                route.length(),
                route.total_duration()
            ));
            vessels.push(Vessel::new(index, label, route));
        }

        let scenario = Scenario::new(vessels, origin)?;
        self.logger.record(&format!(
            "assembled {} vessels, duration {:.0} s, {}",
            scenario.vessels().len(),
            scenario.total_duration(),
            match origin {
                Some(point) => format!("origin {:.5}, {:.5}", point.lat, point.lon),
                None => "local coordinates".to_string(),
            }
        ));
        Ok(scenario)
    }

    /// The first vessel's first leg anchors the frame whenever any point is geodetic.
    fn resolve_origin(raw: &RawScenario) -> EngineResult<Option<GeoPoint>> {
        if !raw.has_geodetic_points() {
            return Ok(None);
        }
        let first = raw
            .vessels
            .first()
            .and_then(|vessel| vessel.items.first())
            .ok_or_else(|| EngineError::EmptyScenario("vessel 0 has no legs".into()))?;
        match first.start_point().map_err(|err| in_leg(err, 0, 0))? {
            Some(RawPoint::Geodetic(origin)) => Ok(Some(origin)),
            _ => Err(EngineError::Parse(
                "vessel 0 leg 0: geodetic scenarios must start with `lat`/`lon`".into(),
            )),
        }
    }

    fn assemble_route(
        &self,
        index: usize,
        raw: &RawVessel,
        origin: Option<GeoPoint>,
    ) -> EngineResult<Route> {
        if raw.items.is_empty() {
            return Err(EngineError::EmptyScenario(format!(
                "vessel {} has no legs",
                index
            )));
        }

        let mut legs = Vec::with_capacity(raw.items.len());
        let mut cursor = LocalPoint::ORIGIN;
        for (leg_index, raw_leg) in raw.items.iter().enumerate() {
            let leg = self
                .assemble_leg(raw_leg, cursor, origin)
                .map_err(|err| in_leg(err, index, leg_index))?;
            if leg_index > 0 && leg.start().distance_to(cursor) > CONTINUITY_TOLERANCE_NM {
                self.logger.caution(&format!(
                    "vessel {} leg {} starts {:.3} nm away from the previous leg's end",
                    index,
                    leg_index,
                    leg.start().distance_to(cursor)
                ));
            }
            cursor = leg.end();
            legs.push(leg);
        }
        Route::new(legs)
    }

    fn assemble_leg(
        &self,
        raw: &RawLeg,
        cursor: LocalPoint,
        origin: Option<GeoPoint>,
    ) -> EngineResult<Leg> {
        let bearing = required(raw.bearing, "begin_angle`/`bearing")?;
        let curvature = required(raw.curvature, "curve`/`curvature")?;
        let length = required(raw.length, "length")?;
        let duration = required(raw.duration, "duration")?;

        let start = match raw.start_point()? {
            Some(RawPoint::Local(point)) => point,
            Some(RawPoint::Geodetic(point)) => {
                // resolve_origin guarantees an origin once any point is geodetic
                let origin = origin.ok_or_else(|| {
                    EngineError::Conversion("geodetic point without a scenario origin".into())
                })?;
                self.converter.geodetic_to_local(origin, point)?
            }
            None => cursor,
        };

        Leg::new(bearing, curvature, length, duration, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::LegKind;

    fn leg(bearing: f64, curvature: f64, length: f64, duration: f64) -> RawLeg {
        RawLeg::new(bearing, curvature, length, duration)
    }

    #[test]
    fn local_scenario_has_no_origin() {
        let raw = RawScenario::new(vec![
            RawVessel::new(vec![leg(90.0, 0.0, 5.0, 1800.0).with_local(LocalPoint::ORIGIN)]),
            RawVessel::new(vec![
                leg(180.0, 0.0, 1.0, 600.0).with_local(LocalPoint::new(3.0, 8.0))
            ]),
        ]);
        let scenario = Assembler::new().assemble(&raw).unwrap();
        assert!(scenario.origin().is_none());
        assert_eq!(scenario.vessels()[1].label, "Tar 1");
        assert_eq!(scenario.own_vessel().label, "Own");
        assert_eq!(
            scenario.vessels()[1].route.start(),
            LocalPoint::new(3.0, 8.0)
        );
    }

    #[test]
    fn geodetic_points_are_projected_around_first_leg() {
        let raw = RawScenario::new(vec![
            RawVessel::new(vec![
                leg(0.0, 0.0, 2.0, 600.0).with_geodetic(GeoPoint::new(60.0, 30.0))
            ]),
            RawVessel::new(vec![
                leg(0.0, 0.0, 2.0, 600.0).with_geodetic(GeoPoint::new(60.1, 30.0))
            ]),
        ]);
        let scenario = Assembler::new().assemble(&raw).unwrap();
        assert_eq!(scenario.origin(), Some(GeoPoint::new(60.0, 30.0)));
        assert_eq!(scenario.own_vessel().route.start(), LocalPoint::ORIGIN);
        let target_start = scenario.vessels()[1].route.start();
        assert!((target_start.north - 6.0).abs() < 1e-9);
        assert!(target_start.east.abs() < 1e-9);
    }

    #[test]
    fn legs_without_coordinates_chain_from_previous_end() {
        let raw = RawScenario::new(vec![RawVessel::new(vec![
            leg(0.0, 0.0, 4.0, 1200.0).with_local(LocalPoint::new(1.0, 1.0)),
            leg(0.0, -0.5, 1.0, 600.0),
            leg(90.0, 0.0, 2.0, 600.0),
        ])]);
        let scenario = Assembler::new().assemble(&raw).unwrap();
        let legs = scenario.own_vessel().route.legs();
        assert_eq!(legs[1].kind(), LegKind::Arc);
        assert!(legs[1].start().distance_to(LocalPoint::new(5.0, 1.0)) < 1e-12);
        assert!(legs[2].start().distance_to(legs[1].end()) < 1e-12);
    }

    #[test]
    fn missing_field_aborts_assembly() {
        let clear: [(&str, fn(&mut RawLeg)); 4] = [
            ("bearing", |leg| leg.bearing = None),
            ("curvature", |leg| leg.curvature = None),
            ("length", |leg| leg.length = None),
            ("duration", |leg| leg.duration = None),
        ];
        for (field, remove) in clear {
            let mut broken = leg(0.0, 0.0, 1.0, 60.0);
            remove(&mut broken);
            let raw = RawScenario::new(vec![
                RawVessel::new(vec![leg(0.0, 0.0, 1.0, 60.0)]),
                RawVessel::new(vec![leg(90.0, 0.0, 2.0, 60.0)]),
                RawVessel::new(vec![leg(0.0, 0.0, 1.0, 60.0), broken]),
            ]);
            match Assembler::new().assemble(&raw) {
                Err(EngineError::Parse(message)) => {
                    assert!(message.contains("vessel 2 leg 1"), "{}", message);
                    assert!(message.contains(field), "{}", message);
                }
                other => panic!("missing {} gave {:?}", field, other),
            }
        }
    }

    #[test]
    fn non_positive_duration_is_a_parse_error() {
        let raw = RawScenario::new(vec![RawVessel::new(vec![leg(0.0, 0.0, 1.0, -5.0)])]);
        assert!(matches!(
            Assembler::new().assemble(&raw),
            Err(EngineError::Parse(_))
        ));
    }

    #[test]
    fn empty_descriptions_are_rejected() {
        assert!(matches!(
            Assembler::new().assemble(&RawScenario::default()),
            Err(EngineError::EmptyScenario(_))
        ));
        let raw = RawScenario::new(vec![
            RawVessel::new(vec![leg(0.0, 0.0, 1.0, 60.0)]),
            RawVessel::new(Vec::new()),
        ]);
        assert!(matches!(
            Assembler::new().assemble(&raw),
            Err(EngineError::EmptyScenario(_))
        ));
    }

    #[test]
    fn non_finite_geodetic_point_is_a_conversion_error() {
        let raw = RawScenario::new(vec![
            RawVessel::new(vec![
                leg(0.0, 0.0, 1.0, 60.0).with_geodetic(GeoPoint::new(60.0, 30.0))
            ]),
            RawVessel::new(vec![
                leg(0.0, 0.0, 1.0, 60.0).with_geodetic(GeoPoint::new(f64::INFINITY, 30.0))
            ]),
        ]);
        assert!(matches!(
            Assembler::new().assemble(&raw),
            Err(EngineError::Conversion(_))
        ));
    }

    #[test]
    fn geodetic_scenario_must_be_anchored_by_first_leg() {
        let raw = RawScenario::new(vec![
            RawVessel::new(vec![leg(0.0, 0.0, 1.0, 60.0)]),
            RawVessel::new(vec![
                leg(0.0, 0.0, 1.0, 60.0).with_geodetic(GeoPoint::new(60.0, 30.0))
            ]),
        ]);
        assert!(matches!(
            Assembler::new().assemble(&raw),
            Err(EngineError::Parse(_))
        ));
    }
}
