use ktvizcore::geo::LocalPoint;
use ktvizcore::scenario::{RawLeg, RawScenario, RawVessel};
use std::f64::consts::FRAC_PI_2;

pub const HEAD_ON: &str = "head-on";
pub const CROSSING: &str = "crossing";
pub const OVERTAKING: &str = "overtaking";
pub const STARBOARD_TURN: &str = "starboard-turn";

pub const TEMPLATE_NAMES: [&str; 4] = [HEAD_ON, CROSSING, OVERTAKING, STARBOARD_TURN];

fn straight(bearing: f64, knots: f64, hours: f64, start: LocalPoint) -> RawVessel {
    RawVessel::new(vec![
        RawLeg::new(bearing, 0.0, knots * hours, hours * 3600.0).with_local(start)
    ])
}

/// Canned two-ship encounters in local coordinates, one hour long.
pub fn template(name: &str) -> Option<RawScenario> {
    let vessels = match name {
        HEAD_ON => vec![
            straight(0.0, 10.0, 1.0, LocalPoint::ORIGIN),
            straight(180.0, 10.0, 1.0, LocalPoint::new(10.0, 0.3)),
        ],
        CROSSING => vec![
            straight(0.0, 10.0, 1.0, LocalPoint::ORIGIN),
            straight(270.0, 10.0, 1.0, LocalPoint::new(5.0, 5.0)),
        ],
        OVERTAKING => vec![
            straight(0.0, 8.0, 1.0, LocalPoint::ORIGIN),
            straight(0.0, 14.0, 1.0, LocalPoint::new(-3.0, 0.2)),
        ],
        // own vessel gives way with a one-mile-radius turn to starboard
        STARBOARD_TURN => vec![
            RawVessel::new(vec![
                RawLeg::new(0.0, 0.0, 3.0, 1080.0).with_local(LocalPoint::ORIGIN),
                RawLeg::new(0.0, -1.0, FRAC_PI_2, 565.0),
                RawLeg::new(90.0, 0.0, 4.0, 1440.0),
            ]),
            straight(270.0, 10.0, 1.0, LocalPoint::new(5.0, 5.0)),
        ],
        _ => return None,
    };
    Some(RawScenario::new(vessels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ktvizcore::scenario::Assembler;

    #[test]
    fn every_template_assembles() {
        for name in TEMPLATE_NAMES {
            let raw = template(name).unwrap();
            let scenario = Assembler::new().assemble(&raw).unwrap();
            assert_eq!(scenario.vessels().len(), 2, "{}", name);
        }
        assert!(template("unknown").is_none());
    }

    #[test]
    fn starboard_turn_ends_heading_east() {
        let scenario = Assembler::new()
            .assemble(&template(STARBOARD_TURN).unwrap())
            .unwrap();
        let legs = scenario.own_vessel().route.legs();
        let turn_end = legs[1].end_state();
        assert!((turn_end.heading - 90.0).abs() < 1e-9);
        assert!(turn_end.position.distance_to(LocalPoint::new(4.0, 1.0)) < 1e-9);
    }
}
