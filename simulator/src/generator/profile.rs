use anyhow::{bail, Context};
use ktvizcore::geo::{
    bearing_to_offset, normalize_bearing, FrameConverter, GeoPoint, LocalPoint, TangentPlane,
};
use ktvizcore::scenario::{RawLeg, RawScenario, RawVessel};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating a random encounter scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub targets: usize,
    pub horizon_hours: f64,
    pub own_speed_knots: f64,
    pub min_target_knots: f64,
    pub max_target_knots: f64,
    /// Largest miss distance at the planned meeting point, in nm.
    pub max_miss_nm: f64,
    pub seed: u64,
    /// When set, start points are written as latitude/longitude around it.
    pub origin: Option<GeoPoint>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            targets: 3,
            horizon_hours: 2.0,
            own_speed_knots: 12.0,
            min_target_knots: 5.0,
            max_target_knots: 20.0,
            max_miss_nm: 1.5,
            seed: 0,
            origin: None,
        }
    }
}

fn place(leg: RawLeg, point: LocalPoint, origin: Option<GeoPoint>) -> anyhow::Result<RawLeg> {
    match origin {
        Some(origin) => {
            let geodetic = TangentPlane
                .local_to_geodetic(origin, point)
                .context("placing generated start point")?;
            Ok(leg.with_geodetic(geodetic))
        }
        None => Ok(leg.with_local(point)),
    }
}

/// One straight leg from a drawn stroke: the course points from `start` to
/// `end` and the vessel covers the stroke within the time horizon.
pub fn stroke_leg(
    start: LocalPoint,
    end: LocalPoint,
    horizon_hours: f64,
) -> anyhow::Result<RawLeg> {
    let length = start.distance_to(end);
    if length <= 0.0 {
        bail!("stroke has zero length");
    }
    if !(horizon_hours.is_finite() && horizon_hours > 0.0) {
        bail!("time horizon must be positive, got {}", horizon_hours);
    }
    let delta = end - start;
    let course = normalize_bearing(delta.east.atan2(delta.north).to_degrees());
    Ok(RawLeg::new(course, 0.0, length, horizon_hours * 3600.0).with_local(start))
}

/// Own vessel plus `targets` vessels each steering to pass close to the own
/// vessel at a random moment of the horizon.
pub fn build_encounter(config: &GeneratorConfig) -> anyhow::Result<RawScenario> {
    if !(config.horizon_hours > 0.0 && config.own_speed_knots > 0.0) {
        bail!("horizon and own speed must be positive");
    }
    if !(config.min_target_knots > 0.0 && config.min_target_knots <= config.max_target_knots) {
        bail!(
            "invalid target speed range {}..{}",
            config.min_target_knots,
            config.max_target_knots
        );
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let horizon_s = config.horizon_hours * 3600.0;
    let own_course: f64 = rng.gen_range(0.0..360.0);
    let own_leg = RawLeg::new(
        own_course,
        0.0,
        config.own_speed_knots * config.horizon_hours,
        horizon_s,
    );
    let mut vessels = vec![RawVessel::new(vec![place(
        own_leg,
        LocalPoint::ORIGIN,
        config.origin,
    )?])];

    for _ in 0..config.targets {
        let meet_hours = rng.gen_range(0.3..0.8) * config.horizon_hours;
        let miss = config.max_miss_nm.max(0.0);
        let meet = bearing_to_offset(own_course, config.own_speed_knots * meet_hours)
            + LocalPoint::new(rng.gen_range(-miss..=miss), rng.gen_range(-miss..=miss));
        let course: f64 = rng.gen_range(0.0..360.0);
        let knots = rng.gen_range(config.min_target_knots..=config.max_target_knots);
        let start = meet - bearing_to_offset(course, knots * meet_hours);
        let leg = RawLeg::new(course, 0.0, knots * config.horizon_hours, horizon_s);
        vessels.push(RawVessel::new(vec![place(leg, start, config.origin)?]));
    }

    Ok(RawScenario::new(vessels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ktvizcore::scenario::Assembler;

    #[test]
    fn stroke_course_points_along_stroke() {
        let leg = stroke_leg(LocalPoint::new(0.0, 0.0), LocalPoint::new(0.0, -3.0), 0.5).unwrap();
        assert!((leg.bearing.unwrap() - 270.0).abs() < 1e-9);
        assert_eq!(leg.length, Some(3.0));
        assert_eq!(leg.duration, Some(1800.0));
        assert!(stroke_leg(LocalPoint::ORIGIN, LocalPoint::ORIGIN, 1.0).is_err());
    }

    #[test]
    fn generator_is_deterministic_per_seed() {
        let config = GeneratorConfig {
            seed: 7,
            ..Default::default()
        };
        let first = build_encounter(&config).unwrap();
        let second = build_encounter(&config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.vessels.len(), 4);
    }

    #[test]
    fn generated_targets_pass_near_own_vessel() {
        let config = GeneratorConfig {
            targets: 5,
            max_miss_nm: 0.5,
            seed: 42,
            ..Default::default()
        };
        let scenario = Assembler::new()
            .assemble(&build_encounter(&config).unwrap())
            .unwrap();
        let closest = |index: usize| {
            (0..=1440)
                .map(|step| {
                    let time = step as f64 * 5.0;
                    let frame = scenario.sample_all(time);
                    frame[0].sample.position.distance_to(frame[index].sample.position)
                })
                .fold(f64::INFINITY, f64::min)
        };
        for index in 1..=5 {
            assert!(closest(index) < 0.8, "target {}", index);
        }
    }

    #[test]
    fn geodetic_origin_is_used_for_start_points() {
        let config = GeneratorConfig {
            targets: 1,
            origin: Some(GeoPoint::new(60.0, 30.0)),
            ..Default::default()
        };
        let raw = build_encounter(&config).unwrap();
        assert_eq!(raw.vessels[0].items[0].lat, Some(60.0));
        let scenario = Assembler::new().assemble(&raw).unwrap();
        assert_eq!(scenario.origin(), Some(GeoPoint::new(60.0, 30.0)));
    }
}
