//! Time-indexed lookup of vessel state along a route.

use crate::geo::LocalPoint;
use crate::kinematics::leg::LegState;
use crate::kinematics::route::Route;
use serde::Serialize;

/// Vessel state sampled at a route time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Query time after clamping to `[0, total_duration]`.
    pub time: f64,
    pub leg_index: usize,
    pub position: LocalPoint,
    pub heading: f64,
    /// Speed in nm/s.
    pub speed: f64,
}

impl Sample {
    fn from_state(time: f64, leg_index: usize, state: LegState) -> Self {
        Self {
            time,
            leg_index,
            position: state.position,
            heading: state.heading,
            speed: state.speed,
        }
    }

    pub fn speed_knots(&self) -> f64 {
        self.speed * 3600.0
    }
}

/// Samples `route` at `time` seconds. Times past the end clamp to the terminal
/// state of the final leg; negative times clamp to the start.
pub fn sample_at(route: &Route, time: f64) -> Sample {
    let time = if time.is_nan() {
        0.0
    } else {
        time.clamp(0.0, route.total_duration())
    };

    for (index, (leg, &start)) in route
        .legs()
        .iter()
        .zip(route.leg_start_times())
        .enumerate()
    {
        if time < start + leg.duration() {
            return Sample::from_state(time, index, leg.state_at(time - start));
        }
    }

    let last = route.legs().len() - 1;
    Sample::from_state(time, last, route.last_leg().end_state())
}

/// Samples `route` at `percent` of its total duration.
pub fn sample_fraction(route: &Route, percent: f64) -> Sample {
    sample_at(route, percent / 100.0 * route.total_duration())
}

/// Preview marker position at a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub time: f64,
    pub position: LocalPoint,
}

/// Lazy sequence of positions every `interval` seconds from time zero.
///
/// Yields at most `count` ticks and stops once the tick time reaches the end
/// of the route. Clone the iterator (or call [`ticks`] again) to restart it.
#[derive(Debug, Clone)]
pub struct Ticks<'a> {
    route: &'a Route,
    interval: f64,
    count: usize,
    next: usize,
}

impl<'a> Iterator for Ticks<'a> {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.next >= self.count {
            return None;
        }
        let time = self.next as f64 * self.interval;
        if time >= self.route.total_duration() {
            self.next = self.count;
            return None;
        }
        self.next += 1;
        Some(Tick {
            time,
            position: sample_at(self.route, time).position,
        })
    }
}

pub fn ticks(route: &Route, interval: f64, count: usize) -> Ticks<'_> {
    let count = if interval.is_finite() && interval > 0.0 {
        count
    } else {
        0
    };
    Ticks {
        route,
        interval,
        count,
        next: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::leg::Leg;

    fn two_leg_route() -> Route {
        let first = Leg::new(90.0, 0.0, 5.0, 1800.0, LocalPoint::ORIGIN).unwrap();
        let second = Leg::new(90.0, 0.2, 3.0, 1800.0, first.end()).unwrap();
        Route::new(vec![first, second]).unwrap()
    }

    #[test]
    fn sample_selects_active_leg() {
        let route = two_leg_route();
        assert_eq!(sample_at(&route, 0.0).leg_index, 0);
        assert_eq!(sample_at(&route, 1799.9).leg_index, 0);
        assert_eq!(sample_at(&route, 1800.0).leg_index, 1);
        let sample = sample_at(&route, 900.0);
        assert!((sample.position.east - 2.5).abs() < 1e-9);
        assert!((sample.speed_knots() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn times_out_of_range_are_clamped() {
        let route = two_leg_route();
        let end = sample_at(&route, route.total_duration());
        assert_eq!(sample_at(&route, 1.0e6), end);
        assert_eq!(end.leg_index, 1);
        assert_eq!(end.time, 3600.0);
        assert_eq!(sample_at(&route, -5.0), sample_at(&route, 0.0));
    }

    #[test]
    fn fraction_scales_total_duration() {
        let route = two_leg_route();
        assert_eq!(sample_fraction(&route, 25.0), sample_at(&route, 900.0));
        assert_eq!(sample_fraction(&route, 100.0), sample_at(&route, 3600.0));
    }

    #[test]
    fn ticks_stop_at_route_end() {
        let route = two_leg_route();
        let times: Vec<f64> = ticks(&route, 1800.0, 20).map(|tick| tick.time).collect();
        assert_eq!(times, vec![0.0, 1800.0]);

        let limited: Vec<Tick> = ticks(&route, 600.0, 3).collect();
        assert_eq!(limited.len(), 3);
        assert!((limited[2].position.east - 10.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn ticks_restart_from_a_clone() {
        let route = two_leg_route();
        let mut sequence = ticks(&route, 1200.0, 10);
        let fresh = sequence.clone();
        sequence.next();
        assert_eq!(fresh.count(), 3);
        assert_eq!(sequence.count(), 2);
    }

    #[test]
    fn degenerate_interval_yields_nothing() {
        let route = two_leg_route();
        assert_eq!(ticks(&route, 0.0, 5).count(), 0);
        assert_eq!(ticks(&route, f64::NAN, 5).count(), 0);
    }
}
