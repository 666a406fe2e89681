use crate::geo::LocalPoint;
use crate::kinematics::leg::Leg;
use crate::prelude::{EngineError, EngineResult};
use serde::Serialize;

/// Ordered, non-empty chain of legs belonging to one vessel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    legs: Vec<Leg>,
    /// Cumulative start time of each leg.
    starts: Vec<f64>,
    total_duration: f64,
}

impl Route {
    pub fn new(legs: Vec<Leg>) -> EngineResult<Self> {
        if legs.is_empty() {
            return Err(EngineError::EmptyScenario("route has no legs".into()));
        }
        let mut starts = Vec::with_capacity(legs.len());
        let mut elapsed = 0.0;
        for leg in &legs {
            starts.push(elapsed);
            elapsed += leg.duration();
        }
        Ok(Self {
            legs,
            starts,
            total_duration: elapsed,
        })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Time at which each leg begins, in seconds from route start.
    pub fn leg_start_times(&self) -> &[f64] {
        &self.starts
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn start(&self) -> LocalPoint {
        self.legs[0].start()
    }

    pub fn end(&self) -> LocalPoint {
        self.last_leg().end()
    }

    pub(crate) fn last_leg(&self) -> &Leg {
        &self.legs[self.legs.len() - 1]
    }

    /// Per-leg speed in nm/s, ordered by leg index.
    pub fn velocity_series(&self) -> Vec<f64> {
        self.legs.iter().map(Leg::speed).collect()
    }

    /// Total distance sailed along the route in nm.
    pub fn length(&self) -> f64 {
        self.legs.iter().map(Leg::length).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumulative_times_follow_leg_order() {
        let first = Leg::new(0.0, 0.0, 2.0, 600.0, LocalPoint::ORIGIN).unwrap();
        let second = Leg::new(90.0, 0.0, 4.0, 1200.0, first.end()).unwrap();
        let route = Route::new(vec![first, second]).unwrap();
        assert_eq!(route.leg_start_times(), &[0.0, 600.0]);
        assert_eq!(route.total_duration(), 1800.0);
        assert_eq!(route.velocity_series(), vec![2.0 / 600.0, 4.0 / 1200.0]);
        assert!((route.length() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn empty_route_is_rejected() {
        assert!(matches!(
            Route::new(Vec::new()),
            Err(EngineError::EmptyScenario(_))
        ));
    }
}
