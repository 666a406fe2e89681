//! Motion primitives of a route: straight legs and constant-curvature arcs.
//!
//! Bearings follow the compass convention (0° = north, clockwise). Curvature is
//! the signed inverse turn radius in 1/nm; positive curvature turns to port
//! (bearing decreases), negative curvature turns to starboard. Lengths are in
//! nautical miles and durations in seconds, so speeds are in nm/s.

use crate::geo::{bearing_to_offset, normalize_bearing, LocalPoint};
use crate::prelude::{EngineError, EngineResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LegKind {
    Line,
    Arc,
}

/// Turn of an arc leg, resolved once when the leg is built. Positions are
/// measured from the leg start along the chord, so the arc joins its start
/// point exactly and degrades smoothly into a line as curvature vanishes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ArcGeometry {
    /// Heading rate in radians per second, positive clockwise.
    turn_rate: f64,
}

impl ArcGeometry {
    fn new(curvature: f64, speed: f64) -> Self {
        Self {
            turn_rate: -speed * curvature,
        }
    }

    fn turn(&self, elapsed: f64) -> f64 {
        self.turn_rate * elapsed
    }

    /// Offset from the leg start after `elapsed` seconds: the chord of the
    /// travelled arc, pointing halfway between the initial and current heading.
    fn displacement(&self, bearing: f64, speed: f64, elapsed: f64) -> LocalPoint {
        let half_turn = 0.5 * self.turn(elapsed);
        let chord = speed * elapsed * sinc(half_turn);
        bearing_to_offset(bearing + half_turn.to_degrees(), chord)
    }
}

/// `sin(x) / x`, continuous at zero.
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-4 {
        1.0 - x * x / 6.0
    } else {
        x.sin() / x
    }
}

/// Kinematic state of a vessel at one instant inside a leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegState {
    pub position: LocalPoint,
    /// Compass heading in degrees, `[0, 360)`.
    pub heading: f64,
    /// Speed over ground in nm/s.
    pub speed: f64,
}

/// One straight or constant-curvature motion primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    kind: LegKind,
    bearing: f64,
    curvature: f64,
    length: f64,
    duration: f64,
    start: LocalPoint,
    #[serde(skip)]
    arc: Option<ArcGeometry>,
}

impl Leg {
    /// Builds a leg. Zero curvature, or one too small to have a finite turn
    /// radius, uses the straight-line model.
    pub fn new(
        bearing: f64,
        curvature: f64,
        length: f64,
        duration: f64,
        start: LocalPoint,
    ) -> EngineResult<Self> {
        let fields = [
            ("bearing", bearing),
            ("curvature", curvature),
            ("length", length),
            ("duration", duration),
            ("start north", start.north),
            ("start east", start.east),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(EngineError::Parse(format!("{} is not finite ({})", name, value)));
        }
        if duration <= 0.0 {
            return Err(EngineError::Parse(format!(
                "duration must be positive, got {}",
                duration
            )));
        }
        if length <= 0.0 {
            return Err(EngineError::Parse(format!(
                "length must be positive, got {}",
                length
            )));
        }

        let speed = length / duration;
        let (kind, arc) = if curvature == 0.0 || !curvature.recip().is_finite() {
            (LegKind::Line, None)
        } else {
            (LegKind::Arc, Some(ArcGeometry::new(curvature, speed)))
        };

        Ok(Self {
            kind,
            bearing,
            curvature,
            length,
            duration,
            start,
            arc,
        })
    }

    pub fn kind(&self) -> LegKind {
        self.kind
    }

    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn start(&self) -> LocalPoint {
        self.start
    }

    /// Constant speed along the leg in nm/s.
    pub fn speed(&self) -> f64 {
        self.length / self.duration
    }

    /// State after `elapsed` seconds in the leg, clamped to `[0, duration]`.
    pub fn state_at(&self, elapsed: f64) -> LegState {
        let elapsed = if elapsed.is_nan() {
            0.0
        } else {
            elapsed.clamp(0.0, self.duration)
        };
        let speed = self.speed();
        match &self.arc {
            None => LegState {
                position: self.start + bearing_to_offset(self.bearing, speed * elapsed),
                heading: normalize_bearing(self.bearing),
                speed,
            },
            Some(arc) => LegState {
                position: self.start + arc.displacement(self.bearing, speed, elapsed),
                heading: normalize_bearing(self.bearing + arc.turn(elapsed).to_degrees()),
                speed,
            },
        }
    }

    /// Terminal state, where the next leg of a continuous route begins.
    pub fn end_state(&self) -> LegState {
        self.state_at(self.duration)
    }

    pub fn end(&self) -> LocalPoint {
        self.end_state().position
    }

    /// Points along the leg for drawing its track; lines yield their two ends.
    pub fn polyline(&self, segments: usize) -> Vec<LocalPoint> {
        match self.kind {
            LegKind::Line => vec![self.start, self.end()],
            LegKind::Arc => {
                let segments = segments.max(1);
                (0..=segments)
                    .map(|i| self.state_at(self.duration * i as f64 / segments as f64).position)
                    .collect()
            }
        }
    }
}
