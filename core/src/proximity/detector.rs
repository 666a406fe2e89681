use crate::geo::LocalPoint;
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// Index of the own vessel every target is compared against.
pub const REFERENCE_INDEX: usize = 0;

/// Proximity classification of a distance against a safe radius `r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    /// Closer than `2r`.
    Collision,
    /// From `2r` up to, but not including, `3r`.
    Caution,
    /// `3r` or further.
    Clear,
}

impl RiskBand {
    pub fn classify(distance: f64, safe_radius: f64) -> Self {
        if distance < 2.0 * safe_radius {
            RiskBand::Collision
        } else if distance < 3.0 * safe_radius {
            RiskBand::Caution
        } else {
            RiskBand::Clear
        }
    }

    pub fn is_alarm(&self) -> bool {
        !matches!(self, RiskBand::Clear)
    }
}

/// Distance from the own vessel to one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityRecord {
    pub vessel_index: usize,
    pub distance: f64,
    pub band: RiskBand,
}

/// Reference-centric proximity check: own vessel against each target.
/// Target pairs are never compared with each other.
pub struct ProximityDetector {
    safe_radius: f64,
    logger: LogManager,
}

impl ProximityDetector {
    pub fn new(safe_radius: f64) -> Self {
        Self {
            safe_radius,
            logger: LogManager::new("proximity"),
        }
    }

    pub fn safe_radius(&self) -> f64 {
        self.safe_radius
    }

    /// Classifies every non-reference vessel in `positions`, in input order.
    /// Returns nothing when the reference vessel is absent.
    pub fn assess(&self, positions: &[(usize, LocalPoint)]) -> Vec<ProximityRecord> {
        let Some(&(_, reference)) = positions
            .iter()
            .find(|(index, _)| *index == REFERENCE_INDEX)
        else {
            return Vec::new();
        };

        let records: Vec<ProximityRecord> = positions
            .iter()
            .filter(|(index, _)| *index != REFERENCE_INDEX)
            .map(|&(vessel_index, position)| {
                let distance = reference.distance_to(position);
                ProximityRecord {
                    vessel_index,
                    distance,
                    band: RiskBand::classify(distance, self.safe_radius),
                }
            })
            .collect();

        let alarms = records.iter().filter(|record| record.band.is_alarm()).count();
        if alarms > 0 {
            self.logger.detail(&format!(
                "{} of {} targets inside {:.2} nm",
                alarms,
                records.len(),
                3.0 * self.safe_radius
            ));
        }
        records
    }
}
