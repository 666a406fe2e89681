pub mod detector;

pub use detector::{ProximityDetector, ProximityRecord, RiskBand, REFERENCE_INDEX};
