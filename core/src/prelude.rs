use std::path::PathBuf;

/// Common error type for scenario assembly and coordinate conversion.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("conversion error: {0}")]
    Conversion(String),
    #[error("empty scenario: {0}")]
    EmptyScenario(String),
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decoding {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

impl EngineError {
    /// True for failures caused by the content of a description rather than by I/O.
    pub fn is_parse(&self) -> bool {
        matches!(self, EngineError::Parse(_) | EngineError::Json { .. })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

pub use crate::geo::{FrameConverter, GeoPoint, LocalPoint, TangentPlane};
pub use crate::kinematics::{Leg, LegKind, LegState, Route, Sample};
pub use crate::proximity::{ProximityDetector, ProximityRecord, RiskBand};
pub use crate::scenario::{Assembler, Frame, Scenario, Vessel, VesselSample};
