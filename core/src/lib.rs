//! Trajectory kinematics and proximity engine for maritime traffic scenarios.
//!
//! Routes are described as chains of straight legs and constant-curvature
//! turns. The engine assembles them into time-indexed routes in a local
//! north/east frame, samples vessel state at any instant and classifies the
//! proximity of every target to the own vessel.

pub mod constraints;
pub mod geo;
pub mod kinematics;
pub mod prelude;
pub mod proximity;
pub mod scenario;
pub mod telemetry;

pub use prelude::{EngineError, EngineResult};
