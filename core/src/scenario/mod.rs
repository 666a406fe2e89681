pub mod assemble;
pub mod frame;
pub mod loader;
pub mod model;
pub mod raw;

pub use assemble::Assembler;
pub use frame::{Frame, VesselSample};
pub use loader::{load_document, parse_document, Document};
pub use model::{Scenario, Vessel};
pub use raw::{RawLeg, RawPoint, RawScenario, RawVessel};
