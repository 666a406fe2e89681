pub mod leg;
pub mod route;
pub mod sampler;

pub use leg::{Leg, LegKind, LegState};
pub use route::Route;
pub use sampler::{sample_at, sample_fraction, ticks, Sample, Tick, Ticks};
