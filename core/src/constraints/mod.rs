//! Static navigation constraints delivered as a `FeatureCollection` document.
//!
//! Constraint files are not routes; the loader recognises them by their
//! `"type": "FeatureCollection"` discriminator and hands them here.

pub mod feature;

pub use feature::{
    ConstraintSet, Feature, Geometry, LimitationKind, LocalConstraint, LocalShape, Properties,
};
