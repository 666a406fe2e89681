pub mod point;
pub mod transform;

pub use point::{GeoPoint, LocalPoint};
pub use transform::{
    bearing_to_offset, normalize_bearing, FrameConverter, TangentPlane, NM_PER_DEGREE_LATITUDE,
};
