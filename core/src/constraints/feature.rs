use crate::geo::{FrameConverter, GeoPoint, LocalPoint};
use crate::prelude::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

pub const FEATURE_COLLECTION: &str = "FeatureCollection";

/// Prohibition attached to a feature through `properties.limitation_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitationKind {
    ZoneEnteringProhibition,
    MovementParametersLimitation,
    PointApproachProhibition,
    LineCrossingProhibition,
    #[serde(other)]
    Other,
}

/// Feature geometry. Vertices are `[lat, lon]` pairs in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limitation_type: Option<LimitationKind>,
    /// Keep-out distance of a point constraint, in nm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// Constraint geometry projected into the local frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LocalShape {
    Zone(Vec<LocalPoint>),
    Point { center: LocalPoint, distance: f64 },
    Line(Vec<LocalPoint>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalConstraint {
    pub kind: LimitationKind,
    pub shape: LocalShape,
}

fn vertex(pair: &[f64; 2]) -> GeoPoint {
    GeoPoint::new(pair[0], pair[1])
}

impl ConstraintSet {
    pub fn is_feature_collection(&self) -> bool {
        self.kind == FEATURE_COLLECTION
    }

    pub fn polygons(&self) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(|feature| matches!(feature.geometry, Geometry::Polygon { .. }))
    }

    pub fn points(&self) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(|feature| matches!(feature.geometry, Geometry::Point { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(|feature| matches!(feature.geometry, Geometry::LineString { .. }))
    }

    /// Projects every feature into the local frame anchored at `origin`.
    pub fn to_local<C: FrameConverter>(
        &self,
        converter: &C,
        origin: GeoPoint,
    ) -> EngineResult<Vec<LocalConstraint>> {
        self.features
            .iter()
            .enumerate()
            .map(|(index, feature)| {
                feature.to_local(converter, origin).map_err(|err| match err {
                    EngineError::Parse(message) => {
                        EngineError::Parse(format!("feature {}: {}", index, message))
                    }
                    other => other,
                })
            })
            .collect()
    }
}

impl Feature {
    fn project<C: FrameConverter>(
        converter: &C,
        origin: GeoPoint,
        pairs: &[[f64; 2]],
    ) -> EngineResult<Vec<LocalPoint>> {
        pairs
            .iter()
            .map(|pair| converter.geodetic_to_local(origin, vertex(pair)))
            .collect()
    }

    pub fn to_local<C: FrameConverter>(
        &self,
        converter: &C,
        origin: GeoPoint,
    ) -> EngineResult<LocalConstraint> {
        let limitation = self.properties.limitation_type;
        let (default_kind, shape) = match &self.geometry {
            Geometry::Polygon { coordinates } => {
                let ring = coordinates
                    .first()
                    .filter(|ring| !ring.is_empty())
                    .ok_or_else(|| EngineError::Parse("polygon has no outer ring".into()))?;
                (
                    LimitationKind::ZoneEnteringProhibition,
                    LocalShape::Zone(Self::project(converter, origin, ring)?),
                )
            }
            Geometry::Point { coordinates } => {
                let distance = self.properties.distance.ok_or_else(|| {
                    EngineError::Parse("point constraint is missing `distance`".into())
                })?;
                (
                    LimitationKind::PointApproachProhibition,
                    LocalShape::Point {
                        center: converter.geodetic_to_local(origin, vertex(coordinates))?,
                        distance,
                    },
                )
            }
            Geometry::LineString { coordinates } => {
                if coordinates.len() < 2 {
                    return Err(EngineError::Parse("line needs at least two vertices".into()));
                }
                (
                    LimitationKind::LineCrossingProhibition,
                    LocalShape::Line(Self::project(converter, origin, coordinates)?),
                )
            }
        };
        Ok(LocalConstraint {
            kind: limitation.unwrap_or(default_kind),
            shape,
        })
    }
}
