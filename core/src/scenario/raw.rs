//! Serde model of a traffic scenario file as it appears on disk.
//!
//! A file holds either an array of vessels or a single route object. Every
//! vessel carries an ordered `items` list of legs:
//!
//! ```json
//! [{"items": [{"begin_angle": 90, "curve": 0, "length": 5, "duration": 1800,
//!              "lat": 60.0, "lon": 30.0}]}]
//! ```
//!
//! Kinematic fields stay optional here so the assembler can report exactly
//! which one is missing.

use crate::geo::{GeoPoint, LocalPoint};
use crate::prelude::{EngineError, EngineResult};
use serde::de::{self, value::MapAccessDeserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLeg {
    #[serde(rename = "begin_angle", alias = "bearing")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
    #[serde(rename = "curve", alias = "curvature")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curvature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Local north offset in nm.
    #[serde(alias = "north", default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Local east offset in nm.
    #[serde(alias = "east", default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// Start coordinates attached to a raw leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPoint {
    Local(LocalPoint),
    Geodetic(GeoPoint),
}

impl RawLeg {
    /// Straight or turning leg without start coordinates.
    pub fn new(bearing: f64, curvature: f64, length: f64, duration: f64) -> Self {
        Self {
            bearing: Some(bearing),
            curvature: Some(curvature),
            length: Some(length),
            duration: Some(duration),
            ..Default::default()
        }
    }

    pub fn with_local(mut self, point: LocalPoint) -> Self {
        self.x = Some(point.north);
        self.y = Some(point.east);
        self
    }

    pub fn with_geodetic(mut self, point: GeoPoint) -> Self {
        self.lat = Some(point.lat);
        self.lon = Some(point.lon);
        self
    }

    /// Start coordinates, local taking precedence over geodetic.
    pub fn start_point(&self) -> EngineResult<Option<RawPoint>> {
        match (self.x, self.y) {
            (Some(north), Some(east)) => {
                return Ok(Some(RawPoint::Local(LocalPoint::new(north, east))))
            }
            (None, None) => {}
            _ => {
                return Err(EngineError::Parse(
                    "local coordinates need both `x` and `y`".into(),
                ))
            }
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Some(RawPoint::Geodetic(GeoPoint::new(lat, lon)))),
            (None, None) => Ok(None),
            _ => Err(EngineError::Parse(
                "geodetic coordinates need both `lat` and `lon`".into(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVessel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub items: Vec<RawLeg>,
    /// Wall-clock start stamp written by some producers; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
}

impl RawVessel {
    pub fn new(items: Vec<RawLeg>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }
}

/// Raw vessel list, own vessel first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(into = "Vec<RawVessel>")]
pub struct RawScenario {
    pub vessels: Vec<RawVessel>,
}

impl<'de> Deserialize<'de> for RawScenario {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScenarioVisitor)
    }
}

/// Accepts an array of vessels or one bare route object, keeping the
/// underlying error of whichever form the input takes.
struct ScenarioVisitor;

impl<'de> Visitor<'de> for ScenarioVisitor {
    type Value = RawScenario;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of vessels or a single route object")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut vessels = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(vessel) = seq.next_element::<RawVessel>().map_err(|err| {
            <A::Error as de::Error>::custom(format_args!("vessel {}: {}", vessels.len(), err))
        })? {
            vessels.push(vessel);
        }
        Ok(RawScenario::new(vessels))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        let vessel = RawVessel::deserialize(MapAccessDeserializer::new(map))?;
        Ok(RawScenario::new(vec![vessel]))
    }
}

impl From<RawScenario> for Vec<RawVessel> {
    fn from(scenario: RawScenario) -> Self {
        scenario.vessels
    }
}

impl RawScenario {
    pub fn new(vessels: Vec<RawVessel>) -> Self {
        Self { vessels }
    }

    /// JSON in the array form accepted by [`crate::scenario::parse_document`].
    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(|source| EngineError::Json {
            origin: "raw scenario".into(),
            source,
        })
    }

    pub fn has_geodetic_points(&self) -> bool {
        self.vessels
            .iter()
            .flat_map(|vessel| vessel.items.iter())
            .any(|leg| leg.lat.is_some() || leg.lon.is_some())
    }
}
