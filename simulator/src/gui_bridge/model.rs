use ktvizcore::constraints::{LimitationKind, LocalConstraint};
use ktvizcore::geo::{GeoPoint, LocalPoint};
use ktvizcore::kinematics::Tick;
use ktvizcore::proximity::RiskBand;
use ktvizcore::scenario::Frame;
use serde::Serialize;

/// Route polyline of one vessel.
#[derive(Debug, Clone, Serialize)]
pub struct VesselTrack {
    pub vessel_index: usize,
    pub points: Vec<LocalPoint>,
}

/// Preview markers of one vessel.
#[derive(Debug, Clone, Serialize)]
pub struct TickTrack {
    pub vessel_index: usize,
    pub ticks: Vec<Tick>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrafficLayer {
    pub source: String,
    pub origin: Option<GeoPoint>,
    pub frame: Frame,
    pub tracks: Vec<VesselTrack>,
    pub ticks: Vec<TickTrack>,
    /// Own vessel speed per leg, in knots.
    pub velocity_profile: Vec<f64>,
}

impl TrafficLayer {
    /// Text lines describing the frame, one per vessel and one per alarm.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{} @ {:.2} h ({:.0}%), safe radius {:.1} nm",
            self.source,
            self.frame.time_hours(),
            self.frame.percent,
            self.frame.safe_radius
        )];
        for vessel in &self.frame.vessels {
            lines.push(format!(
                "  {:<8} {:>5.1} knt  hdg {:>5.1}  {}",
                vessel.label,
                vessel.sample.speed_knots(),
                vessel.sample.heading,
                vessel.coordinate_text()
            ));
        }
        for record in &self.frame.proximity {
            let label = self
                .frame
                .vessel(record.vessel_index)
                .map(|vessel| vessel.label.as_str())
                .unwrap_or("?");
            let band = match record.band {
                RiskBand::Collision => "COLLISION",
                RiskBand::Caution => "caution",
                RiskBand::Clear => continue,
            };
            lines.push(format!("  {:<8} {:>6.2} nm  {}", label, record.distance, band));
        }
        lines
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstraintLayer {
    pub source: String,
    pub constraints: Vec<LocalConstraint>,
}

impl ConstraintLayer {
    pub fn summary(&self) -> String {
        let zones = self
            .constraints
            .iter()
            .filter(|constraint| {
                matches!(
                    constraint.kind,
                    LimitationKind::ZoneEnteringProhibition
                        | LimitationKind::MovementParametersLimitation
                )
            })
            .count();
        format!(
            "{}: {} constraints ({} zones)",
            self.source,
            self.constraints.len(),
            zones
        )
    }
}

/// One overlay drawn by the renderer, in load order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum Layer {
    Traffic(TrafficLayer),
    Constraints(ConstraintLayer),
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct VisualizationModel {
    pub layers: Vec<Layer>,
    pub notes: Vec<String>,
}

impl VisualizationModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn traffic(&self) -> impl Iterator<Item = &TrafficLayer> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Traffic(traffic) => Some(traffic),
            Layer::Constraints(_) => None,
        })
    }

    pub fn alarm_count(&self) -> usize {
        self.traffic()
            .flat_map(|layer| layer.frame.proximity.iter())
            .filter(|record| record.band.is_alarm())
            .count()
    }
}
