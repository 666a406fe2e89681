use crate::gui_bridge::model::{ConstraintLayer, Layer, TickTrack, TrafficLayer, VesselTrack};
use crate::workflow::config::PlaybackConfig;
use anyhow::{anyhow, Context};
use ktvizcore::constraints::ConstraintSet;
use ktvizcore::geo::{GeoPoint, TangentPlane};
use ktvizcore::kinematics::ticks;
use ktvizcore::scenario::{load_document, Assembler, Document, RawScenario, Scenario};
use std::path::Path;

/// Points per arc leg when tracing routes for the renderer.
const ARC_SEGMENTS: usize = 100;

#[derive(Clone)]
pub struct Runner {
    config: PlaybackConfig,
}

impl Runner {
    pub fn new(config: PlaybackConfig) -> Self {
        Self { config }
    }

    /// Loads one input file and turns it into a renderer layer. Constraint
    /// files are projected around `anchor`, the origin of the traffic loaded
    /// before them.
    pub fn process(&self, path: &Path, anchor: Option<GeoPoint>) -> anyhow::Result<Layer> {
        let source = path.display().to_string();
        let document =
            load_document(path).with_context(|| format!("loading {}", path.display()))?;
        match document {
            Document::Traffic(raw) => {
                let (_, layer) = self
                    .execute_raw(&raw, &source)
                    .with_context(|| format!("assembling {}", path.display()))?;
                Ok(Layer::Traffic(layer))
            }
            Document::Constraints(set) => {
                let anchor = anchor.ok_or_else(|| {
                    anyhow!(
                        "{} holds constraints but no geodetic scenario was loaded before it",
                        source
                    )
                })?;
                let layer = self
                    .project_constraints(&set, anchor, &source)
                    .with_context(|| format!("projecting constraints from {}", path.display()))?;
                Ok(Layer::Constraints(layer))
            }
        }
    }

    pub fn execute_raw(
        &self,
        raw: &RawScenario,
        source: &str,
    ) -> anyhow::Result<(Scenario, TrafficLayer)> {
        let scenario = Assembler::new().assemble(raw)?;
        let layer = self.execute(&scenario, source);
        Ok((scenario, layer))
    }

    /// Evaluates the configured instant plus previews for an assembled scenario.
    pub fn execute(&self, scenario: &Scenario, source: &str) -> TrafficLayer {
        let mut frame = scenario.snapshot(self.config.percent, self.config.safe_radius);
        if !self.config.show_geodetic {
            for vessel in &mut frame.vessels {
                vessel.geodetic = None;
            }
        }

        let tracks = scenario
            .vessels()
            .iter()
            .map(|vessel| VesselTrack {
                vessel_index: vessel.index,
                points: vessel
                    .route
                    .legs()
                    .iter()
                    .flat_map(|leg| leg.polyline(ARC_SEGMENTS))
                    .collect(),
            })
            .collect();

        let tick_tracks = scenario
            .vessels()
            .iter()
            .map(|vessel| TickTrack {
                vessel_index: vessel.index,
                ticks: ticks(
                    &vessel.route,
                    self.config.tick_interval,
                    self.config.tick_count,
                )
                .collect(),
            })
            .collect();

        let velocity_profile = scenario
            .own_vessel()
            .route
            .velocity_series()
            .into_iter()
            .map(|speed| speed * 3600.0)
            .collect();

        TrafficLayer {
            source: source.to_string(),
            origin: scenario.origin(),
            frame,
            tracks,
            ticks: tick_tracks,
            velocity_profile,
        }
    }

    pub fn project_constraints(
        &self,
        set: &ConstraintSet,
        anchor: GeoPoint,
        source: &str,
    ) -> anyhow::Result<ConstraintLayer> {
        let constraints = set.to_local(&TangentPlane, anchor)?;
        Ok(ConstraintLayer {
            source: source.to_string(),
            constraints,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::template::{template, CROSSING};
    use ktvizcore::proximity::RiskBand;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn runner_executes_crossing_template() {
        let runner = Runner::new(PlaybackConfig::from_args(50.0, 0.5));
        let raw = template(CROSSING).unwrap();
        let (scenario, layer) = runner.execute_raw(&raw, "crossing").unwrap();
        assert_eq!(layer.frame.vessels.len(), scenario.vessels().len());
        assert_eq!(layer.tracks.len(), 2);
        assert_eq!(layer.velocity_profile.len(), scenario.own_vessel().route.legs().len());
        assert!(layer.origin.is_none());
        assert_eq!(layer.frame.proximity.len(), 1);
        assert_eq!(layer.frame.proximity[0].band, RiskBand::Collision);
    }

    #[test]
    fn ticks_follow_config() {
        let mut config = PlaybackConfig::from_args(0.0, 1.0);
        config.tick_interval = 600.0;
        config.tick_count = 4;
        let runner = Runner::new(config);
        let (_, layer) = runner
            .execute_raw(&template(CROSSING).unwrap(), "crossing")
            .unwrap();
        assert!(layer.ticks.iter().all(|track| track.ticks.len() <= 4));
        assert_eq!(layer.ticks[0].ticks[1].time, 600.0);
    }

    #[test]
    fn constraints_need_an_anchor() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(br#"{"type": "FeatureCollection", "features": []}"#)
            .unwrap();
        let path = temp.into_temp_path();
        let runner = Runner::new(PlaybackConfig::default());
        assert!(runner.process(&path, None).is_err());
        let layer = runner
            .process(&path, Some(GeoPoint::new(60.0, 30.0)))
            .unwrap();
        assert!(matches!(layer, Layer::Constraints(_)));
    }

    #[test]
    fn hidden_geodetic_coordinates_are_stripped() {
        let mut config = PlaybackConfig::from_args(0.0, 1.0);
        config.show_geodetic = false;
        let runner = Runner::new(config);
        let raw: RawScenario = serde_json::from_str(
            r#"[{"items": [{"begin_angle": 0, "curve": 0, "length": 1, "duration": 600,
                            "lat": 60.0, "lon": 30.0}]}]"#,
        )
        .unwrap();
        let (_, layer) = runner.execute_raw(&raw, "inline").unwrap();
        assert!(layer.origin.is_some());
        assert!(layer.frame.vessels[0].geodetic.is_none());
    }
}
