use anyhow::{bail, Context};
use clap::Parser;
use generator::profile::{build_encounter, stroke_leg, GeneratorConfig};
use generator::template::{template, TEMPLATE_NAMES};
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::{Layer, VisualizationModel};
use ktvizcore::geo::{GeoPoint, LocalPoint};
use ktvizcore::scenario::{RawScenario, RawVessel};
use std::fs;
use std::path::{Path, PathBuf};
use workflow::config::PlaybackConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Replays maritime traffic scenarios and flags close approaches")]
struct Args {
    /// Scenario or constraint JSON files, drawn in order
    files: Vec<PathBuf>,
    /// Also process every *.json file in this directory
    #[arg(long, short = 'a')]
    all: Option<PathBuf>,
    /// Load playback settings from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Point in time as percent of the scenario duration
    #[arg(long, default_value_t = 0.0)]
    percent: f64,
    /// Safe radius in nautical miles
    #[arg(long, default_value_t = 1.0)]
    radius: f64,
    /// Seconds between preview ticks
    #[arg(long)]
    interval: Option<f64>,
    /// Number of preview ticks per vessel
    #[arg(long)]
    ticks: Option<usize>,
    /// Show positions in nm even for geodetic scenarios
    #[arg(long, default_value_t = false)]
    local: bool,
    /// Write the visualization model as JSON
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
    /// Write a generated scenario to this path and replay it
    #[arg(long)]
    generate: Option<PathBuf>,
    /// Use a canned encounter for --generate instead of a random one
    #[arg(long)]
    template: Option<String>,
    /// Straight route from a drawn stroke, NORTH1,EAST1,NORTH2,EAST2 in nm;
    /// the first stroke is the own vessel
    #[arg(long = "stroke", value_parser = parse_stroke)]
    strokes: Vec<(LocalPoint, LocalPoint)>,
    /// Hours each stroke takes to sail
    #[arg(long, default_value_t = 2.0)]
    horizon: f64,
    #[arg(long, default_value_t = 3)]
    targets: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Latitude/longitude origin for generated scenarios, e.g. 60.0,30.0
    #[arg(long, value_parser = parse_origin)]
    origin: Option<GeoPoint>,
}

fn parse_origin(text: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = text
        .split_once(',')
        .ok_or_else(|| "expected LAT,LON".to_string())?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("bad latitude {}", lat))?;
    let lon: f64 = lon.trim().parse().map_err(|_| format!("bad longitude {}", lon))?;
    Ok(GeoPoint::new(lat, lon))
}

fn parse_stroke(text: &str) -> Result<(LocalPoint, LocalPoint), String> {
    let values = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("bad stroke {}: {}", text, err))?;
    match values.as_slice() {
        [n1, e1, n2, e2] => Ok((LocalPoint::new(*n1, *e1), LocalPoint::new(*n2, *e2))),
        _ => Err("expected NORTH1,EAST1,NORTH2,EAST2".to_string()),
    }
}

fn json_files_in(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().map_or(false, |ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn write_generated(args: &Args, path: &Path) -> anyhow::Result<()> {
    let raw = match args.template.as_deref() {
        Some(name) => template(name).with_context(|| {
            format!("unknown template {}, expected one of {:?}", name, TEMPLATE_NAMES)
        })?,
        None if !args.strokes.is_empty() => {
            let vessels = args
                .strokes
                .iter()
                .map(|(start, end)| {
                    stroke_leg(*start, *end, args.horizon)
                        .map(|leg| RawVessel::new(vec![leg]))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            RawScenario::new(vessels)
        }
        None => build_encounter(&GeneratorConfig {
            targets: args.targets,
            horizon_hours: args.horizon,
            seed: args.seed,
            origin: args.origin,
            ..Default::default()
        })?,
    };
    fs::write(path, raw.to_json()?).with_context(|| format!("writing {}", path.display()))?;
    println!("Generated scenario -> {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.workflow {
        PlaybackConfig::load(path)?
    } else {
        PlaybackConfig::from_args(args.percent, args.radius)
    };
    if let Some(interval) = args.interval {
        config.tick_interval = interval;
    }
    if let Some(count) = args.ticks {
        config.tick_count = count;
    }
    if args.local {
        config.show_geodetic = false;
    }
    if args.output.is_some() {
        config.output = args.output.clone();
    }
    let config = config.clamped();

    let mut files = args.files.clone();
    if let Some(path) = &args.generate {
        write_generated(&args, path)?;
        files.push(path.clone());
    }
    if let Some(dir) = &args.all {
        println!("Making for all files in path: {}", dir.display());
        files.extend(json_files_in(dir)?);
    }
    if files.is_empty() {
        bail!("no scenario files given");
    }

    let runner = Runner::new(config.clone());
    let bridge = GuiBridge::new(config.output.clone());
    let mut model = VisualizationModel::new();
    let mut anchor: Option<GeoPoint> = None;
    let mut failures = 0;

    for path in &files {
        match runner.process(path, anchor) {
            Ok(layer) => {
                match &layer {
                    Layer::Traffic(traffic) => {
                        anchor = traffic.origin.or(anchor);
                        for line in traffic.summary() {
                            println!("{}", line);
                        }
                    }
                    Layer::Constraints(constraints) => println!("{}", constraints.summary()),
                }
                model.layers.push(layer);
            }
            Err(err) => {
                failures += 1;
                eprintln!("{}: {:#}", path.display(), err);
                model.notes.push(format!("{}: {:#}", path.display(), err));
            }
        }
    }

    bridge.publish(&model)?;
    if failures > 0 {
        bridge.publish_status(&format!("{} of {} files failed", failures, files.len()));
    }
    if failures == files.len() {
        bail!("none of the {} files could be processed", files.len());
    }
    Ok(())
}
