use crate::gui_bridge::model::VisualizationModel;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Hands the visualization model to the renderer as a JSON file.
pub struct GuiBridge {
    output: Option<PathBuf>,
}

impl GuiBridge {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }

    pub fn publish(&self, model: &VisualizationModel) -> Result<()> {
        println!(
            "[render] layers: {}, alarms: {}",
            model.layers.len(),
            model.alarm_count()
        );
        let Some(path) = self.output.as_ref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(model).context("encoding visualization model")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("visualization model written to {}", path.display());
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[render] {}", message);
    }
}
