use crate::constraints::feature::{ConstraintSet, FEATURE_COLLECTION};
use crate::prelude::{EngineError, EngineResult};
use crate::scenario::raw::RawScenario;
use crate::telemetry::log::LogManager;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A decoded input file: either vessel routes or static constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Traffic(RawScenario),
    Constraints(ConstraintSet),
}

fn is_constraint_document(value: &Value) -> bool {
    value
        .get("type")
        .and_then(Value::as_str)
        .map_or(false, |kind| kind == FEATURE_COLLECTION)
}

/// Decodes `text`, dispatching on the `type` discriminator. `origin` names the
/// source in error messages.
pub fn parse_document(text: &str, origin: &str) -> EngineResult<Document> {
    let json_error = |source: serde_json::Error| EngineError::Json {
        origin: origin.to_string(),
        source,
    };
    let value: Value = serde_json::from_str(text).map_err(json_error)?;
    let logger = LogManager::new("loader");
    if is_constraint_document(&value) {
        let set = ConstraintSet::deserialize(value).map_err(json_error)?;
        logger.record(&format!(
            "{}: constraint set with {} features",
            origin,
            set.features.len()
        ));
        Ok(Document::Constraints(set))
    } else {
        let raw = RawScenario::deserialize(value).map_err(json_error)?;
        logger.record(&format!("{}: traffic with {} vessels", origin, raw.vessels.len()));
        Ok(Document::Traffic(raw))
    }
}

/// Reads and decodes a scenario or constraint file.
pub fn load_document<P: AsRef<Path>>(path: P) -> EngineResult<Document> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref).map_err(|source| EngineError::Io {
        path: path_ref.to_path_buf(),
        source,
    })?;
    parse_document(&contents, &path_ref.display().to_string())
}
