pub mod types;

use std::path::Path;

use crate::error::FactsError;
use types::Model;

/// Read and parse a CONGA model file. The model is never cached, every
/// invocation reads it fresh.
pub fn load_model(path: &Path) -> Result<Model, FactsError> {
    let content = std::fs::read_to_string(path).map_err(|e| FactsError::ModelParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    parse_model(&content).map_err(|e| FactsError::ModelParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub fn parse_model(content: &str) -> Result<Model, serde_yaml::Error> {
    serde_yaml::from_str(content)
}
