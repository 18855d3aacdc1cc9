use std::path::PathBuf;

/// Failures that abort a facts invocation. Every variant is fatal and
/// discards whatever was computed so far.
#[derive(Debug, thiserror::Error)]
pub enum FactsError {
    #[error("parameter {name} is required")]
    MissingParameter { name: String },

    #[error("could not render parameter {name}: {reason}")]
    Template { name: String, reason: String },

    #[error("could not parse model file '{}': {reason}", path.display())]
    ModelParse { path: PathBuf, reason: String },

    #[error("{0}")]
    RoleResolution(String),
}

impl FactsError {
    pub fn missing(name: impl Into<String>) -> Self {
        FactsError::MissingParameter { name: name.into() }
    }
}
