//! Error types for overlap

use thiserror::Error;

/// The main error type for overlap operations
#[derive(Debug, Error)]
pub enum OverlapError {
    /// The evaluator produced a material group whose material has no
    /// presentation counterpart. Indicates the material map was built wrong.
    #[error("Unmapped material: {0}")]
    UnmappedMaterial(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl OverlapError {
    /// Whether the error is an invariant violation that must halt the editor
    pub fn is_fatal(&self) -> bool {
        matches!(self, OverlapError::UnmappedMaterial(_))
    }
}

/// Result type alias for overlap operations
pub type Result<T> = std::result::Result<T, OverlapError>;

impl From<toml::de::Error> for OverlapError {
    fn from(err: toml::de::Error) -> Self {
        OverlapError::TomlParse(err.to_string())
    }
}

impl From<toml::ser::Error> for OverlapError {
    fn from(err: toml::ser::Error) -> Self {
        OverlapError::TomlSer(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unmapped_material_is_fatal() {
        assert!(OverlapError::UnmappedMaterial("grid#3".into()).is_fatal());
        assert!(!OverlapError::Evaluation("degenerate".into()).is_fatal());
        assert!(!OverlapError::Config("bad".into()).is_fatal());
    }

    #[test]
    fn toml_errors_convert() {
        let err: OverlapError = toml::from_str::<toml::Value>("= nope")
            .unwrap_err()
            .into();
        assert!(matches!(err, OverlapError::TomlParse(_)));
    }
}
