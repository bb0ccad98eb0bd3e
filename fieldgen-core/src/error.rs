use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("field name cannot be empty")]
    EmptyFieldName,
    #[error("field \"{0}\" is declared more than once")]
    DuplicateField(String),
    #[error("attempt to change initializer for field \"{field}\", from \"{previous}\" to \"{attempted}\"")]
    InitializerConflict {
        field: String,
        previous: String,
        attempted: String,
    },
    #[error("unknown field \"{0}\"")]
    UnknownField(String),
    #[error("unable to complete field \"{field}\": {message}")]
    UnableToComplete { field: String, message: String },
    #[error("dependency cycle between fields: {}", .cycle.join(" -> "))]
    CycleDetected { cycle: Vec<String> },
    #[error("field \"{field}\" failed to emit earlier in this pass")]
    Aborted { field: String },
    #[error("failed to read source: {0}")]
    SourceIo(#[from] std::io::Error),
    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },
    #[error("type catalog directory was not found at {0}")]
    MissingCatalog(PathBuf),
    #[error("catalog error in {path}:{line}: {message}")]
    CatalogError {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl CoreError {
    /// True for errors caused by a caller breaking the builder contract.
    ///
    /// These indicate a bug in whatever constructs the field graph and are
    /// never worth retrying.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            CoreError::EmptyFieldName
                | CoreError::DuplicateField(_)
                | CoreError::InitializerConflict { .. }
                | CoreError::UnknownField(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_the_path() {
        let err = CoreError::CycleDetected {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "dependency cycle between fields: a -> b -> a");
    }

    #[test]
    fn classifies_contract_violations() {
        assert!(CoreError::EmptyFieldName.is_contract_violation());
        assert!(
            CoreError::InitializerConflict {
                field: "f".into(),
                previous: "a".into(),
                attempted: "b".into(),
            }
            .is_contract_violation()
        );
        assert!(!CoreError::Aborted { field: "f".into() }.is_contract_violation());
    }
}
