use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::environment::ParameterError;
use crate::core::models::ptm::ModificationError;
use crate::core::models::residue::ResidueError;
use crate::core::models::sequence::SequenceError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("Unsupported modification at residue {position}: {source}")]
    UnsupportedModification {
        position: usize,
        source: ModificationError,
    },

    #[error("Operation '{operation}' requires a protein sequence, but none is attached")]
    MissingSequence { operation: &'static str },

    #[error("Sequence error: {0}")]
    Sequence(SequenceError),

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}

impl From<SequenceError> for EngineError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::Residue {
                position,
                source: ResidueError::Modification(source),
            } => EngineError::UnsupportedModification { position, source },
            other => EngineError::Sequence(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::formula::FormulaError;

    #[test]
    fn modification_failures_surface_as_unsupported_modification() {
        let err = EngineError::from(SequenceError::Residue {
            position: 5,
            source: ResidueError::Modification(ModificationError::InertResidue {
                residue: "Ala",
            }),
        });
        assert!(matches!(
            err,
            EngineError::UnsupportedModification { position: 5, .. }
        ));
    }

    #[test]
    fn other_sequence_failures_stay_sequence_errors() {
        let err = EngineError::from(SequenceError::PositionOutOfRange {
            position: 500,
            length: 441,
        });
        assert!(matches!(err, EngineError::Sequence(_)));

        let err = EngineError::from(SequenceError::Residue {
            position: 3,
            source: ResidueError::Formula(FormulaError::UnknownElement {
                element: "X".to_string(),
                formula: "CH2X".to_string(),
            }),
        });
        assert!(matches!(err, EngineError::Sequence(_)));
    }

    #[test]
    fn messages_name_the_failing_operation() {
        let err = EngineError::MissingSequence {
            operation: "truncate",
        };
        assert!(err.to_string().contains("'truncate'"));
    }
}
