//! Domain errors for the pattern lifecycle.

use thiserror::Error;

/// Domain-level errors raised by the reducer.
///
/// The only failure is a caller violating the ingestion contract; every
/// other reducer operation is total.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pair {pair_id} cannot be ingested: disappearance of the finding was not confirmed")]
    UnconfirmedPair {
        /// Id of the rejected pair
        pair_id: String,
    },
}

/// Result alias for reducer operations.
pub type DomainResult<T> = Result<T, PatternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfirmed_pair_message_names_pair() {
        let err = PatternError::UnconfirmedPair {
            pair_id: "pair-42".to_string(),
        };
        assert!(err.to_string().contains("pair-42"));
    }
}
