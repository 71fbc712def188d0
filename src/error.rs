use thiserror::Error;

/// Errors surfaced at the edges of the simulator (config, CLI input, strict lookups).
///
/// The numerical core itself never fails: unknown gates are no-ops and a zero-norm
/// vector is returned unchanged by `normalize`.
#[derive(Debug, Error)]
pub enum SimError {
    /// Gate name not present in the active gate table
    #[error("unknown gate '{0}' (available: I, X, Z, H, S, T)")]
    UnknownGate(String),

    /// Attempted to normalize a vector whose norm is zero
    #[error("state vector has zero norm and cannot be normalized")]
    ZeroNorm,

    /// Amplitudes given on the command line or in a file are unusable
    #[error("invalid amplitudes: {0}")]
    InvalidAmplitudes(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_gate_message_names_gate() {
        let err = SimError::UnknownGate("Y".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("'Y'"));
        assert!(msg.contains("H"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SimError = io.into();
        assert!(matches!(err, SimError::Io(_)));
    }
}
