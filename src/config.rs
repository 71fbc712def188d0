use crate::error::{Result, SimError};
use crate::gates::{GateTable, HadamardForm};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// display precision above this is just noise from the float representation
const MAX_PRECISION: usize = 15;

/// Session settings. Every field is optional in the JSON file.
///
/// ```json
/// { "seed": 42, "hadamard": "textbook", "precision": 6 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Seed for the measurement rng. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub hadamard: HadamardForm,
    /// Decimal places when printing amplitudes and angles.
    pub precision: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            seed: None,
            hadamard: HadamardForm::Observed,
            precision: 4,
        }
    }
}

impl SessionConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(SimError::Config(format!(
                "precision must be at most {}, got {}",
                MAX_PRECISION, self.precision
            )));
        }
        Ok(())
    }

    pub fn gate_table(&self) -> GateTable {
        GateTable::for_form(self.hadamard)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.gate_table().form(), HadamardForm::Observed);
    }

    #[test]
    fn test_parses_all_fields() {
        let config =
            SessionConfig::from_json(r#"{"seed": 42, "hadamard": "textbook", "precision": 6}"#)
                .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.hadamard, HadamardForm::Textbook);
        assert_eq!(config.precision, 6);
    }

    #[test]
    fn test_rejects_unknown_field_and_bad_precision() {
        assert!(matches!(
            SessionConfig::from_json(r#"{"noise": 0.1}"#),
            Err(SimError::Json(_))
        ));
        assert!(matches!(
            SessionConfig::from_json(r#"{"precision": 40}"#),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = SessionConfig {
            seed: Some(5),
            ..SessionConfig::default()
        };
        let a: f64 = config.rng().gen();
        let b: f64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"hadamard": "observed", "seed": 1}}"#).unwrap();
        let config = SessionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.seed, Some(1));

        let missing = SessionConfig::from_file(file.path().with_extension("nope"));
        assert!(matches!(missing, Err(SimError::Io(_))));
    }
}
