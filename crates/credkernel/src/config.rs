//! Verifier configuration.

use serde::{Deserialize, Serialize};

use credkernel_core::Parameters;
use credkernel_sig::SignatureConfig;

use crate::error::{KernelError, Result};

/// Configuration for the [`Verifier`](crate::Verifier).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Cryptographic parameters.
    pub parameters: Parameters,
    /// Signature verification policy.
    pub signatures: SignatureConfig,
}

impl VerifierConfig {
    /// Load from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| KernelError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.parameters.validate()?;
        if !self.signatures.max_age.is_positive() || !self.signatures.max_credential_age.is_positive()
        {
            return Err(KernelError::Config("signature ages must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credkernel_core::Time;

    #[test]
    fn test_defaults_are_valid() {
        VerifierConfig::default().validate().unwrap();
    }

    #[test]
    fn test_from_json_partial() {
        let config = VerifierConfig::from_json(r#"{"signatures": {"accept_unsigned": true}}"#).unwrap();
        assert!(config.signatures.accept_unsigned);
        assert_eq!(config.signatures.max_age, Time::YEAR);
        assert_eq!(config.parameters, Parameters::default());
    }

    #[test]
    fn test_from_json_rejects_weak_parameters() {
        assert!(matches!(
            VerifierConfig::from_json(r#"{"parameters": {"hash_bits": 64}}"#),
            Err(KernelError::Core(_))
        ));
        assert!(matches!(
            VerifierConfig::from_json("not json"),
            Err(KernelError::Config(_))
        ));
    }
}
