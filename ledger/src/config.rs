//! Ledger configuration with TOML file support.

use feevote_types::Amount;
use feevote_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::fee::FeePolicy;
use crate::VotingError;

/// Length of the voting window: 3 days.
pub const VOTE_DURATION_SECS: u64 = 259_200;

/// Share of a closed vote's pool paid to the winner.
pub const WINNER_PAYOUT_PERCENT: u8 = 90;

/// Fewest candidates a vote may be created with.
pub const MIN_CANDIDATES: usize = 2;

/// Configuration for a voting ledger.
///
/// Can be loaded from a TOML file via [`LedgerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Fee required to cast one ballot, in raw units.
    #[serde(default = "default_vote_fee", with = "amount_as_u64")]
    pub vote_fee: Amount,

    /// Whether ballots must carry the exact fee or at least the fee.
    #[serde(default)]
    pub fee_policy: FeePolicy,

    /// Length of the voting window in seconds.
    #[serde(default = "default_vote_duration")]
    pub vote_duration_secs: u64,

    /// Percentage of the pool paid to the winner; the rest is retained as fee.
    #[serde(default = "default_payout_percent")]
    pub payout_percent: u8,

    /// Minimum number of candidates per vote.
    #[serde(default = "default_min_candidates")]
    pub min_candidates: usize,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_vote_fee() -> Amount {
    // 0.01 of a whole unit.
    Amount::new(Amount::UNIT / 100)
}

fn default_vote_duration() -> u64 {
    VOTE_DURATION_SECS
}

fn default_payout_percent() -> u8 {
    WINNER_PAYOUT_PERCENT
}

fn default_min_candidates() -> usize {
    MIN_CANDIDATES
}

fn default_log_level() -> String {
    "info".to_string()
}

// TOML integers are 64-bit, so the fee travels as a u64 in config files.
mod amount_as_u64 {
    use feevote_types::Amount;
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = u64::try_from(amount.raw())
            .map_err(|_| <S::Error as ser::Error>::custom("vote_fee does not fit in 64 bits"))?;
        serializer.serialize_u64(raw)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let raw = u64::deserialize(deserializer)
            .map_err(|e| <D::Error as de::Error>::custom(format!("vote_fee: {e}")))?;
        Ok(Amount::new(u128::from(raw)))
    }
}

// ── Impl ───────────────────────────────────────────────────────────────

impl LedgerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, VotingError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| VotingError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, VotingError> {
        let config: Self = toml::from_str(s).map_err(|e| VotingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, VotingError> {
        toml::to_string_pretty(self).map_err(|e| VotingError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber using `log_format` and `log_level`.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber is already installed.
    pub fn init_logging(&self) {
        feevote_utils::init_logging(self.log_format, &self.log_level);
    }

    /// Reject values the ledger cannot operate with.
    pub fn validate(&self) -> Result<(), VotingError> {
        if self.payout_percent > 100 {
            return Err(VotingError::Config(format!(
                "payout_percent must be at most 100, got {}",
                self.payout_percent
            )));
        }
        if self.min_candidates < MIN_CANDIDATES {
            return Err(VotingError::Config(format!(
                "min_candidates must be at least {MIN_CANDIDATES}, got {}",
                self.min_candidates
            )));
        }
        if self.vote_duration_secs == 0 {
            return Err(VotingError::Config("vote_duration_secs must be positive".into()));
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            vote_fee: default_vote_fee(),
            fee_policy: FeePolicy::default(),
            vote_duration_secs: default_vote_duration(),
            payout_percent: default_payout_percent(),
            min_candidates: default_min_candidates(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = LedgerConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = LedgerConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = LedgerConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.vote_duration_secs, 259_200);
        assert_eq!(config.payout_percent, 90);
        assert_eq!(config.vote_fee, Amount::new(10_000_000_000_000_000));
        assert_eq!(config.fee_policy, FeePolicy::AtLeast);
        assert_eq!(config.log_format, LogFormat::Human);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            vote_fee = 500
            fee_policy = "exact"
            log_format = "json"
        "#;
        let config = LedgerConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.vote_fee, Amount::new(500));
        assert_eq!(config.fee_policy, FeePolicy::Exact);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.payout_percent, 90); // default
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(matches!(
            LedgerConfig::from_toml_str("payout_percent = 101"),
            Err(VotingError::Config(_))
        ));
        assert!(matches!(
            LedgerConfig::from_toml_str("min_candidates = 1"),
            Err(VotingError::Config(_))
        ));
        assert!(matches!(
            LedgerConfig::from_toml_str("vote_duration_secs = 0"),
            Err(VotingError::Config(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "vote_duration_secs = 60").unwrap();
        let config = LedgerConfig::from_toml_file(file.path()).expect("should load");
        assert_eq!(config.vote_duration_secs, 60);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = LedgerConfig::from_toml_file("/nonexistent/feevote.toml");
        assert!(matches!(result, Err(VotingError::Config(_))));
    }
}
