//! Terminal game configuration.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use impostor::{
    SessionConfig,
    bot::PacingParams,
    game::TieBreak,
};
use std::{fmt::Display, str::FromStr};

/// Complete configuration loaded from environment variables and flags
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Settings handed to the session actor
    pub session: SessionConfig,
    /// Bot thinking time; `None` keeps the per-style defaults
    pub pacing: Option<PacingParams>,
}

impl CliConfig {
    /// Load configuration from the process environment
    ///
    /// # Arguments
    ///
    /// * `name_override` - Player name from `--name`
    /// * `seed_override` - Seed from `--seed`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set but does not parse
    pub fn from_env(
        name_override: Option<String>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), name_override, seed_override)
    }

    /// Same as [`CliConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        name_override: Option<String>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let defaults = SessionConfig::default();

        let name = name_override
            .or_else(|| lookup("IMPOSTOR_PLAYER_NAME"))
            .unwrap_or_default();

        let seed = match seed_override {
            Some(seed) => Some(seed),
            None => parse_optional(&lookup, "IMPOSTOR_SEED")?,
        };

        let session = SessionConfig {
            generation_timeout_ms: parse_env_or(
                &lookup,
                "IMPOSTOR_GENERATION_TIMEOUT_MS",
                defaults.generation_timeout_ms,
            )?,
            tie_break: parse_env_or(&lookup, "IMPOSTOR_TIE_BREAK", TieBreak::default())?,
            seed,
            ..defaults
        }
        .with_player_name(&name);

        let pacing = match parse_optional::<u64>(&lookup, "IMPOSTOR_BOT_THINK_MS")? {
            Some(base_think_time_ms) => Some(PacingParams {
                base_think_time_ms,
                think_time_variance_ms: parse_env_or(
                    &lookup,
                    "IMPOSTOR_BOT_THINK_VARIANCE_MS",
                    0,
                )?,
            }),
            None => None,
        };

        Ok(CliConfig { session, pacing })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pacing) = self.pacing {
            if pacing.think_time_variance_ms > pacing.base_think_time_ms {
                return Err(ConfigError::Invalid {
                    var: "IMPOSTOR_BOT_THINK_VARIANCE_MS".to_string(),
                    reason: format!(
                        "Must not exceed IMPOSTOR_BOT_THINK_MS ({})",
                        pacing.base_think_time_ms
                    ),
                });
            }
        }

        let var = if self.session.generation_timeout_ms == 0 {
            "IMPOSTOR_GENERATION_TIMEOUT_MS"
        } else {
            "IMPOSTOR_PLAYER_NAME"
        };
        self.session
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: var.to_string(),
                reason,
            })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse a variable if it is set.
fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                var: key.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Helper to parse an environment variable with default fallback
fn parse_env_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    Ok(parse_optional(lookup, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<CliConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned(), None, None)
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = load(&[]).unwrap();
        assert_eq!(config.session, SessionConfig::default());
        assert!(config.pacing.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_variables_are_applied() {
        let config = load(&[
            ("IMPOSTOR_PLAYER_NAME", "Robin"),
            ("IMPOSTOR_SEED", "42"),
            ("IMPOSTOR_GENERATION_TIMEOUT_MS", "2500"),
            ("IMPOSTOR_TIE_BREAK", "no-accusation"),
            ("IMPOSTOR_BOT_THINK_MS", "800"),
            ("IMPOSTOR_BOT_THINK_VARIANCE_MS", "200"),
        ])
        .unwrap();

        assert_eq!(config.session.seed, Some(42));
        assert_eq!(config.session.generation_timeout_ms, 2500);
        assert_eq!(config.session.tie_break, TieBreak::NoAccusation);
        let human = config.session.roster.iter().find(|p| p.is_human()).unwrap();
        assert_eq!(human.display_name, "Robin");
        assert_eq!(
            config.pacing,
            Some(PacingParams {
                base_think_time_ms: 800,
                think_time_variance_ms: 200,
            })
        );
    }

    #[test]
    fn test_overrides_win_over_variables() {
        let config = CliConfig::from_lookup(
            |key| (key == "IMPOSTOR_SEED").then(|| "1".to_string()),
            Some("Sam".to_string()),
            Some(9),
        )
        .unwrap();
        assert_eq!(config.session.seed, Some(9));
        assert!(config.session.roster.iter().any(|p| p.display_name == "Sam"));
    }

    #[test]
    fn test_unparseable_value_is_invalid() {
        let err = load(&[("IMPOSTOR_SEED", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "IMPOSTOR_SEED"));
        assert!(load(&[("IMPOSTOR_TIE_BREAK", "coin-flip")]).is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let config = load(&[("IMPOSTOR_GENERATION_TIMEOUT_MS", "0")]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_config_validation_multi_word_name() {
        let config = load(&[("IMPOSTOR_PLAYER_NAME", "Mary Jane")]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref var, .. }) if var == "IMPOSTOR_PLAYER_NAME"
        ));
    }

    #[test]
    fn test_config_validation_variance_above_base() {
        let config = load(&[
            ("IMPOSTOR_BOT_THINK_MS", "100"),
            ("IMPOSTOR_BOT_THINK_VARIANCE_MS", "500"),
        ])
        .unwrap();
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("IMPOSTOR_BOT_THINK_VARIANCE_MS"));
    }
}
