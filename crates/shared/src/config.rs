//! Application configuration management.

use serde::Deserialize;

use crate::error::{CalcError, CalcResult};
use crate::types::RoundingMode;

/// Largest scale `rust_decimal` can represent.
pub const MAX_SCALE: u32 = 28;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Rounding and currency defaults.
    #[serde(default)]
    pub rounding: RoundingConfig,
}

/// Process-wide rounding defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RoundingConfig {
    /// Currency used when a caller passes an empty code.
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Scale used for currencies missing from the registry.
    #[serde(default = "default_scale")]
    pub default_scale: u32,
    /// Rounding mode used for currencies missing from the registry.
    #[serde(default)]
    pub default_mode: RoundingMode,
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_scale() -> u32 {
    2
}

impl Default for RoundingConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            default_scale: default_scale(),
            default_mode: RoundingMode::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from `.env`, config files and the environment.
    ///
    /// Sources, lowest priority first: `config/default`, `config/{RUN_MODE}`,
    /// then `TALLY__*` environment variables (e.g.
    /// `TALLY__ROUNDING__DEFAULT_CURRENCY=USD`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is out of range.
    pub fn load() -> CalcResult<Self> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Checks that configured values are usable by the engine.
    ///
    /// # Errors
    ///
    /// Returns `CalcError::Config` describing the first invalid value.
    pub fn validate(&self) -> CalcResult<()> {
        let rounding = &self.rounding;
        if rounding.default_currency.trim().is_empty() {
            return Err(CalcError::Config(
                "rounding.default_currency must not be empty".to_string(),
            ));
        }
        if rounding.default_scale > MAX_SCALE {
            return Err(CalcError::Config(format!(
                "rounding.default_scale must be at most {MAX_SCALE}"
            )));
        }
        Ok(())
    }
}
