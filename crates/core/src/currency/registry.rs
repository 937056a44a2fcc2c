//! Currency registry.
//!
//! A data-driven table mapping currency codes to their scale and default
//! rounding mode. The table is fixed at construction; lookups are
//! case-insensitive and never fail.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tally_shared::config::{AppConfig, MAX_SCALE, RoundingConfig};
use tally_shared::types::money::normalize_code;
use tally_shared::RoundingMode;

/// Scale, rounding mode and display metadata for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// ISO 4217 code, upper case.
    pub code: String,
    /// Number of fractional digits in one minor unit.
    pub scale: u32,
    /// Mode used when rounding amounts in this currency.
    pub rounding_mode: RoundingMode,
    /// Display symbol.
    pub symbol: String,
    /// BCP 47 locale tag used for display.
    pub locale: String,
}

/// (code, scale, rounding mode, symbol, locale)
type CurrencyRow = (&'static str, u32, RoundingMode, &'static str, &'static str);

const BUILTIN_CURRENCIES: &[CurrencyRow] = &[
    ("INR", 2, RoundingMode::HalfEven, "₹", "en-IN"),
    ("USD", 2, RoundingMode::HalfEven, "$", "en-US"),
    ("EUR", 2, RoundingMode::HalfEven, "€", "de-DE"),
    ("GBP", 2, RoundingMode::HalfEven, "£", "en-GB"),
    ("JPY", 0, RoundingMode::HalfEven, "¥", "ja-JP"),
    ("IDR", 2, RoundingMode::HalfEven, "Rp", "id-ID"),
    ("SGD", 2, RoundingMode::HalfEven, "S$", "en-SG"),
    ("AED", 2, RoundingMode::HalfEven, "د.إ", "ar-AE"),
    ("CNY", 2, RoundingMode::HalfEven, "¥", "zh-CN"),
    ("KWD", 3, RoundingMode::HalfEven, "د.ك", "ar-KW"),
    ("BHD", 3, RoundingMode::HalfEven, ".د.ب", "ar-BH"),
    ("OMR", 3, RoundingMode::HalfEven, "ر.ع.", "ar-OM"),
    ("CHF", 2, RoundingMode::HalfEven, "CHF", "de-CH"),
    ("AUD", 2, RoundingMode::HalfEven, "A$", "en-AU"),
    ("CAD", 2, RoundingMode::HalfEven, "C$", "en-CA"),
];

static GLOBAL_REGISTRY: Lazy<CurrencyRegistry> = Lazy::new(CurrencyRegistry::builtin);

/// Lookup table of supported currencies.
#[derive(Debug, Clone)]
pub struct CurrencyRegistry {
    currencies: HashMap<String, CurrencyConfig>,
    defaults: RoundingConfig,
}

impl CurrencyRegistry {
    /// Builds a registry from the builtin table with default settings.
    #[must_use]
    pub fn builtin() -> Self {
        Self::with_defaults(RoundingConfig::default())
    }

    /// Builds a registry from the builtin table using configured defaults.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_defaults(config.rounding.clone())
    }

    fn with_defaults(mut defaults: RoundingConfig) -> Self {
        defaults.default_currency = normalize_code(&defaults.default_currency);
        defaults.default_scale = defaults.default_scale.min(MAX_SCALE);

        let currencies = BUILTIN_CURRENCIES
            .iter()
            .map(|&(code, scale, rounding_mode, symbol, locale)| {
                (
                    code.to_string(),
                    CurrencyConfig {
                        code: code.to_string(),
                        scale,
                        rounding_mode,
                        symbol: symbol.to_string(),
                        locale: locale.to_string(),
                    },
                )
            })
            .collect();

        Self {
            currencies,
            defaults,
        }
    }

    /// Process-wide registry built from the builtin table.
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    /// Looks up a currency by code, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CurrencyConfig> {
        self.currencies.get(&normalize_code(code))
    }

    /// Returns the configuration for `code`, never failing.
    ///
    /// An empty code resolves to the default currency. An unknown code gets
    /// the default scale and rounding mode, with the code itself as symbol.
    #[must_use]
    pub fn resolve(&self, code: &str) -> CurrencyConfig {
        let code = normalize_code(code);
        let code = if code.is_empty() {
            self.defaults.default_currency.clone()
        } else {
            code
        };

        if let Some(config) = self.currencies.get(&code) {
            return config.clone();
        }

        tracing::debug!(
            currency = %code,
            scale = self.defaults.default_scale,
            mode = %self.defaults.default_mode,
            "Unknown currency, using default scale and rounding mode"
        );
        CurrencyConfig {
            symbol: code.clone(),
            code,
            scale: self.defaults.default_scale,
            rounding_mode: self.defaults.default_mode,
            locale: String::new(),
        }
    }

    /// Scale for `code` (default scale when unknown).
    #[must_use]
    pub fn scale_of(&self, code: &str) -> u32 {
        self.resolve(code).scale
    }

    /// Default rounding mode for `code`.
    #[must_use]
    pub fn rounding_mode_of(&self, code: &str) -> RoundingMode {
        self.resolve(code).rounding_mode
    }

    /// Display symbol for `code`.
    #[must_use]
    pub fn symbol_of(&self, code: &str) -> String {
        self.resolve(code).symbol
    }

    /// True if `code` is in the table.
    #[must_use]
    pub fn is_supported(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Supported codes, sorted.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.currencies.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Code used when callers pass an empty identifier.
    #[must_use]
    pub fn default_currency(&self) -> &str {
        &self.defaults.default_currency
    }
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
