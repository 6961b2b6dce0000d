//! Engine settings
//!
//! Everything the engine needs beyond the menu itself: the order line's
//! phone number for the deep link, currency label, the flat delivery fee
//! per distance tier, and the quick-reply suggestion pools the response
//! composer draws from.

use serde::{Deserialize, Serialize};
use std::path::Path;

use snackbot_core::DistanceTier;

use crate::ConfigError;

/// Flat delivery fee per distance tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFees {
    #[serde(default = "default_fee_near")]
    pub near: f64,
    #[serde(default = "default_fee_mid")]
    pub mid: f64,
    #[serde(default = "default_fee_far")]
    pub far: f64,
}

fn default_fee_near() -> f64 {
    7.0
}

fn default_fee_mid() -> f64 {
    12.0
}

fn default_fee_far() -> f64 {
    20.0
}

impl Default for DeliveryFees {
    fn default() -> Self {
        Self {
            near: default_fee_near(),
            mid: default_fee_mid(),
            far: default_fee_far(),
        }
    }
}

impl DeliveryFees {
    pub fn for_tier(&self, tier: DistanceTier) -> f64 {
        match tier {
            DistanceTier::Near => self.near,
            DistanceTier::Mid => self.mid,
            DistanceTier::Far => self.far,
        }
    }
}

/// Engine settings loaded from YAML, with sensible defaults throughout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Phone number the deep link targets (international format, digits only)
    #[serde(default = "default_phone_number")]
    pub phone_number: String,

    /// Currency label appended to amounts in replies and summaries
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub delivery_fees: DeliveryFees,

    /// Quick replies suggested for a spicy-preference intent
    #[serde(default = "default_spicy_suggestions")]
    pub spicy_suggestions: Vec<String>,

    /// Quick replies suggested for a budget intent
    #[serde(default = "default_promo_suggestions")]
    pub promo_suggestions: Vec<String>,
}

fn default_phone_number() -> String {
    "212600000000".to_string()
}

fn default_currency() -> String {
    "dh".to_string()
}

fn default_spicy_suggestions() -> Vec<String> {
    vec![
        "Tacos Mixte".to_string(),
        "Kabab Royal".to_string(),
        "Plat Viande".to_string(),
    ]
}

fn default_promo_suggestions() -> Vec<String> {
    vec![
        "Menu Midi: Sandwich + Boisson".to_string(),
        "Family Deal: 2 Pizza + 2 Coca".to_string(),
    ]
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            phone_number: default_phone_number(),
            currency: default_currency(),
            delivery_fees: DeliveryFees::default(),
            spicy_suggestions: default_spicy_suggestions(),
            promo_suggestions: default_promo_suggestions(),
        }
    }
}

impl EngineSettings {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(path.as_ref().display().to_string(), e.to_string())
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.currency, "dh");
        assert_eq!(settings.delivery_fees.for_tier(DistanceTier::Mid), 12.0);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
phone_number: "212611223344"
delivery_fees:
  mid: 15.0
"#;
        let settings: EngineSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.phone_number, "212611223344");
        assert_eq!(settings.delivery_fees.mid, 15.0);
        // untouched fields keep their defaults
        assert_eq!(settings.delivery_fees.near, 7.0);
        assert_eq!(settings.currency, "dh");
    }
}
