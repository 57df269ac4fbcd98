//! Plugin configuration, stored by the host as `plugins/CreativeUtils/config.json`.

use creative_utils_api::Attribute;
use serde::{Deserialize, Serialize};

use crate::error::CreativeUtilsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreativeUtilsConfig {
    /// Flight speed restored by `FlightSpeedReset`.
    pub default_fly_speed: f32,
    /// `FlightSpeedSet <n>` stores `n / fly_speed_divisor`.
    pub fly_speed_divisor: f32,
    /// Upper bound accepted by `FlightSpeedSet`.
    pub max_fly_multiplier: f32,
    /// Attack-damage base value while one-punch is on.
    pub onepunch_damage: f64,
    /// Attack-damage base value restored when one-punch is turned off.
    pub default_attack_damage: f64,
    /// Largest stack a creative-mode player may hold in one slot.
    pub creative_max_stack: u16,
    /// Host commands issued, in order, by `SetupNewWorld`.
    pub setup_commands: Vec<String>,
    /// Host command issued by `air` and `SetAir`.
    pub region_fill_command: String,
}

impl Default for CreativeUtilsConfig {
    fn default() -> Self {
        Self {
            default_fly_speed: 0.05,
            fly_speed_divisor: 20.0,
            max_fly_multiplier: 10.0,
            onepunch_damage: 1000.0,
            default_attack_damage: Attribute::AttackDamage.default_base(),
            creative_max_stack: 1,
            setup_commands: default_setup_commands(),
            region_fill_command: "//replace #region air".to_string(),
        }
    }
}

fn default_setup_commands() -> Vec<String> {
    [
        "difficulty peaceful",
        "gamerule doDaylightCycle false",
        "gamerule doWeatherCycle false",
        "gamerule doFireTick false",
        "time set day",
        "gamerule doMobSpawning false",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl CreativeUtilsConfig {
    /// Parse and validate a JSON config. Missing keys take their defaults.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CreativeUtilsError> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }

    fn validate(&self) -> Result<(), CreativeUtilsError> {
        if !(self.fly_speed_divisor.is_finite() && self.fly_speed_divisor > 0.0) {
            return Err(CreativeUtilsError::InvalidConfig(format!(
                "fly_speed_divisor must be positive, got {}",
                self.fly_speed_divisor
            )));
        }
        if !(self.max_fly_multiplier.is_finite() && self.max_fly_multiplier >= 0.0) {
            return Err(CreativeUtilsError::InvalidConfig(format!(
                "max_fly_multiplier must be non-negative, got {}",
                self.max_fly_multiplier
            )));
        }
        if self.creative_max_stack == 0 {
            return Err(CreativeUtilsError::InvalidConfig(
                "creative_max_stack must be at least 1".to_string(),
            ));
        }
        if self.region_fill_command.trim().is_empty() {
            return Err(CreativeUtilsError::InvalidConfig(
                "region_fill_command is empty".to_string(),
            ));
        }
        Ok(())
    }
}
