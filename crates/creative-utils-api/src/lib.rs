//! Plugin API: traits, events, and the host facade for plugin authors.
//!
//! This crate defines the interface a host implements so plugins can run
//! against it. It has no dependency on any concrete host.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use creative_utils_command::CommandResult;

// ─── Types ───────────────────────────────────────────────────────────────────

/// A player's game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl GameMode {
    /// Parse a game mode from its name, numeric id, or abbreviation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "0" | "survival" | "s" => Some(GameMode::Survival),
            "1" | "creative" | "c" => Some(GameMode::Creative),
            "2" | "adventure" | "a" => Some(GameMode::Adventure),
            "3" | "spectator" | "sp" => Some(GameMode::Spectator),
            _ => None,
        }
    }

    pub fn is_creative(self) -> bool {
        self == GameMode::Creative
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::Survival => "Survival",
            GameMode::Creative => "Creative",
            GameMode::Adventure => "Adventure",
            GameMode::Spectator => "Spectator",
        };
        f.write_str(name)
    }
}

/// Engine-managed numeric attributes a plugin may read and overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    AttackDamage,
}

impl Attribute {
    /// Base value a fresh player entity starts with.
    pub fn default_base(self) -> f64 {
        match self {
            Attribute::AttackDamage => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::AttackDamage => "generic.attack_damage",
        }
    }
}

/// A stack of items in one inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item identifier, e.g. `minecraft:stone`. `minecraft:air` = empty.
    pub item: String,
    pub count: u16,
}

impl ItemStack {
    pub const AIR: &'static str = "minecraft:air";

    /// An empty slot.
    pub fn empty() -> Self {
        Self {
            item: Self::AIR.to_string(),
            count: 0,
        }
    }

    pub fn new(item: impl Into<String>, count: u16) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.item == Self::AIR
    }
}

/// Information about an online player, passed to plugins in events.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginPlayer {
    pub name: String,
    pub uuid: String,
    pub gamemode: GameMode,
}

/// Log level for plugin logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// All events that plugins can listen to.
#[derive(Debug, Clone)]
pub enum PluginEvent {
    PlayerJoin { player: PluginPlayer },
    PlayerQuit { player: PluginPlayer },
    /// Fired once per world tick, after the host's own simulation step.
    WorldTick { tick: u64 },
    ServerStarted,
    ServerStopping,
}

impl PluginEvent {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            PluginEvent::PlayerJoin { .. } => "PlayerJoin",
            PluginEvent::PlayerQuit { .. } => "PlayerQuit",
            PluginEvent::WorldTick { .. } => "WorldTick",
            PluginEvent::ServerStarted => "ServerStarted",
            PluginEvent::ServerStopping => "ServerStopping",
        }
    }
}

// ─── Plugin trait ────────────────────────────────────────────────────────────

/// Metadata about a plugin.
#[derive(Debug, Clone)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
}

/// The Plugin trait, implemented by every plugin the host loads.
pub trait Plugin: Send {
    /// Return plugin metadata.
    fn info(&self) -> PluginInfo;

    /// Called when the plugin is loaded. Use `api` to register commands.
    fn on_enable(&mut self, api: &mut dyn ServerApi);

    /// Called when the plugin is unloaded.
    fn on_disable(&mut self) {}

    /// Called for every dispatched event.
    fn on_event(&mut self, event: &PluginEvent, api: &mut dyn ServerApi) {
        let _ = (event, api);
    }

    /// Called when a plugin-registered command is executed.
    ///
    /// `sender` is `None` when the command comes from the console.
    fn on_command(
        &mut self,
        command: &str,
        args: &[String],
        sender: Option<&str>,
        api: &mut dyn ServerApi,
    ) -> Option<CommandResult> {
        let _ = (command, args, sender, api);
        None
    }

    /// Return a default config as JSON. If `Some`, the plugin gets a config file.
    fn default_config(&self) -> Option<serde_json::Value> {
        None
    }

    /// Called with the loaded config (from `plugins/<name>/config.json`).
    fn load_config(&mut self, _config: serde_json::Value) {}
}

// ─── Server API ──────────────────────────────────────────────────────────────

/// Read/write access to host state, passed to plugins during callbacks.
///
/// Players are addressed by name. Read methods return data immediately. Write
/// methods may be deferred by the host, but are applied in call order.
pub trait ServerApi {
    // --- Players ---
    fn online_players(&self) -> Vec<PluginPlayer>;
    fn get_player(&self, name: &str) -> Option<PluginPlayer>;
    fn send_message(&mut self, player_name: &str, message: &str);

    // --- Abilities ---
    fn set_fly_speed(&mut self, player_name: &str, speed: f32);

    // --- Attributes ---
    /// `None` when the player has no instance of `attribute`.
    fn attribute_base(&self, player_name: &str, attribute: Attribute) -> Option<f64>;
    fn set_attribute_base(&mut self, player_name: &str, attribute: Attribute, value: f64);

    // --- Inventory ---
    fn inventory(&self, player_name: &str) -> Vec<ItemStack>;
    fn set_stack_count(&mut self, player_name: &str, slot: usize, count: u16);

    // --- Commands ---
    /// Run a host command line as `source` (`None` = console).
    fn execute_command(&mut self, source: Option<&str>, command: &str);
    fn register_command(&mut self, name: &str, description: &str, plugin_name: &str);

    // --- Server ---
    fn get_tick(&self) -> u64;
    fn log(&self, level: LogLevel, message: &str);
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamemode_parse() {
        assert_eq!(GameMode::parse("creative"), Some(GameMode::Creative));
        assert_eq!(GameMode::parse("C"), Some(GameMode::Creative));
        assert_eq!(GameMode::parse("0"), Some(GameMode::Survival));
        assert_eq!(GameMode::parse("sp"), Some(GameMode::Spectator));
        assert_eq!(GameMode::parse("Adventure"), Some(GameMode::Adventure));
        assert_eq!(GameMode::parse("hardcore"), None);
    }

    #[test]
    fn gamemode_display() {
        assert!(GameMode::Creative.is_creative());
        assert!(!GameMode::Spectator.is_creative());
        assert_eq!(GameMode::Creative.to_string(), "Creative");
    }

    #[test]
    fn gamemode_serde_lowercase() {
        let json = serde_json::to_string(&GameMode::Creative).unwrap();
        assert_eq!(json, "\"creative\"");
        let mode: GameMode = serde_json::from_str("\"adventure\"").unwrap();
        assert_eq!(mode, GameMode::Adventure);
    }

    #[test]
    fn item_stack_empty() {
        assert!(ItemStack::empty().is_empty());
        assert!(ItemStack::new("minecraft:stone", 0).is_empty());
        assert!(ItemStack::new(ItemStack::AIR, 5).is_empty());
        assert!(!ItemStack::new("minecraft:stone", 1).is_empty());
    }

    #[test]
    fn attack_damage_default() {
        assert_eq!(Attribute::AttackDamage.default_base(), 1.0);
        assert_eq!(Attribute::AttackDamage.name(), "generic.attack_damage");
    }

    #[test]
    fn event_names() {
        assert_eq!(PluginEvent::WorldTick { tick: 1 }.name(), "WorldTick");
        assert_eq!(PluginEvent::ServerStarted.name(), "ServerStarted");
    }
}
