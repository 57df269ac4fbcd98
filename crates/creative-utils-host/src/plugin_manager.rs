//! Plugin manager: loads, enables, and dispatches events and commands to plugins.

use std::collections::HashMap;
use std::path::Path;

use creative_utils_api::{
    Attribute, CommandResult, ItemStack, LogLevel, Plugin, PluginEvent, PluginPlayer, ServerApi,
};
use tracing::{debug, error, info, warn};

// ─── Types ───────────────────────────────────────────────────────────────────

/// Per-player state readable by plugins.
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub player: PluginPlayer,
    pub attack_damage: Option<f64>,
    pub inventory: Vec<ItemStack>,
}

/// Server state snapshot for plugin API reads (built before dispatch).
#[derive(Debug, Clone, Default)]
pub struct ServerSnapshot {
    pub players: Vec<PlayerSnapshot>,
    pub current_tick: u64,
}

impl ServerSnapshot {
    fn player(&self, name: &str) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.player.name == name)
    }
}

/// Deferred side-effect requested by a plugin during a callback.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    SendMessage {
        player_name: String,
        message: String,
    },
    SetFlySpeed {
        player_name: String,
        speed: f32,
    },
    SetAttributeBase {
        player_name: String,
        attribute: Attribute,
        value: f64,
    },
    SetStackCount {
        player_name: String,
        slot: usize,
        count: u16,
    },
    ExecuteCommand {
        source: Option<String>,
        command: String,
    },
    RegisterCommand {
        name: String,
        description: String,
        plugin_name: String,
    },
}

// ─── ServerApiImpl ───────────────────────────────────────────────────────────

/// Implements `ServerApi` using a snapshot for reads and accumulating PendingActions for writes.
struct ServerApiImpl<'a> {
    snapshot: &'a ServerSnapshot,
    actions: Vec<PendingAction>,
}

impl<'a> ServerApiImpl<'a> {
    fn new(snapshot: &'a ServerSnapshot) -> Self {
        Self {
            snapshot,
            actions: Vec::new(),
        }
    }

    fn take_actions(self) -> Vec<PendingAction> {
        self.actions
    }
}

impl ServerApi for ServerApiImpl<'_> {
    fn online_players(&self) -> Vec<PluginPlayer> {
        self.snapshot
            .players
            .iter()
            .map(|p| p.player.clone())
            .collect()
    }

    fn get_player(&self, name: &str) -> Option<PluginPlayer> {
        self.snapshot.player(name).map(|p| p.player.clone())
    }

    fn send_message(&mut self, player_name: &str, message: &str) {
        self.actions.push(PendingAction::SendMessage {
            player_name: player_name.to_string(),
            message: message.to_string(),
        });
    }

    fn set_fly_speed(&mut self, player_name: &str, speed: f32) {
        self.actions.push(PendingAction::SetFlySpeed {
            player_name: player_name.to_string(),
            speed,
        });
    }

    fn attribute_base(&self, player_name: &str, attribute: Attribute) -> Option<f64> {
        let player = self.snapshot.player(player_name)?;
        match attribute {
            Attribute::AttackDamage => player.attack_damage,
        }
    }

    fn set_attribute_base(&mut self, player_name: &str, attribute: Attribute, value: f64) {
        self.actions.push(PendingAction::SetAttributeBase {
            player_name: player_name.to_string(),
            attribute,
            value,
        });
    }

    fn inventory(&self, player_name: &str) -> Vec<ItemStack> {
        self.snapshot
            .player(player_name)
            .map(|p| p.inventory.clone())
            .unwrap_or_default()
    }

    fn set_stack_count(&mut self, player_name: &str, slot: usize, count: u16) {
        self.actions.push(PendingAction::SetStackCount {
            player_name: player_name.to_string(),
            slot,
            count,
        });
    }

    fn execute_command(&mut self, source: Option<&str>, command: &str) {
        self.actions.push(PendingAction::ExecuteCommand {
            source: source.map(String::from),
            command: command.to_string(),
        });
    }

    fn register_command(&mut self, name: &str, description: &str, plugin_name: &str) {
        self.actions.push(PendingAction::RegisterCommand {
            name: name.to_string(),
            description: description.to_string(),
            plugin_name: plugin_name.to_string(),
        });
    }

    fn get_tick(&self) -> u64 {
        self.snapshot.current_tick
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => info!("[plugin] {message}"),
            LogLevel::Warn => warn!("[plugin] {message}"),
            LogLevel::Error => error!("[plugin] {message}"),
            LogLevel::Debug => debug!("[plugin] {message}"),
        }
    }
}

// ─── PluginManager ───────────────────────────────────────────────────────────

/// A command root registered by a plugin.
#[derive(Debug, Clone)]
pub struct PluginCommand {
    pub plugin_name: String,
    pub description: String,
}

/// Manages all loaded plugins and their command registrations.
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Box<dyn Plugin>>,
    /// Commands registered by plugins: command_name → owner.
    pub plugin_commands: HashMap<String, PluginCommand>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin (call before enable_all).
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        info!("Registered plugin: {}", plugin.info().name);
        self.plugins.push(plugin);
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Enable all registered plugins. Returns actions that touch the world.
    pub fn enable_all(&mut self, snapshot: &ServerSnapshot) -> Vec<PendingAction> {
        let mut all_actions = Vec::new();
        for plugin in &mut self.plugins {
            let info = plugin.info();
            info!("Enabling {} v{}", info.name, info.version);
            let mut api = ServerApiImpl::new(snapshot);
            plugin.on_enable(&mut api);
            all_actions.extend(api.take_actions());
        }
        self.apply_internal_actions(all_actions)
    }

    /// Disable all registered plugins.
    pub fn disable_all(&mut self) {
        for plugin in &mut self.plugins {
            plugin.on_disable();
        }
    }

    /// Dispatch an event to all plugins. Returns pending actions.
    pub fn dispatch(&mut self, event: &PluginEvent, snapshot: &ServerSnapshot) -> Vec<PendingAction> {
        let mut all_actions = Vec::new();
        for plugin in &mut self.plugins {
            let mut api = ServerApiImpl::new(snapshot);
            plugin.on_event(event, &mut api);
            all_actions.extend(api.take_actions());
        }
        if !all_actions.is_empty() {
            debug!("{} produced {} plugin action(s)", event.name(), all_actions.len());
        }
        self.apply_internal_actions(all_actions)
    }

    /// Whether some plugin registered `command`.
    pub fn owns_command(&self, command: &str) -> bool {
        self.plugin_commands.contains_key(command)
    }

    /// Handle a plugin-registered command. Returns (result, pending_actions).
    pub fn handle_command(
        &mut self,
        command: &str,
        args: &[String],
        sender: Option<&str>,
        snapshot: &ServerSnapshot,
    ) -> (Option<CommandResult>, Vec<PendingAction>) {
        let plugin_name = match self.plugin_commands.get(command) {
            Some(owner) => owner.plugin_name.clone(),
            None => return (None, Vec::new()),
        };

        let Some(plugin) = self
            .plugins
            .iter_mut()
            .find(|p| p.info().name == plugin_name)
        else {
            return (None, Vec::new());
        };

        let mut api = ServerApiImpl::new(snapshot);
        let result = plugin.on_command(command, args, sender, &mut api);
        let actions = api.take_actions();
        (result, self.apply_internal_actions(actions))
    }

    /// Load configs for all plugins from `<dir>/<name>/config.json`, writing defaults if absent.
    pub fn load_configs(&mut self, dir: &Path) {
        for plugin in &mut self.plugins {
            let info = plugin.info();
            let Some(default_config) = plugin.default_config() else {
                continue;
            };
            let plugin_dir = dir.join(&info.name);
            let config_path = plugin_dir.join("config.json");

            let config = if config_path.exists() {
                match std::fs::read_to_string(&config_path) {
                    Ok(data) => match serde_json::from_str(&data) {
                        Ok(v) => v,
                        Err(e) => {
                            warn!("Failed to parse config for {}: {e}", info.name);
                            default_config
                        }
                    },
                    Err(e) => {
                        warn!("Failed to read config for {}: {e}", info.name);
                        default_config
                    }
                }
            } else {
                if let Err(e) = std::fs::create_dir_all(&plugin_dir) {
                    warn!("Failed to create {}: {e}", plugin_dir.display());
                } else if let Ok(json) = serde_json::to_string_pretty(&default_config) {
                    if let Err(e) = std::fs::write(&config_path, json) {
                        warn!("Failed to write {}: {e}", config_path.display());
                    }
                }
                default_config
            };

            plugin.load_config(config);
        }
    }

    /// Apply manager-level actions (command registration) immediately and
    /// return the rest, in order, for the server to apply to the world.
    fn apply_internal_actions(&mut self, actions: Vec<PendingAction>) -> Vec<PendingAction> {
        let mut world_actions = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                PendingAction::RegisterCommand {
                    name,
                    description,
                    plugin_name,
                } => {
                    debug!("{plugin_name} registered command /{name}");
                    self.plugin_commands.insert(
                        name,
                        PluginCommand {
                            plugin_name,
                            description,
                        },
                    );
                }
                other => world_actions.push(other),
            }
        }
        world_actions
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
