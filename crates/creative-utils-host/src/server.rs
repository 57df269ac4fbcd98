//! Ties the world, the plugin manager, and command routing together.

use std::path::Path;

use creative_utils_api::{Attribute, GameMode, Plugin, PluginEvent};
use creative_utils_command::CommandResult;
use tracing::{debug, info, warn};

use crate::commands;
use crate::config::HostConfig;
use crate::plugin_manager::{PendingAction, PluginManager};
use crate::world::World;

/// Plugin commands may issue commands that reach plugins again; this bounds the chain.
const MAX_COMMAND_DEPTH: usize = 8;

pub struct Server {
    world: World,
    plugins: PluginManager,
    default_gamemode: GameMode,
    running: bool,
}

impl Server {
    pub fn new(config: &HostConfig) -> Self {
        let mut world = World::new(config.world.difficulty, config.world.time);
        for entry in &config.players {
            let mode = entry.gamemode.unwrap_or(config.world.default_gamemode);
            if world.join(&entry.name, mode).is_none() {
                warn!("Duplicate player in config: {}", entry.name);
            }
        }
        Self {
            world,
            plugins: PluginManager::new(),
            default_gamemode: config.world.default_gamemode,
            running: true,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn register_plugin(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.register(plugin);
    }

    /// Load plugin configs (if `plugins_dir` is given), enable plugins, announce start.
    pub fn start(&mut self, plugins_dir: Option<&Path>) {
        if let Some(dir) = plugins_dir {
            self.plugins.load_configs(dir);
        }
        let actions = self.plugins.enable_all(&self.world.snapshot());
        self.apply_actions(actions, 0);
        self.dispatch(PluginEvent::ServerStarted);
        info!(
            "{} plugin(s) enabled, {} player(s) online",
            self.plugins.plugin_count(),
            self.world.players().len()
        );
    }

    pub fn shutdown(&mut self) {
        self.dispatch(PluginEvent::ServerStopping);
        self.plugins.disable_all();
        self.running = false;
    }

    /// Advance the world one tick and notify plugins.
    pub fn game_tick(&mut self) {
        self.world.tick();
        let tick = self.world.current_tick;
        self.dispatch(PluginEvent::WorldTick { tick });
    }

    /// Run a console line. The console has no player identity.
    pub fn handle_console_command(&mut self, line: &str) -> CommandResult {
        self.execute(None, line, 0)
    }

    /// Run a command line as `source` (`None` = console).
    pub fn execute(&mut self, source: Option<&str>, line: &str, depth: usize) -> CommandResult {
        if depth > MAX_COMMAND_DEPTH {
            warn!("Command chain too deep, dropping {line:?}");
            return CommandResult::err("Command chain too deep");
        }

        let line = line.trim();
        // `//replace` keeps its slashes; `/gamemode` loses one.
        let line = if line.starts_with("//") {
            line
        } else {
            line.strip_prefix('/').unwrap_or(line)
        };
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return CommandResult::err("No command given");
        };
        let args: Vec<String> = parts.map(String::from).collect();
        debug!("{} issued command: {line}", source.unwrap_or("Console"));

        let console_only = matches!(name, "as" | "join" | "quit" | "stop");
        if console_only && source.is_some() {
            return CommandResult::err("You do not have permission to use this command");
        }

        match name {
            "as" => return self.cmd_as(&args, depth),
            "join" => return self.cmd_join(&args),
            "quit" => return self.cmd_quit(&args),
            "help" => return self.cmd_help(),
            "stop" => {
                self.shutdown();
                return CommandResult::ok("Stopping the server...");
            }
            _ => {}
        }

        if self.plugins.owns_command(name) {
            let snapshot = self.world.snapshot();
            let (result, actions) = self.plugins.handle_command(name, &args, source, &snapshot);
            self.apply_actions(actions, depth + 1);
            return result.unwrap_or_else(|| CommandResult::err(format!("{name} failed")));
        }

        commands::execute(&mut self.world, source, name, &args).unwrap_or_else(|| {
            CommandResult::err(format!(
                "Unknown command: {name}. Type help for a list of commands."
            ))
        })
    }

    fn dispatch(&mut self, event: PluginEvent) {
        let actions = self.plugins.dispatch(&event, &self.world.snapshot());
        self.apply_actions(actions, 0);
    }

    /// Apply plugin writes to the world, in the order they were requested.
    fn apply_actions(&mut self, actions: Vec<PendingAction>, depth: usize) {
        for action in actions {
            match action {
                PendingAction::SendMessage {
                    player_name,
                    message,
                } => self.world.deliver(&player_name, &message),
                PendingAction::SetFlySpeed { player_name, speed } => {
                    if let Some(player) = self.world.player_mut(&player_name) {
                        player.fly_speed = speed;
                        debug!("{player_name}: abilities update, fly speed {speed}");
                    }
                }
                PendingAction::SetAttributeBase {
                    player_name,
                    attribute,
                    value,
                } => {
                    let Some(player) = self.world.player_mut(&player_name) else {
                        continue;
                    };
                    match attribute {
                        Attribute::AttackDamage => {
                            if let Some(base) = player.attack_damage.as_mut() {
                                *base = value;
                            }
                        }
                    }
                }
                PendingAction::SetStackCount {
                    player_name,
                    slot,
                    count,
                } => {
                    if let Some(stack) = self
                        .world
                        .player_mut(&player_name)
                        .and_then(|p| p.inventory.get_mut(slot))
                    {
                        stack.count = count;
                    }
                }
                PendingAction::ExecuteCommand { source, command } => {
                    let result = self.execute(source.as_deref(), &command, depth);
                    self.reply(source.as_deref(), &result);
                }
                // Registration is consumed by the plugin manager.
                PendingAction::RegisterCommand { .. } => {}
            }
        }
    }

    /// Send command feedback to its source: a player's chat, or the log for the console.
    fn reply(&mut self, source: Option<&str>, result: &CommandResult) {
        for message in &result.messages {
            match source {
                Some(player) => self.world.deliver(player, message),
                None => info!("{message}"),
            }
        }
    }

    fn cmd_as(&mut self, args: &[String], depth: usize) -> CommandResult {
        let Some((player, rest)) = args.split_first() else {
            return CommandResult::err("Usage: as <player> <command...>");
        };
        if rest.is_empty() {
            return CommandResult::err("Usage: as <player> <command...>");
        }
        if self.world.player(player).is_none() {
            return CommandResult::err(format!("Player not found: {player}"));
        }
        let result = self.execute(Some(player), &rest.join(" "), depth + 1);
        self.reply(Some(player), &result);
        CommandResult {
            success: result.success,
            messages: Vec::new(),
        }
    }

    fn cmd_join(&mut self, args: &[String]) -> CommandResult {
        let Some(name) = args.first() else {
            return CommandResult::err("Usage: join <name> [gamemode]");
        };
        let mode = match args.get(1) {
            Some(m) => match GameMode::parse(m) {
                Some(mode) => mode,
                None => return CommandResult::err(format!("Unknown gamemode: {m}")),
            },
            None => self.default_gamemode,
        };
        let Some(player) = self.world.join(name, mode) else {
            return CommandResult::err(format!("{name} is already online"));
        };
        let player = player.to_plugin_player();
        self.dispatch(PluginEvent::PlayerJoin { player });
        CommandResult::ok(format!("{name} joined the game ({mode})"))
    }

    fn cmd_quit(&mut self, args: &[String]) -> CommandResult {
        let Some(name) = args.first() else {
            return CommandResult::err("Usage: quit <name>");
        };
        let Some(player) = self.world.quit(name) else {
            return CommandResult::err(format!("Player not found: {name}"));
        };
        self.dispatch(PluginEvent::PlayerQuit {
            player: player.to_plugin_player(),
        });
        CommandResult::ok(format!("{name} left the game"))
    }

    fn cmd_help(&self) -> CommandResult {
        let mut result = CommandResult::ok("Available commands:");
        for (name, description) in [
            ("as", "Run a command as a player"),
            ("join", "Connect a player"),
            ("quit", "Disconnect a player"),
            ("help", "List available commands"),
            ("stop", "Stop the server"),
        ]
        .into_iter()
        .chain(commands::HOST_COMMANDS)
        {
            result = result.with_message(format!("  {name} - {description}"));
        }
        let mut plugin_commands: Vec<_> = self.plugins.plugin_commands.iter().collect();
        plugin_commands.sort_by(|a, b| a.0.cmp(b.0));
        for (name, owner) in plugin_commands {
            result = result.with_message(format!(
                "  {name} - {} [{}]",
                owner.description, owner.plugin_name
            ));
        }
        result
    }
}
