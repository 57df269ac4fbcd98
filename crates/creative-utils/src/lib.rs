//! CreativeUtils: creative-mode conveniences for the plugin host.
//!
//! Registers `/CreativeUtils ...` and `/air`, and watches game-mode changes
//! every world tick to reset one-punch and clamp creative stack sizes.

pub mod commands;
pub mod config;
pub mod error;
pub mod tick;

#[cfg(test)]
mod mock;

use creative_utils_api::{
    CommandResult, LogLevel, Plugin, PluginEvent, PluginInfo, ServerApi,
};
use creative_utils_command::{CommandContext, CommandTree};
use tracing::{debug, warn};

use commands::{Action, AIR_COMMAND, ROOT_COMMAND};
use config::CreativeUtilsConfig;
use tick::GameModeRecord;

pub use error::CreativeUtilsError;

pub const PLUGIN_NAME: &str = "CreativeUtils";

/// The plugin instance. Owns the game-mode record for the life of the host.
pub struct CreativeUtils {
    config: CreativeUtilsConfig,
    game_modes: GameModeRecord,
    commands: CommandTree<Action>,
}

impl Default for CreativeUtils {
    fn default() -> Self {
        Self::new()
    }
}

impl CreativeUtils {
    pub fn new() -> Self {
        Self::with_config(CreativeUtilsConfig::default())
    }

    pub fn with_config(config: CreativeUtilsConfig) -> Self {
        let commands = commands::build_tree(&config);
        Self {
            config,
            game_modes: GameModeRecord::new(),
            commands,
        }
    }

    pub fn config(&self) -> &CreativeUtilsConfig {
        &self.config
    }

    pub fn game_modes(&self) -> &GameModeRecord {
        &self.game_modes
    }

    /// Parse and run a full command line.
    pub fn run_command(
        &mut self,
        line: &str,
        sender: Option<&str>,
        api: &mut dyn ServerApi,
    ) -> CommandResult {
        let invocation = match self.commands.parse(line) {
            Ok(inv) => inv,
            Err(e) => return CreativeUtilsError::from(e).into(),
        };
        let ctx = CommandContext {
            sender: sender.map(String::from),
            args: invocation.args,
        };
        match commands::execute(invocation.action, &ctx, &self.config, api) {
            Ok(result) => result,
            Err(e) => {
                debug!("{line:?} from {sender:?} failed: {e}");
                e.into()
            }
        }
    }
}

impl Plugin for CreativeUtils {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: PLUGIN_NAME.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: env!("CARGO_PKG_DESCRIPTION").into(),
            author: "TurboTechMods".into(),
        }
    }

    fn on_enable(&mut self, api: &mut dyn ServerApi) {
        api.register_command(ROOT_COMMAND, "Creative-mode utilities", PLUGIN_NAME);
        api.register_command(AIR_COMMAND, "Replace the selected region with air", PLUGIN_NAME);
        api.log(LogLevel::Info, "CreativeUtils initialized!");
    }

    fn on_event(&mut self, event: &PluginEvent, api: &mut dyn ServerApi) {
        if let PluginEvent::WorldTick { tick } = event {
            let summary = tick::observe_tick(&mut self.game_modes, &self.config, api);
            if summary.onepunch_resets > 0 || summary.stacks_clamped > 0 {
                debug!(
                    "tick {tick}: {} onepunch reset(s), {} stack(s) clamped",
                    summary.onepunch_resets, summary.stacks_clamped
                );
            }
        }
    }

    fn on_command(
        &mut self,
        command: &str,
        args: &[String],
        sender: Option<&str>,
        api: &mut dyn ServerApi,
    ) -> Option<CommandResult> {
        if !self.commands.contains(command) {
            return None;
        }
        let mut line = command.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        Some(self.run_command(&line, sender, api))
    }

    fn default_config(&self) -> Option<serde_json::Value> {
        CreativeUtilsConfig::default().to_json()
    }

    fn load_config(&mut self, config: serde_json::Value) {
        match CreativeUtilsConfig::from_json(config) {
            Ok(config) => {
                self.commands = commands::build_tree(&config);
                self.config = config;
            }
            Err(e) => warn!("Ignoring {PLUGIN_NAME} config: {e}"),
        }
    }
}
