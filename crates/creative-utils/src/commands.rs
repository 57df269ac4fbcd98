//! `/CreativeUtils ...` and `/air` command tree and handlers.

use creative_utils_api::{Attribute, CommandResult, ServerApi};
use creative_utils_command::{ArgumentType, CommandContext, CommandNode, CommandTree};
use tracing::{debug, warn};

use crate::config::CreativeUtilsConfig;
use crate::error::CreativeUtilsError;

pub const ROOT_COMMAND: &str = "CreativeUtils";
pub const AIR_COMMAND: &str = "air";

pub const ONEPUNCH_ENABLED: &str = "Onepunch has been enabled";
pub const ONEPUNCH_DISABLED: &str = "Onepunch has been disabled";
pub const FLIGHT_SPEED_RESET: &str = "Flight speed reset to default";
pub const AIR_TIP: &str = "Tip: You can use /air instead. Why? Convenience.";

/// Executable leaves of the command tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    FlightSpeedSet,
    FlightSpeedReset,
    SetupNewWorld,
    SetAir,
    OnepunchOn,
    OnepunchOff,
    Air,
}

/// Build the tree for both roots. The speed bound comes from config.
pub fn build_tree(config: &CreativeUtilsConfig) -> CommandTree<Action> {
    let mut tree = CommandTree::new();
    tree.register(
        CommandNode::literal(ROOT_COMMAND)
            .then(
                CommandNode::literal("FlightSpeedSet").then(
                    CommandNode::argument(
                        "speed",
                        ArgumentType::Float {
                            min: 0.0,
                            max: config.max_fly_multiplier,
                        },
                    )
                    .executes(Action::FlightSpeedSet),
                ),
            )
            .then(CommandNode::literal("FlightSpeedReset").executes(Action::FlightSpeedReset))
            .then(CommandNode::literal("SetupNewWorld").executes(Action::SetupNewWorld))
            .then(CommandNode::literal("SetAir").executes(Action::SetAir))
            .then(
                CommandNode::literal("Onepunch")
                    .then(CommandNode::literal("On").executes(Action::OnepunchOn))
                    .then(CommandNode::literal("Off").executes(Action::OnepunchOff)),
            ),
    );
    tree.register(CommandNode::literal(AIR_COMMAND).executes(Action::Air));
    tree
}

/// Run one parsed command.
pub fn execute(
    action: Action,
    ctx: &CommandContext,
    config: &CreativeUtilsConfig,
    api: &mut dyn ServerApi,
) -> Result<CommandResult, CreativeUtilsError> {
    match action {
        Action::FlightSpeedSet => {
            let player = require_creative(ctx, api)?;
            let speed = ctx
                .args
                .float("speed")
                .ok_or(CreativeUtilsError::MissingArgument("speed"))?;
            api.set_fly_speed(player, speed / config.fly_speed_divisor);
            Ok(CommandResult::ok(format!("Flight speed set to {speed:?}x")))
        }
        Action::FlightSpeedReset => {
            let player = require_creative(ctx, api)?;
            api.set_fly_speed(player, config.default_fly_speed);
            Ok(CommandResult::ok(FLIGHT_SPEED_RESET))
        }
        Action::SetupNewWorld => {
            let player = require_creative(ctx, api)?;
            for command in &config.setup_commands {
                api.execute_command(Some(player), command);
            }
            debug!(
                "{player} set up a new world ({} commands)",
                config.setup_commands.len()
            );
            Ok(CommandResult::silent())
        }
        Action::OnepunchOn => set_attack_damage(ctx, api, config.onepunch_damage, ONEPUNCH_ENABLED),
        Action::OnepunchOff => {
            set_attack_damage(ctx, api, config.default_attack_damage, ONEPUNCH_DISABLED)
        }
        Action::Air => {
            api.execute_command(ctx.sender.as_deref(), &config.region_fill_command);
            Ok(CommandResult::silent())
        }
        Action::SetAir => {
            api.execute_command(ctx.sender.as_deref(), &config.region_fill_command);
            Ok(CommandResult::silent().with_message(AIR_TIP))
        }
    }
}

/// The sender's name, if the sender is an online creative-mode player.
fn require_creative<'a>(
    ctx: &'a CommandContext,
    api: &dyn ServerApi,
) -> Result<&'a str, CreativeUtilsError> {
    let name = ctx.sender.as_deref().ok_or(CreativeUtilsError::NoPlayer)?;
    let player = api.get_player(name).ok_or(CreativeUtilsError::NoPlayer)?;
    if !player.gamemode.is_creative() {
        return Err(CreativeUtilsError::NotCreative);
    }
    Ok(name)
}

fn set_attack_damage(
    ctx: &CommandContext,
    api: &mut dyn ServerApi,
    value: f64,
    feedback: &str,
) -> Result<CommandResult, CreativeUtilsError> {
    let player = require_creative(ctx, api)?;
    if api.attribute_base(player, Attribute::AttackDamage).is_none() {
        warn!(
            "{player} has no {} attribute instance",
            Attribute::AttackDamage.name()
        );
        return Err(CreativeUtilsError::AttributeUnavailable("Attack damage"));
    }
    api.set_attribute_base(player, Attribute::AttackDamage, value);
    Ok(CommandResult::ok(feedback))
}
