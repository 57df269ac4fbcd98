//! Built-in host commands that operate directly on the world.

use creative_utils_api::{GameMode, ItemStack};
use creative_utils_command::CommandResult;

use crate::world::{slot_index, BlockPos, Difficulty, World, TICKS_PER_DAY};

/// Name and description of every built-in world command, for `help`.
pub const HOST_COMMANDS: [(&str, &str); 11] = [
    ("gamemode", "Set a player's game mode"),
    ("give", "Give items to a player"),
    ("item", "Replace the stack in a named slot"),
    ("difficulty", "Set the world difficulty"),
    ("gamerule", "Query or set a game rule"),
    ("time", "Set the time of day"),
    ("//pos1", "Set the first corner of your selection"),
    ("//pos2", "Set the second corner of your selection"),
    ("//replace", "Replace blocks in your selection"),
    ("list", "Show online players"),
    ("status", "Show a player's abilities, attributes and inventory"),
];

/// Execute a built-in command. Returns `None` if `name` is not one.
pub fn execute(
    world: &mut World,
    source: Option<&str>,
    name: &str,
    args: &[String],
) -> Option<CommandResult> {
    let result = match name {
        "gamemode" => cmd_gamemode(world, source, args),
        "give" => cmd_give(world, args),
        "item" => cmd_item(world, args),
        "difficulty" => cmd_difficulty(world, args),
        "gamerule" => cmd_gamerule(world, args),
        "time" => cmd_time(world, args),
        "//pos1" => cmd_pos(world, source, args, true),
        "//pos2" => cmd_pos(world, source, args, false),
        "//replace" => cmd_replace(world, source, args),
        "list" => cmd_list(world),
        "status" => cmd_status(world, source, args),
        _ => return None,
    };
    Some(result)
}

fn cmd_gamemode(world: &mut World, source: Option<&str>, args: &[String]) -> CommandResult {
    let Some(mode_arg) = args.first() else {
        return CommandResult::err("Usage: gamemode <mode> [player]");
    };
    let Some(mode) = GameMode::parse(mode_arg) else {
        return CommandResult::err(format!("Unknown gamemode: {mode_arg}"));
    };
    let Some(target) = args.get(1).map(String::as_str).or(source) else {
        return CommandResult::err("Usage: gamemode <mode> <player>");
    };
    match world.player_mut(target) {
        Some(player) => {
            player.gamemode = mode;
            CommandResult::ok(format!("Set {target}'s game mode to {mode}"))
        }
        None => CommandResult::err(format!("Player not found: {target}")),
    }
}

fn parse_count(arg: Option<&String>) -> Result<u16, CommandResult> {
    match arg.map(|c| c.parse::<u16>()) {
        None => Ok(1),
        Some(Ok(c)) if c > 0 => Ok(c),
        Some(_) => Err(CommandResult::err(format!(
            "Invalid count: {}",
            arg.map_or("", String::as_str)
        ))),
    }
}

fn namespaced(item: &str) -> String {
    if item.contains(':') {
        item.to_string()
    } else {
        format!("minecraft:{item}")
    }
}

fn cmd_give(world: &mut World, args: &[String]) -> CommandResult {
    let (Some(target), Some(item)) = (args.first(), args.get(1)) else {
        return CommandResult::err("Usage: give <player> <item> [count]");
    };
    let count = match parse_count(args.get(2)) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let item = namespaced(item);
    let Some(player) = world.player_mut(target) else {
        return CommandResult::err(format!("Player not found: {target}"));
    };
    match player.give(ItemStack::new(item.clone(), count)) {
        Some(slot) => CommandResult::ok(format!("Gave {count} {item} to {target} (slot {slot})")),
        None => CommandResult::err(format!("{target}'s inventory is full")),
    }
}

/// `item replace <player> <slot> <item> [count]`
fn cmd_item(world: &mut World, args: &[String]) -> CommandResult {
    let usage = "Usage: item replace <player> <slot> <item> [count]";
    let (Some("replace"), Some(target), Some(slot_name), Some(item)) = (
        args.first().map(String::as_str),
        args.get(1),
        args.get(2),
        args.get(3),
    ) else {
        return CommandResult::err(usage);
    };
    let Some(slot) = slot_index(slot_name) else {
        return CommandResult::err(format!("Unknown slot: {slot_name}"));
    };
    let count = match parse_count(args.get(4)) {
        Ok(c) => c,
        Err(e) => return e,
    };
    let item = namespaced(item);
    let Some(player) = world.player_mut(target) else {
        return CommandResult::err(format!("Player not found: {target}"));
    };
    player.inventory[slot] = ItemStack::new(item.clone(), count);
    CommandResult::ok(format!("Replaced {slot_name} of {target} with {count} {item}"))
}

fn cmd_difficulty(world: &mut World, args: &[String]) -> CommandResult {
    let Some(arg) = args.first() else {
        return CommandResult::ok(format!("The difficulty is {}", world.difficulty));
    };
    match Difficulty::parse(arg) {
        Some(d) => {
            world.difficulty = d;
            CommandResult::ok(format!("Set the difficulty to {d}"))
        }
        None => CommandResult::err(format!("Unknown difficulty: {arg}")),
    }
}

fn cmd_gamerule(world: &mut World, args: &[String]) -> CommandResult {
    let Some(rule) = args.first() else {
        return CommandResult::err("Usage: gamerule <rule> [true|false]");
    };
    let Some(current) = world.gamerule(rule) else {
        return CommandResult::err(format!("Unknown game rule: {rule}"));
    };
    match args.get(1).map(String::as_str) {
        None => CommandResult::ok(format!("Gamerule {rule} is currently set to: {current}")),
        Some("true") | Some("false") => {
            let value = args[1] == "true";
            world.gamerules.insert(rule.clone(), value);
            CommandResult::ok(format!("Gamerule {rule} is now set to: {value}"))
        }
        Some(other) => CommandResult::err(format!("Invalid boolean: {other}")),
    }
}

fn cmd_time(world: &mut World, args: &[String]) -> CommandResult {
    match (args.first().map(String::as_str), args.get(1)) {
        (Some("set"), Some(value)) => {
            let time = match value.as_str() {
                "day" => 1000,
                "noon" => 6000,
                "night" => 13000,
                "midnight" => 18000,
                other => match other.parse::<i64>() {
                    Ok(t) if t >= 0 => t,
                    _ => return CommandResult::err(format!("Invalid time: {other}")),
                },
            };
            world.time = time % TICKS_PER_DAY;
            CommandResult::ok(format!("Set the time to {}", world.time))
        }
        (Some("query"), _) | (None, _) => CommandResult::ok(format!("The time is {}", world.time)),
        _ => CommandResult::err("Usage: time set <day|noon|night|midnight|ticks>"),
    }
}

fn cmd_pos(world: &mut World, source: Option<&str>, args: &[String], first: bool) -> CommandResult {
    let Some(name) = source else {
        return CommandResult::err("This command requires a player");
    };
    let coords: Option<Vec<i32>> = args.iter().map(|a| a.parse().ok()).collect();
    let Some(&[x, y, z]) = coords.as_deref() else {
        return CommandResult::err("Usage: //pos1|//pos2 <x> <y> <z>");
    };
    let Some(player) = world.player_mut(name) else {
        return CommandResult::err(format!("Player not found: {name}"));
    };
    let pos = BlockPos::new(x, y, z);
    if first {
        player.pos1 = Some(pos);
        CommandResult::ok(format!("First position set to {pos}"))
    } else {
        player.pos2 = Some(pos);
        CommandResult::ok(format!("Second position set to {pos}"))
    }
}

fn cmd_replace(world: &mut World, source: Option<&str>, args: &[String]) -> CommandResult {
    let Some(name) = source else {
        return CommandResult::err("This command requires a player");
    };
    let (Some(mask), Some(block)) = (args.first(), args.get(1)) else {
        return CommandResult::err("Usage: //replace <mask> <block>");
    };
    let Some(player) = world.player(name) else {
        return CommandResult::err(format!("Player not found: {name}"));
    };
    match player.selection_volume() {
        Some(volume) => CommandResult::ok(format!(
            "Replaced {mask} with {block}: {volume} block(s) affected"
        )),
        None => CommandResult::err("Make a region selection first"),
    }
}

fn cmd_list(world: &World) -> CommandResult {
    let names: Vec<&str> = world.players().iter().map(|p| p.name.as_str()).collect();
    let count = names.len();
    let suffix = if names.is_empty() {
        String::new()
    } else {
        format!(": {}", names.join(", "))
    };
    CommandResult::ok(format!(
        "There {verb} {count} player{s} online{suffix}",
        verb = if count == 1 { "is" } else { "are" },
        s = if count == 1 { "" } else { "s" },
    ))
}

fn cmd_status(world: &World, source: Option<&str>, args: &[String]) -> CommandResult {
    let Some(name) = args.first().map(String::as_str).or(source) else {
        return CommandResult::err("Usage: status <player>");
    };
    let Some(player) = world.player(name) else {
        return CommandResult::err(format!("Player not found: {name}"));
    };
    let attack = player
        .attack_damage
        .map_or_else(|| "none".to_string(), |v| v.to_string());
    let mut result = CommandResult::ok(format!(
        "{name}: {}, fly speed {}, attack damage {attack}",
        player.gamemode, player.fly_speed
    ));
    for (slot, stack) in player.inventory.iter().enumerate() {
        if !stack.is_empty() {
            result = result.with_message(format!("  [{slot}] {} x{}", stack.item, stack.count));
        }
    }
    result
}
