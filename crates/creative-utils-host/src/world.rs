//! In-memory world state: players, game rules, difficulty, time of day.

use std::collections::BTreeMap;
use std::fmt;

use creative_utils_api::{Attribute, GameMode, ItemStack, PluginPlayer};
use serde::Deserialize;
use tracing::info;

use crate::plugin_manager::{PlayerSnapshot, ServerSnapshot};

/// Slots 0-35 are the main inventory (0-8 hotbar), 36-39 armor, 40 offhand.
pub const INVENTORY_SIZE: usize = 41;
pub const MAIN_INVENTORY_SIZE: usize = 36;
pub const OFFHAND_SLOT: usize = 40;
pub const DEFAULT_FLY_SPEED: f32 = 0.05;
pub const TICKS_PER_DAY: i64 = 24_000;

const DEFAULT_GAMERULES: [&str; 4] = [
    "doDaylightCycle",
    "doWeatherCycle",
    "doFireTick",
    "doMobSpawning",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Peaceful,
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "peaceful" | "p" | "0" => Some(Difficulty::Peaceful),
            "easy" | "e" | "1" => Some(Difficulty::Easy),
            "normal" | "n" | "2" => Some(Difficulty::Normal),
            "hard" | "h" | "3" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Peaceful => "Peaceful",
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

/// Block position used for region selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A connected player.
#[derive(Debug, Clone)]
pub struct HostPlayer {
    pub name: String,
    pub uuid: String,
    pub gamemode: GameMode,
    pub fly_speed: f32,
    /// `None` models an entity without an attack-damage attribute instance.
    pub attack_damage: Option<f64>,
    pub inventory: Vec<ItemStack>,
    pub pos1: Option<BlockPos>,
    pub pos2: Option<BlockPos>,
}

impl HostPlayer {
    pub fn new(name: &str, gamemode: GameMode) -> Self {
        Self {
            name: name.to_string(),
            uuid: random_uuid(),
            gamemode,
            fly_speed: DEFAULT_FLY_SPEED,
            attack_damage: Some(Attribute::AttackDamage.default_base()),
            inventory: (0..INVENTORY_SIZE).map(|_| ItemStack::empty()).collect(),
            pos1: None,
            pos2: None,
        }
    }

    pub fn to_plugin_player(&self) -> PluginPlayer {
        PluginPlayer {
            name: self.name.clone(),
            uuid: self.uuid.clone(),
            gamemode: self.gamemode,
        }
    }

    /// Put `stack` into the first empty main-inventory slot. Returns the slot used.
    pub fn give(&mut self, stack: ItemStack) -> Option<usize> {
        let slot = self.inventory[..MAIN_INVENTORY_SIZE]
            .iter()
            .position(ItemStack::is_empty)?;
        self.inventory[slot] = stack;
        Some(slot)
    }

    /// Volume of the current selection, if both corners are set.
    ///
    /// Each span is at most 2^32, so the product always fits in `u128`.
    pub fn selection_volume(&self) -> Option<u128> {
        let (a, b) = (self.pos1?, self.pos2?);
        let span = |p: i32, q: i32| u128::from(p.abs_diff(q)) + 1;
        Some(span(a.x, b.x) * span(a.y, b.y) * span(a.z, b.z))
    }
}

/// Map a slot name (`hotbar.0`, `inventory.26`, `armor.head`, `weapon.offhand`) to its index.
pub fn slot_index(name: &str) -> Option<usize> {
    let numbered = |prefix: &str, base: usize, len: usize| {
        let n: usize = name.strip_prefix(prefix)?.parse().ok()?;
        (n < len).then_some(base + n)
    };
    match name {
        "weapon.offhand" => Some(OFFHAND_SLOT),
        "armor.feet" => Some(36),
        "armor.legs" => Some(37),
        "armor.chest" => Some(38),
        "armor.head" => Some(39),
        _ => numbered("hotbar.", 0, 9).or_else(|| numbered("inventory.", 9, 27)),
    }
}

fn random_uuid() -> String {
    let v: u128 = rand::random();
    let h = format!("{v:032x}");
    format!(
        "{}-{}-{}-{}-{}",
        &h[0..8],
        &h[8..12],
        &h[12..16],
        &h[16..20],
        &h[20..32]
    )
}

/// All mutable host state.
pub struct World {
    players: Vec<HostPlayer>,
    pub difficulty: Difficulty,
    pub gamerules: BTreeMap<String, bool>,
    /// Time of day, 0-23999.
    pub time: i64,
    pub current_tick: u64,
    /// Every chat line delivered to a player: (player, message).
    pub chat_log: Vec<(String, String)>,
}

impl World {
    pub fn new(difficulty: Difficulty, time: i64) -> Self {
        Self {
            players: Vec::new(),
            difficulty,
            gamerules: DEFAULT_GAMERULES
                .iter()
                .map(|r| (r.to_string(), true))
                .collect(),
            time: time.rem_euclid(TICKS_PER_DAY),
            current_tick: 0,
            chat_log: Vec::new(),
        }
    }

    pub fn players(&self) -> &[HostPlayer] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&HostPlayer> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut HostPlayer> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// Add a player. Returns `None` if the name is already online.
    pub fn join(&mut self, name: &str, gamemode: GameMode) -> Option<&HostPlayer> {
        if self.player(name).is_some() {
            return None;
        }
        self.players.push(HostPlayer::new(name, gamemode));
        self.players.last()
    }

    pub fn quit(&mut self, name: &str) -> Option<HostPlayer> {
        let index = self.players.iter().position(|p| p.name == name)?;
        Some(self.players.remove(index))
    }

    pub fn gamerule(&self, rule: &str) -> Option<bool> {
        self.gamerules.get(rule).copied()
    }

    /// Advance one tick. Time of day only moves while `doDaylightCycle` is on.
    pub fn tick(&mut self) {
        self.current_tick += 1;
        if self.gamerule("doDaylightCycle").unwrap_or(true) {
            self.time = (self.time + 1) % TICKS_PER_DAY;
        }
    }

    /// Deliver a chat line to a player.
    pub fn deliver(&mut self, player_name: &str, message: &str) {
        if self.player(player_name).is_none() {
            return;
        }
        info!(target: "chat", "[-> {player_name}] {message}");
        self.chat_log
            .push((player_name.to_string(), message.to_string()));
    }

    /// Snapshot of everything plugins may read during one callback.
    pub fn snapshot(&self) -> ServerSnapshot {
        ServerSnapshot {
            players: self
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    player: p.to_plugin_player(),
                    attack_damage: p.attack_damage,
                    inventory: p.inventory.clone(),
                })
                .collect(),
            current_tick: self.current_tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_and_quit() {
        let mut world = World::new(Difficulty::Normal, 0);
        assert!(world.join("Steve", GameMode::Creative).is_some());
        assert!(world.join("Steve", GameMode::Survival).is_none());
        assert_eq!(world.players().len(), 1);
        assert_eq!(world.player("Steve").unwrap().gamemode, GameMode::Creative);
        assert!(world.quit("Steve").is_some());
        assert!(world.quit("Steve").is_none());
    }

    #[test]
    fn new_player_defaults() {
        let p = HostPlayer::new("Alex", GameMode::Survival);
        assert_eq!(p.fly_speed, 0.05);
        assert_eq!(p.attack_damage, Some(1.0));
        assert_eq!(p.inventory.len(), INVENTORY_SIZE);
        assert_eq!(p.uuid.len(), 36);
        assert_ne!(p.uuid, HostPlayer::new("Alex", GameMode::Survival).uuid);
    }

    #[test]
    fn give_fills_first_empty_slot() {
        let mut p = HostPlayer::new("Alex", GameMode::Survival);
        assert_eq!(p.give(ItemStack::new("minecraft:stone", 64)), Some(0));
        assert_eq!(p.give(ItemStack::new("minecraft:dirt", 3)), Some(1));
        assert_eq!(p.inventory[1].count, 3);
    }

    #[test]
    fn give_skips_armor_and_offhand() {
        let mut p = HostPlayer::new("Alex", GameMode::Survival);
        for _ in 0..MAIN_INVENTORY_SIZE {
            assert!(p.give(ItemStack::new("minecraft:dirt", 1)).is_some());
        }
        assert_eq!(p.give(ItemStack::new("minecraft:dirt", 1)), None);
        assert!(p.inventory[OFFHAND_SLOT].is_empty());
    }

    #[test]
    fn slot_names() {
        assert_eq!(slot_index("hotbar.0"), Some(0));
        assert_eq!(slot_index("hotbar.8"), Some(8));
        assert_eq!(slot_index("inventory.0"), Some(9));
        assert_eq!(slot_index("inventory.26"), Some(35));
        assert_eq!(slot_index("armor.head"), Some(39));
        assert_eq!(slot_index("weapon.offhand"), Some(OFFHAND_SLOT));
        assert_eq!(slot_index("hotbar.9"), None);
        assert_eq!(slot_index("inventory.27"), None);
        assert_eq!(slot_index("weapon.mainhand"), None);
    }

    #[test]
    fn selection_volume() {
        let mut p = HostPlayer::new("Alex", GameMode::Creative);
        assert_eq!(p.selection_volume(), None);
        p.pos1 = Some(BlockPos::new(0, 0, 0));
        p.pos2 = Some(BlockPos::new(-1, 2, 3));
        assert_eq!(p.selection_volume(), Some(2 * 3 * 4));

        p.pos1 = Some(BlockPos::new(i32::MIN, i32::MIN, i32::MIN));
        p.pos2 = Some(BlockPos::new(i32::MAX, i32::MAX, i32::MAX));
        assert_eq!(p.selection_volume(), Some(1u128 << 96));
    }

    #[test]
    fn daylight_cycle_gamerule_stops_time() {
        let mut world = World::new(Difficulty::Normal, TICKS_PER_DAY - 1);
        world.tick();
        assert_eq!(world.time, 0);
        assert_eq!(world.current_tick, 1);

        world.gamerules.insert("doDaylightCycle".into(), false);
        world.tick();
        assert_eq!(world.time, 0);
        assert_eq!(world.current_tick, 2);
    }

    #[test]
    fn deliver_only_reaches_online_players() {
        let mut world = World::new(Difficulty::Normal, 0);
        world.join("Steve", GameMode::Survival);
        world.deliver("Steve", "hi");
        world.deliver("Ghost", "hi");
        assert_eq!(world.chat_log, vec![("Steve".to_string(), "hi".to_string())]);
    }

    #[test]
    fn difficulty_parse() {
        assert_eq!(Difficulty::parse("peaceful"), Some(Difficulty::Peaceful));
        assert_eq!(Difficulty::parse("H"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("extreme"), None);
        assert_eq!(Difficulty::Peaceful.to_string(), "Peaceful");
    }
}
