//! Per-tick game-mode observer.
//!
//! Once per world tick, for every connected player:
//! 1. look up the mode recorded at the end of the previous tick,
//! 2. read the current mode from the host,
//! 3. on a creative → non-creative transition, reset attack damage,
//! 4. record the current mode,
//! 5. while in creative, clamp every inventory stack to the configured size.

use std::collections::HashMap;

use creative_utils_api::{Attribute, GameMode, ServerApi};
use tracing::debug;

use crate::config::CreativeUtilsConfig;

pub const ONEPUNCH_RESET_MESSAGE: &str = "Onepunch has been disabled due to game mode change";

/// Last observed game mode per player uuid.
///
/// Entries are never removed: a disconnected player's entry is simply not
/// consulted until they reconnect.
#[derive(Debug, Default)]
pub struct GameModeRecord {
    modes: HashMap<String, GameMode>,
}

impl GameModeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uuid: &str) -> Option<GameMode> {
        self.modes.get(uuid).copied()
    }

    /// Store `mode` for `uuid`, returning the previous entry.
    pub fn record(&mut self, uuid: &str, mode: GameMode) -> Option<GameMode> {
        self.modes.insert(uuid.to_string(), mode)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

/// What one tick changed, for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub players: usize,
    pub onepunch_resets: usize,
    pub stacks_clamped: usize,
}

/// Run the observer for one tick.
pub fn observe_tick(
    record: &mut GameModeRecord,
    config: &CreativeUtilsConfig,
    api: &mut dyn ServerApi,
) -> TickSummary {
    let mut summary = TickSummary::default();

    for player in api.online_players() {
        summary.players += 1;
        let previous = record.get(&player.uuid);
        let current = player.gamemode;

        let left_creative = previous == Some(GameMode::Creative) && !current.is_creative();
        if left_creative && reset_onepunch(api, &player.name, config.default_attack_damage) {
            summary.onepunch_resets += 1;
        }

        record.record(&player.uuid, current);

        if current.is_creative() {
            summary.stacks_clamped += clamp_stacks(api, &player.name, config.creative_max_stack);
        }
    }

    summary
}

fn reset_onepunch(api: &mut dyn ServerApi, player_name: &str, default_damage: f64) -> bool {
    if api
        .attribute_base(player_name, Attribute::AttackDamage)
        .is_none()
    {
        debug!("{player_name} has no attack damage attribute, skipping onepunch reset");
        return false;
    }
    api.set_attribute_base(player_name, Attribute::AttackDamage, default_damage);
    api.send_message(player_name, ONEPUNCH_RESET_MESSAGE);
    true
}

/// Clamp every non-empty stack above `max` down to `max`. Returns the number of slots changed.
pub fn clamp_stacks(api: &mut dyn ServerApi, player_name: &str, max: u16) -> usize {
    let oversized: Vec<usize> = api
        .inventory(player_name)
        .iter()
        .enumerate()
        .filter(|(_, stack)| !stack.is_empty() && stack.count > max)
        .map(|(slot, _)| slot)
        .collect();

    for &slot in &oversized {
        api.set_stack_count(player_name, slot, max);
    }
    oversized.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;
    use creative_utils_api::ItemStack;

    fn run(record: &mut GameModeRecord, api: &mut MockApi) -> TickSummary {
        observe_tick(record, &CreativeUtilsConfig::default(), api)
    }

    #[test]
    fn records_every_player() {
        let mut api = MockApi::new()
            .with_player("Alice", GameMode::Creative)
            .with_player("Bob", GameMode::Survival);
        let mut record = GameModeRecord::new();

        let summary = run(&mut record, &mut api);
        assert_eq!(summary.players, 2);
        assert_eq!(record.len(), 2);
        let alice = api.player("Alice").player.uuid.clone();
        let bob = api.player("Bob").player.uuid.clone();
        assert_eq!(record.get(&alice), Some(GameMode::Creative));
        assert_eq!(record.get(&bob), Some(GameMode::Survival));
    }

    #[test]
    fn leaving_creative_resets_attack_damage() {
        let mut api = MockApi::new().with_player("Alice", GameMode::Creative);
        let mut record = GameModeRecord::new();
        run(&mut record, &mut api);

        api.player_mut("Alice").attack_damage = Some(1000.0);
        api.set_gamemode("Alice", GameMode::Survival);
        let summary = run(&mut record, &mut api);

        assert_eq!(summary.onepunch_resets, 1);
        assert_eq!(api.player("Alice").attack_damage, Some(1.0));
        assert_eq!(api.messages_for("Alice"), vec![ONEPUNCH_RESET_MESSAGE]);
    }

    #[test]
    fn every_non_creative_target_triggers_reset() {
        for target in [GameMode::Survival, GameMode::Adventure, GameMode::Spectator] {
            let mut api = MockApi::new().with_player("Alice", GameMode::Creative);
            let mut record = GameModeRecord::new();
            run(&mut record, &mut api);

            api.player_mut("Alice").attack_damage = Some(42.0);
            api.set_gamemode("Alice", target);
            run(&mut record, &mut api);
            assert_eq!(api.player("Alice").attack_damage, Some(1.0), "{target}");
        }
    }

    #[test]
    fn no_reset_without_transition() {
        let mut api = MockApi::new().with_player("Alice", GameMode::Survival);
        api.player_mut("Alice").attack_damage = Some(1000.0);
        let mut record = GameModeRecord::new();

        // First sighting in survival, then staying in survival.
        run(&mut record, &mut api);
        run(&mut record, &mut api);
        assert_eq!(api.player("Alice").attack_damage, Some(1000.0));
        assert!(api.messages.is_empty());

        // Staying in creative.
        api.set_gamemode("Alice", GameMode::Creative);
        run(&mut record, &mut api);
        run(&mut record, &mut api);
        assert_eq!(api.player("Alice").attack_damage, Some(1000.0));
    }

    #[test]
    fn reset_fires_once_per_transition() {
        let mut api = MockApi::new().with_player("Alice", GameMode::Creative);
        let mut record = GameModeRecord::new();
        run(&mut record, &mut api);
        api.set_gamemode("Alice", GameMode::Survival);
        run(&mut record, &mut api);
        run(&mut record, &mut api);
        assert_eq!(api.messages_for("Alice").len(), 1);
    }

    #[test]
    fn missing_attribute_skips_reset() {
        let mut api = MockApi::new().with_player("Alice", GameMode::Creative);
        let mut record = GameModeRecord::new();
        run(&mut record, &mut api);

        api.player_mut("Alice").attack_damage = None;
        api.set_gamemode("Alice", GameMode::Survival);
        let summary = run(&mut record, &mut api);
        assert_eq!(summary.onepunch_resets, 0);
        assert!(api.messages.is_empty());
        let uuid = api.player("Alice").player.uuid.clone();
        assert_eq!(record.get(&uuid), Some(GameMode::Survival));
    }

    #[test]
    fn creative_stacks_are_clamped() {
        let mut api = MockApi::new().with_player("Alice", GameMode::Creative);
        {
            let inv = &mut api.player_mut("Alice").inventory;
            inv[0] = ItemStack::new("minecraft:stone", 64);
            inv[1] = ItemStack::new("minecraft:dirt", 1);
            inv[8] = ItemStack::new("minecraft:torch", 2);
        }
        let mut record = GameModeRecord::new();
        let summary = run(&mut record, &mut api);

        assert_eq!(summary.stacks_clamped, 2);
        let inv = &api.player("Alice").inventory;
        assert_eq!(inv[0].count, 1);
        assert_eq!(inv[1].count, 1);
        assert_eq!(inv[8].count, 1);
        assert_eq!(inv[0].item, "minecraft:stone");
        assert!(inv[2].is_empty());
    }

    #[test]
    fn survival_stacks_are_untouched() {
        let mut api = MockApi::new().with_player("Bob", GameMode::Survival);
        api.player_mut("Bob").inventory[0] = ItemStack::new("minecraft:stone", 64);
        let mut record = GameModeRecord::new();
        run(&mut record, &mut api);
        assert_eq!(api.player("Bob").inventory[0].count, 64);
    }

    #[test]
    fn clamping_uses_configured_limit() {
        let mut api = MockApi::new().with_player("Alice", GameMode::Creative);
        api.player_mut("Alice").inventory[3] = ItemStack::new("minecraft:stone", 64);
        let config = CreativeUtilsConfig {
            creative_max_stack: 16,
            ..CreativeUtilsConfig::default()
        };
        let mut record = GameModeRecord::new();
        observe_tick(&mut record, &config, &mut api);
        assert_eq!(api.player("Alice").inventory[3].count, 16);
    }

    #[test]
    fn stale_entries_survive_disconnect() {
        let mut api = MockApi::new().with_player("Alice", GameMode::Creative);
        let mut record = GameModeRecord::new();
        run(&mut record, &mut api);
        let uuid = api.player("Alice").player.uuid.clone();

        api.remove_player("Alice");
        let summary = run(&mut record, &mut api);
        assert_eq!(summary.players, 0);
        assert_eq!(record.get(&uuid), Some(GameMode::Creative));
    }

    #[test]
    fn players_are_independent() {
        let mut api = MockApi::new()
            .with_player("Alice", GameMode::Creative)
            .with_player("Bob", GameMode::Creative);
        let mut record = GameModeRecord::new();
        run(&mut record, &mut api);

        api.player_mut("Alice").attack_damage = Some(1000.0);
        api.player_mut("Bob").attack_damage = Some(1000.0);
        api.set_gamemode("Bob", GameMode::Adventure);
        run(&mut record, &mut api);

        assert_eq!(api.player("Alice").attack_damage, Some(1000.0));
        assert_eq!(api.player("Bob").attack_damage, Some(1.0));
        assert!(api.messages_for("Alice").is_empty());
    }
}
