//! In-memory `ServerApi` used by the unit tests. Writes apply immediately.

use creative_utils_api::{Attribute, GameMode, ItemStack, LogLevel, PluginPlayer, ServerApi};

pub struct MockPlayer {
    pub player: PluginPlayer,
    pub fly_speed: f32,
    pub attack_damage: Option<f64>,
    pub inventory: Vec<ItemStack>,
}

#[derive(Default)]
pub struct MockApi {
    pub players: Vec<MockPlayer>,
    /// (player, message)
    pub messages: Vec<(String, String)>,
    /// (source, command line)
    pub executed: Vec<(Option<String>, String)>,
    /// (name, description)
    pub commands: Vec<(String, String)>,
    pub tick: u64,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, name: &str, gamemode: GameMode) -> Self {
        self.add_player(name, gamemode);
        self
    }

    pub fn add_player(&mut self, name: &str, gamemode: GameMode) {
        let index = self.players.len() + 1;
        self.players.push(MockPlayer {
            player: PluginPlayer {
                name: name.to_string(),
                uuid: format!("00000000-0000-0000-0000-{index:012}"),
                gamemode,
            },
            fly_speed: 0.05,
            attack_damage: Some(Attribute::AttackDamage.default_base()),
            inventory: (0..36).map(|_| ItemStack::empty()).collect(),
        });
    }

    pub fn remove_player(&mut self, name: &str) {
        self.players.retain(|p| p.player.name != name);
    }

    pub fn player(&self, name: &str) -> &MockPlayer {
        self.players
            .iter()
            .find(|p| p.player.name == name)
            .expect("no such mock player")
    }

    pub fn player_mut(&mut self, name: &str) -> &mut MockPlayer {
        self.players
            .iter_mut()
            .find(|p| p.player.name == name)
            .expect("no such mock player")
    }

    pub fn set_gamemode(&mut self, name: &str, gamemode: GameMode) {
        self.player_mut(name).player.gamemode = gamemode;
    }

    pub fn messages_for(&self, name: &str) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(p, _)| p == name)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    fn find(&self, name: &str) -> Option<&MockPlayer> {
        self.players.iter().find(|p| p.player.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut MockPlayer> {
        self.players.iter_mut().find(|p| p.player.name == name)
    }
}

impl ServerApi for MockApi {
    fn online_players(&self) -> Vec<PluginPlayer> {
        self.players.iter().map(|p| p.player.clone()).collect()
    }

    fn get_player(&self, name: &str) -> Option<PluginPlayer> {
        self.find(name).map(|p| p.player.clone())
    }

    fn send_message(&mut self, player_name: &str, message: &str) {
        self.messages
            .push((player_name.to_string(), message.to_string()));
    }

    fn set_fly_speed(&mut self, player_name: &str, speed: f32) {
        if let Some(p) = self.find_mut(player_name) {
            p.fly_speed = speed;
        }
    }

    fn attribute_base(&self, player_name: &str, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::AttackDamage => self.find(player_name)?.attack_damage,
        }
    }

    fn set_attribute_base(&mut self, player_name: &str, attribute: Attribute, value: f64) {
        let Some(p) = self.find_mut(player_name) else {
            return;
        };
        match attribute {
            Attribute::AttackDamage => {
                if p.attack_damage.is_some() {
                    p.attack_damage = Some(value);
                }
            }
        }
    }

    fn inventory(&self, player_name: &str) -> Vec<ItemStack> {
        self.find(player_name)
            .map(|p| p.inventory.clone())
            .unwrap_or_default()
    }

    fn set_stack_count(&mut self, player_name: &str, slot: usize, count: u16) {
        if let Some(stack) = self
            .find_mut(player_name)
            .and_then(|p| p.inventory.get_mut(slot))
        {
            stack.count = count;
        }
    }

    fn execute_command(&mut self, source: Option<&str>, command: &str) {
        self.executed
            .push((source.map(String::from), command.to_string()));
    }

    fn register_command(&mut self, name: &str, description: &str, _plugin_name: &str) {
        self.commands
            .push((name.to_string(), description.to_string()));
    }

    fn get_tick(&self) -> u64 {
        self.tick
    }

    fn log(&self, _level: LogLevel, _message: &str) {}
}
