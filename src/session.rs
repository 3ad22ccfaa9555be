//! Actor and player directory backed by the configuration file.

use std::collections::HashSet;

use crate::commands::{Actor, Permission, Player, PlayerDirectory};
use crate::config::{Config, PlayerConfig};

const WILDCARD: &str = "*";

/// Who is typing at the console: either the console itself or one of the
/// configured players.
#[derive(Debug, Clone)]
pub struct Session {
    player: Option<Player>,
    permissions: HashSet<String>,
}

impl Session {
    pub fn console(permissions: &[String]) -> Self {
        Self {
            player: None,
            permissions: permissions.iter().cloned().collect(),
        }
    }

    pub fn player(entry: &PlayerConfig) -> Self {
        Self {
            player: Some(Player::new(entry.name.clone(), entry.uuid)),
            permissions: entry.permissions.iter().cloned().collect(),
        }
    }

    /// Acts as the named configured player, or as the console when `name`
    /// is `None`. Returns `None` if no player by that name is configured.
    pub fn from_config(config: &Config, name: Option<&str>) -> Option<Self> {
        match name {
            None => Some(Self::console(&config.console.permissions)),
            Some(name) => config
                .players
                .iter()
                .find(|entry| entry.name.eq_ignore_ascii_case(name))
                .map(Self::player),
        }
    }

    /// Display name for prompts and status output.
    pub fn name(&self) -> &str {
        self.player
            .as_ref()
            .map(|player| player.name.as_str())
            .unwrap_or("console")
    }
}

impl Actor for Session {
    fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(WILDCARD) || self.permissions.contains(permission.node())
    }

    fn as_player(&self) -> Option<&Player> {
        self.player.as_ref()
    }
}

/// Every configured player is treated as online.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    players: Vec<Player>,
}

impl StaticDirectory {
    pub fn from_config(config: &Config) -> Self {
        Self {
            players: config
                .players
                .iter()
                .map(|entry| Player::new(entry.name.clone(), entry.uuid))
                .collect(),
        }
    }
}

impl PlayerDirectory for StaticDirectory {
    fn find_online(&self, name: &str) -> Option<Player> {
        self.players
            .iter()
            .find(|player| player.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn online_names(&self) -> Vec<String> {
        self.players.iter().map(|player| player.name.clone()).collect()
    }
}
