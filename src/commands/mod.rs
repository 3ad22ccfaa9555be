//! The `/premium` command surface.
//!
//! Permission checks and player lookup belong to whatever hosts the command;
//! they reach the dispatcher through the [`Actor`] and [`PlayerDirectory`]
//! traits.

mod dispatcher;

pub use dispatcher::{Dispatcher, Outcome};

use std::fmt;

use uuid::Uuid;

/// Permission nodes gating each subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// `create <rankType>`
    Create,
    /// `upgrade <rankType>`
    Upgrade,
    /// `get <rankType>` for the actor's own rank
    GetSelf,
    /// `get <player> <rankType>`
    GetOthers,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::Create,
        Permission::Upgrade,
        Permission::GetSelf,
        Permission::GetOthers,
    ];

    pub fn node(self) -> &'static str {
        match self {
            Permission::Create => "mcengine.premium.rank.create",
            Permission::Upgrade => "mcengine.premium.rank.upgrade",
            Permission::GetSelf => "mcengine.premium.rank.get",
            Permission::GetOthers => "mcengine.premium.rank.get.players",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.node())
    }
}

/// An identified player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub id: Uuid,
}

impl Player {
    pub fn new(name: impl Into<String>, id: Uuid) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// Whoever issued a command.
pub trait Actor {
    fn has_permission(&self, permission: Permission) -> bool;

    /// The player behind this actor, or `None` for the console.
    fn as_player(&self) -> Option<&Player>;
}

/// Lookup of currently online players.
pub trait PlayerDirectory {
    /// Finds an online player by exact name, ignoring case.
    fn find_online(&self, name: &str) -> Option<Player>;

    fn online_names(&self) -> Vec<String>;
}
