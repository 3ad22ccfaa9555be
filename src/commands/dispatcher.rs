use std::fmt;

use tracing::debug;

use super::{Actor, Permission, PlayerDirectory};
use crate::database::RankStore;

/// Result of one command invocation, rendered as text through [`fmt::Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Commands the actor may run, one usage form per line.
    Help(Vec<String>),
    /// Wrong argument count for a subcommand.
    Usage(Vec<String>),
    UnknownSubcommand { sub: String, help: Vec<String> },
    NoPermission(Permission),
    /// A player-only subcommand was run by the console.
    PlayersOnly(String),
    Created { category: String },
    Upgraded { category: String, rank: i64 },
    /// `player` is `None` when the actor asked about themselves.
    Rank {
        player: Option<String>,
        category: String,
        rank: i64,
    },
    UnknownCategory,
    NoSuchRank,
    PlayerNotFound(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Help(lines) => write_help(f, lines),
            Outcome::Usage(lines) => match lines.as_slice() {
                [single] => write!(f, "Usage: {single}"),
                _ => {
                    write!(f, "Usage:")?;
                    for line in lines {
                        write!(f, "\n  {line}")?;
                    }
                    Ok(())
                }
            },
            Outcome::UnknownSubcommand { sub, help } => {
                writeln!(f, "Unknown subcommand: {sub}")?;
                write_help(f, help)
            }
            Outcome::NoPermission(permission) => {
                write!(f, "You don't have permission: {permission}")
            }
            Outcome::PlayersOnly(usage) => write!(f, "Only players can run: {usage}"),
            Outcome::Created { category } => {
                write!(f, "Premium rank table ensured for type: {category}")
            }
            Outcome::Upgraded { category, rank } => {
                write!(f, "Your {category} rank is now: {rank}")
            }
            Outcome::Rank {
                player: None,
                category,
                rank,
            } => write!(f, "Your {category} rank: {rank}"),
            Outcome::Rank {
                player: Some(name),
                category,
                rank,
            } => write!(f, "{name}'s {category} rank: {rank}"),
            Outcome::UnknownCategory => write!(f, "This rank type doesn't exist."),
            Outcome::NoSuchRank => write!(f, "You don't have this rank."),
            Outcome::PlayerNotFound(name) => write!(f, "Player not found or not online: {name}"),
        }
    }
}

fn write_help(f: &mut fmt::Formatter<'_>, lines: &[String]) -> fmt::Result {
    write!(f, "Premium commands:")?;
    for line in lines {
        write!(f, "\n  {line}")?;
    }
    Ok(())
}

/// Maps `create`/`upgrade`/`get` invocations onto the rank store.
///
/// Holds no state of its own: every call checks permissions first, then
/// reads or writes through the store.
pub struct Dispatcher<'a> {
    store: &'a RankStore,
    players: &'a dyn PlayerDirectory,
}

impl<'a> Dispatcher<'a> {
    pub fn new(store: &'a RankStore, players: &'a dyn PlayerDirectory) -> Self {
        Self { store, players }
    }

    /// Runs one command. `label` is the name the command was invoked under
    /// and only shows up in usage text.
    pub fn dispatch(&self, actor: &dyn Actor, label: &str, args: &[&str]) -> Outcome {
        let Some(first) = args.first() else {
            return Outcome::Help(help_lines(actor, label));
        };

        let sub = first.to_lowercase();
        debug!(sub = %sub, args = args.len(), "dispatching premium command");
        match sub.as_str() {
            "create" => self.create(actor, label, args),
            "upgrade" => self.upgrade(actor, label, args),
            "get" => self.get(actor, label, args),
            _ => Outcome::UnknownSubcommand {
                sub,
                help: help_lines(actor, label),
            },
        }
    }

    fn create(&self, actor: &dyn Actor, label: &str, args: &[&str]) -> Outcome {
        if !actor.has_permission(Permission::Create) {
            return Outcome::NoPermission(Permission::Create);
        }
        let Some(category) = args.get(1) else {
            return Outcome::Usage(vec![format!("/{label} create <rankType>")]);
        };

        self.store.create_rank_table(category);
        Outcome::Created {
            category: category.to_string(),
        }
    }

    fn upgrade(&self, actor: &dyn Actor, label: &str, args: &[&str]) -> Outcome {
        if !actor.has_permission(Permission::Upgrade) {
            return Outcome::NoPermission(Permission::Upgrade);
        }
        let Some(player) = actor.as_player() else {
            return Outcome::PlayersOnly(format!("/{label} upgrade <rankType>"));
        };
        let Some(category) = args.get(1) else {
            return Outcome::Usage(vec![format!("/{label} upgrade <rankType>")]);
        };

        if !self.store.rank_table_exists(category) {
            return Outcome::UnknownCategory;
        }

        let id = player.id.to_string();
        self.store.upgrade_rank(&id, category);
        Outcome::Upgraded {
            category: category.to_string(),
            rank: self.store.get_rank(&id, category),
        }
    }

    fn get(&self, actor: &dyn Actor, label: &str, args: &[&str]) -> Outcome {
        match args {
            [_, category] => {
                if !actor.has_permission(Permission::GetSelf) {
                    return Outcome::NoPermission(Permission::GetSelf);
                }
                let Some(player) = actor.as_player() else {
                    return Outcome::PlayersOnly(format!("/{label} get <rankType>"));
                };
                self.lookup(&player.id.to_string(), None, category)
            }
            [_, name, category] => {
                if !actor.has_permission(Permission::GetOthers) {
                    return Outcome::NoPermission(Permission::GetOthers);
                }
                let Some(target) = self.players.find_online(name) else {
                    return Outcome::PlayerNotFound(name.to_string());
                };
                self.lookup(&target.id.to_string(), Some(target.name), category)
            }
            _ => Outcome::Usage(vec![
                format!("/{label} get <rankType>"),
                format!("/{label} get <playerOnline> <rankType>"),
            ]),
        }
    }

    /// A missing table and a missing row read the same to the actor.
    fn lookup(&self, id: &str, player: Option<String>, category: &str) -> Outcome {
        if !self.store.rank_table_exists(category) {
            return Outcome::NoSuchRank;
        }
        let rank = self.store.get_rank(id, category);
        if rank < 0 {
            return Outcome::NoSuchRank;
        }
        Outcome::Rank {
            player,
            category: category.to_string(),
            rank,
        }
    }
}

/// Usage forms the actor holds the permission for.
fn help_lines(actor: &dyn Actor, label: &str) -> Vec<String> {
    Permission::ALL
        .into_iter()
        .filter(|permission| actor.has_permission(*permission))
        .map(|permission| match permission {
            Permission::Create => format!("/{label} create <rankType>"),
            Permission::Upgrade => format!("/{label} upgrade <rankType>"),
            Permission::GetSelf => format!("/{label} get <rankType>"),
            Permission::GetOthers => format!("/{label} get <playerOnline> <rankType>"),
        })
        .collect()
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
