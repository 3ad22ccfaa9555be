/*!
 * Suggestion engine
 *
 * Core completion logic responsible for:
 * - Working out which argument is being typed
 * - Collecting candidates the actor is permitted to use
 * - Prefix filtering against the partial token
 */

use super::suggestion::Suggestion;
use crate::commands::{Actor, Permission, PlayerDirectory};
use crate::database::RankStore;

/// Which argument the partial token fills
#[derive(Debug, PartialEq)]
pub enum InputContext {
    /// First token: the subcommand name
    Subcommand,
    /// `upgrade <rankType>`
    UpgradeRankType,
    /// `get <rankType>` or `get <playerOnline> ...`
    GetFirstArg,
    /// `get <playerOnline> <rankType>`
    GetOtherRankType,
    /// `create <rankType>` is free-form, and anything past the last argument
    None,
}

/// Permission-filtered completions for the premium command.
///
/// Reads the list of rank types from the store on every call and never
/// writes.
pub struct SuggestionProvider<'a> {
    store: &'a RankStore,
    players: &'a dyn PlayerDirectory,
}

impl<'a> SuggestionProvider<'a> {
    pub fn new(store: &'a RankStore, players: &'a dyn PlayerDirectory) -> Self {
        Self { store, players }
    }

    /// Candidate strings for the last element of `args`, which is the
    /// partially typed token (possibly empty).
    pub fn complete(&self, actor: &dyn Actor, args: &[&str]) -> Vec<String> {
        self.get_suggestions(actor, args)
            .into_iter()
            .map(|suggestion| suggestion.text)
            .collect()
    }

    /// Same as [`complete`](Self::complete), keeping category and description.
    pub fn get_suggestions(&self, actor: &dyn Actor, args: &[&str]) -> Vec<Suggestion> {
        let Some(token) = args.last() else {
            return Vec::new();
        };

        let mut suggestions = Vec::new();
        match analyze_context(args) {
            InputContext::Subcommand => {
                suggestions.extend(subcommand_suggestions(actor));
            }
            InputContext::UpgradeRankType => {
                if actor.has_permission(Permission::Upgrade) {
                    suggestions.extend(self.rank_type_suggestions());
                }
            }
            InputContext::GetFirstArg => {
                if actor.has_permission(Permission::GetSelf) {
                    suggestions.extend(self.rank_type_suggestions());
                }
                if actor.has_permission(Permission::GetOthers) {
                    suggestions.extend(self.player_suggestions());
                }
            }
            InputContext::GetOtherRankType => {
                if actor.has_permission(Permission::GetOthers) {
                    suggestions.extend(self.rank_type_suggestions());
                }
            }
            InputContext::None => {}
        }

        suggestions.retain(|suggestion| suggestion.matches(token));
        suggestions
    }

    fn rank_type_suggestions(&self) -> impl Iterator<Item = Suggestion> {
        self.store
            .list_available_rank_types()
            .into_iter()
            .map(Suggestion::rank_type)
    }

    fn player_suggestions(&self) -> impl Iterator<Item = Suggestion> {
        self.players
            .online_names()
            .into_iter()
            .map(Suggestion::player)
    }
}

/// Analyze which argument position is being completed
pub fn analyze_context(args: &[&str]) -> InputContext {
    match args {
        [_] => InputContext::Subcommand,
        [sub, _] if sub.eq_ignore_ascii_case("upgrade") => InputContext::UpgradeRankType,
        [sub, _] if sub.eq_ignore_ascii_case("get") => InputContext::GetFirstArg,
        [sub, _, _] if sub.eq_ignore_ascii_case("get") => InputContext::GetOtherRankType,
        _ => InputContext::None,
    }
}

fn subcommand_suggestions(actor: &dyn Actor) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    if actor.has_permission(Permission::Create) {
        suggestions.push(Suggestion::subcommand("create", "Create a rank type"));
    }
    if actor.has_permission(Permission::Upgrade) {
        suggestions.push(Suggestion::subcommand("upgrade", "Upgrade your rank"));
    }
    if actor.has_permission(Permission::GetSelf) || actor.has_permission(Permission::GetOthers) {
        suggestions.push(Suggestion::subcommand("get", "Show a rank"));
    }
    suggestions
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
