/*!
 * Premium console completion
 *
 * Supports:
 * - Subcommand names filtered by permission
 * - Rank types discovered from existing rank tables
 * - Online player names for `get <player> <rankType>`
 * - Inline hints and history
 */

pub mod engine;
pub mod helper;
pub mod suggestion;

// Re-export main interfaces
pub use engine::SuggestionProvider;
pub use helper::PremiumHelper;
pub use suggestion::{Suggestion, SuggestionCategory};
