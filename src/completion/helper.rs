/*!
 * Console completion helper
 *
 * Bridges the suggestion engine into rustyline: Tab completion, inline hints
 * and light highlighting of the subcommand
 */

use super::engine::SuggestionProvider;
use crate::commands::PlayerDirectory;
use crate::database::RankStore;
use crate::session::Session;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::Validator;
use rustyline::Context;
use std::borrow::Cow;
use std::sync::Arc;

const SUBCOMMANDS: [&str; 3] = ["create", "upgrade", "get"];

/// Splits the text before the cursor into arguments. The last element is the
/// token under the cursor, empty when the cursor follows whitespace.
pub fn args_before_cursor(line: &str, pos: usize) -> Vec<&str> {
    let before = &line[..pos];
    let mut args: Vec<&str> = before.split_whitespace().collect();
    if before.is_empty() || before.ends_with(char::is_whitespace) {
        args.push("");
    }
    args
}

/// Remainder of `candidate` after `word`. Matching elsewhere ignores case,
/// but a hint is appended to the typed text as-is, so only a candidate that
/// extends `word` exactly yields one.
fn inline_hint(candidate: &str, word: &str) -> Option<String> {
    candidate
        .strip_prefix(word)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

/// Premium console helper (integrating all functionality)
pub struct PremiumHelper {
    store: Arc<RankStore>,
    players: Arc<dyn PlayerDirectory + Send + Sync>,
    session: Arc<Session>,
    hinter: HistoryHinter,
}

impl PremiumHelper {
    pub fn new(
        store: Arc<RankStore>,
        players: Arc<dyn PlayerDirectory + Send + Sync>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            store,
            players,
            session,
            hinter: HistoryHinter::new(),
        }
    }

    fn provider(&self) -> SuggestionProvider<'_> {
        SuggestionProvider::new(&self.store, self.players.as_ref())
    }
}

impl Completer for PremiumHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let args = args_before_cursor(line, pos);
        let word_len = args.last().map_or(0, |word| word.len());
        let start = pos - word_len;

        let completions = self
            .provider()
            .get_suggestions(self.session.as_ref(), &args)
            .into_iter()
            .map(|suggestion| Pair {
                display: suggestion.format_display(),
                replacement: suggestion.text,
            })
            .collect();

        Ok((start, completions))
    }
}

impl Hinter for PremiumHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        // First try history hints
        if let Some(history_hint) = self.hinter.hint(line, pos, ctx) {
            return Some(history_hint);
        }
        if pos < line.len() {
            return None;
        }

        let args = args_before_cursor(line, pos);
        let word = args.last().copied().unwrap_or("");
        if word.is_empty() {
            return None;
        }

        // Show the rest of the first candidate inline
        let suggestions = self
            .provider()
            .get_suggestions(self.session.as_ref(), &args);
        inline_hint(&suggestions.first()?.text, word)
    }
}

impl Highlighter for PremiumHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let trimmed = line.trim_start();
        let Some(first) = trimmed.split_whitespace().next() else {
            return Cow::Borrowed(line);
        };
        if !SUBCOMMANDS.iter().any(|sub| sub.eq_ignore_ascii_case(first)) {
            return Cow::Borrowed(line);
        }

        // Bold the subcommand
        let indent = line.len() - trimmed.len();
        let rest = &trimmed[first.len()..];
        Cow::Owned(format!(
            "{}\x1b[1m{}\x1b[0m{}",
            &line[..indent],
            first,
            rest
        ))
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Borrowed(prompt)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[90m{}\x1b[0m", hint))
    }
}

impl Validator for PremiumHelper {}

impl rustyline::Helper for PremiumHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_track_the_token_under_cursor() {
        assert_eq!(args_before_cursor("", 0), vec![""]);
        assert_eq!(args_before_cursor("up", 2), vec!["up"]);
        assert_eq!(args_before_cursor("upgrade ", 8), vec!["upgrade", ""]);
        assert_eq!(args_before_cursor("get Steve v", 11), vec!["get", "Steve", "v"]);
        assert_eq!(args_before_cursor("get Steve vip", 5), vec!["get", "S"]);
    }

    #[test]
    fn hint_only_extends_exact_prefix() {
        assert_eq!(inline_hint("upgrade", "up").as_deref(), Some("grade"));
        assert_eq!(inline_hint("upgrade", "UP"), None);
        assert_eq!(inline_hint("upgrade", "upgrade"), None);
        assert_eq!(inline_hint("Steve", "st"), None);
    }
}
