use regex::Regex;
use std::sync::LazyLock;

/// Prefix shared by every rank table.
pub const TABLE_PREFIX: &str = "premium_rank_";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]").expect("static pattern"));

/// Reduces a rank category to `[a-z0-9_]` so it can be spliced into SQL as an
/// identifier. Empty input maps to `default`.
pub fn sanitize(raw: &str) -> String {
    let lower = raw.to_lowercase();
    if lower.is_empty() {
        return "default".to_string();
    }
    UNSAFE_CHARS.replace_all(&lower, "_").into_owned()
}

/// Physical table name for a rank category.
pub fn table_name(category: &str) -> String {
    format!("{}{}", TABLE_PREFIX, sanitize(category))
}

/// Strips [`TABLE_PREFIX`] from a catalog entry, comparing case-insensitively.
pub(crate) fn category_of(table: &str) -> Option<String> {
    let lower = table.to_lowercase();
    lower
        .strip_prefix(TABLE_PREFIX)
        .map(|suffix| suffix.to_string())
}
