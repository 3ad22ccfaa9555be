/*!
 * Completion candidates
 *
 * One candidate per suggested token, tagged with what kind of argument it fills
 */

/// A single completion candidate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    /// Text inserted on completion
    pub text: String,
    /// Short description shown in the candidate list
    pub description: String,
    pub category: SuggestionCategory,
}

/// What a candidate completes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuggestionCategory {
    Subcommand,
    RankType,
    Player,
}

impl Suggestion {
    pub fn new(text: String, description: String, category: SuggestionCategory) -> Self {
        Self {
            text,
            description,
            category,
        }
    }

    /// Display text with category icon
    pub fn format_display(&self) -> String {
        format!("{} {} - {}", self.category.icon(), self.text, self.description)
    }

    pub fn subcommand(name: &str, description: &str) -> Self {
        Self::new(
            name.to_string(),
            description.to_string(),
            SuggestionCategory::Subcommand,
        )
    }

    pub fn rank_type(name: String) -> Self {
        Self::new(name, "rank type".to_string(), SuggestionCategory::RankType)
    }

    pub fn player(name: String) -> Self {
        Self::new(name, "online player".to_string(), SuggestionCategory::Player)
    }

    /// Case-insensitive prefix match; an empty token matches everything
    pub fn matches(&self, token: &str) -> bool {
        token.is_empty() || self.text.to_lowercase().starts_with(&token.to_lowercase())
    }
}

impl SuggestionCategory {
    pub fn icon(&self) -> &'static str {
        match self {
            SuggestionCategory::Subcommand => "⚙️",
            SuggestionCategory::RankType => "🏅",
            SuggestionCategory::Player => "👤",
        }
    }
}
