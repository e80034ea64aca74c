use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// The closed classification of a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Category {
    Psychological,
    Pedagogical,
    SocialAssistance,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Psychological,
        Category::Pedagogical,
        Category::SocialAssistance,
    ];

    /// Canonical name, used on the wire and in the `category` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Psychological => "Psychological",
            Category::Pedagogical => "Pedagogical",
            Category::SocialAssistance => "SocialAssistance",
        }
    }

    /// Accepts the canonical names plus the Portuguese labels the intake
    /// forms still send. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Psychological" | "Psicológico" => Some(Category::Psychological),
            "Pedagogical" | "Pedagógico" => Some(Category::Pedagogical),
            "SocialAssistance" | "Social Assistance" | "Assistência Social" => {
                Some(Category::SocialAssistance)
            }
            _ => None,
        }
    }

    /// SQL list used by the store-level CHECK constraint.
    pub fn sql_check_list() -> String {
        Self::ALL
            .iter()
            .map(|c| format!("'{}'", c.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_legacy_labels() {
        assert_eq!(Category::parse("Psychological"), Some(Category::Psychological));
        assert_eq!(Category::parse("Pedagógico"), Some(Category::Pedagogical));
        assert_eq!(
            Category::parse("Assistência Social"),
            Some(Category::SocialAssistance)
        );
        assert_eq!(Category::parse("psychological"), None);
        assert_eq!(Category::parse("Medical"), None);
    }

    #[test]
    fn check_list_names_every_category() {
        assert_eq!(
            Category::sql_check_list(),
            "'Psychological', 'Pedagogical', 'SocialAssistance'"
        );
    }
}
