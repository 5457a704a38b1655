use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier used by the remote catalog for categories, properties and options
pub type Id = i64;

/// Identifier of a form session held by the service
pub type SessionId = Uuid;

pub fn generate_session_id() -> SessionId {
    Uuid::new_v4()
}

/// Lifecycle of one form session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    /// Categories known, nothing chosen yet
    Empty,
    CategoryChosen,
    /// Subcategory chosen, properties request pending or failed
    SubcategoryChosen,
    PropertiesLoaded,
    Submitted,
}

impl Default for FormPhase {
    fn default() -> Self {
        FormPhase::Empty
    }
}

/// Case-insensitive substring match used by option search and the selector
pub fn matches_query(candidate: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    candidate.to_lowercase().contains(&query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_query_is_case_insensitive() {
        assert!(matches_query("Apple iPhone", "iphone"));
        assert!(matches_query("Apple iPhone", "APP"));
        assert!(!matches_query("Samsung", "apple"));
    }

    #[test]
    fn test_blank_query_matches_everything() {
        assert!(matches_query("Anything", ""));
        assert!(matches_query("Anything", "   "));
    }
}
