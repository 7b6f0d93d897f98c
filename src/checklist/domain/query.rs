//! Browse/search criteria for checklists.

use super::Checklist;

/// Case-insensitive substring search over checklist name, project label,
/// and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistQuery {
    needle: Option<String>,
    limit: usize,
    include_history: bool,
}

impl ChecklistQuery {
    /// Creates a query over active checklists. A blank `text` matches every
    /// checklist.
    #[must_use]
    pub fn new(text: &str, limit: usize) -> Self {
        let trimmed = text.trim();
        Self {
            needle: (!trimmed.is_empty()).then(|| trimmed.to_lowercase()),
            limit,
            include_history: false,
        }
    }

    /// Includes archived checklists in the results.
    #[must_use]
    pub const fn including_history(mut self) -> Self {
        self.include_history = true;
        self
    }

    /// Returns the lowercased search text, or `None` to match everything.
    #[must_use]
    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    /// Returns the maximum number of results.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns `true` when archived checklists are included.
    #[must_use]
    pub const fn include_history(&self) -> bool {
        self.include_history
    }

    /// Returns `true` when `checklist` satisfies the text and archival
    /// criteria. The limit is applied by the caller.
    #[must_use]
    pub fn matches(&self, checklist: &Checklist) -> bool {
        if checklist.is_history() && !self.include_history {
            return false;
        }
        let Some(needle) = self.needle() else {
            return true;
        };
        [
            checklist.name(),
            checklist.belongs_to(),
            checklist.description(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}
