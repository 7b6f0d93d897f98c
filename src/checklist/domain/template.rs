//! Default task template applied to every new checklist.

use super::{ChecklistDomainError, ChecklistId, Task};

/// Ordered set of task texts seeded into each new checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTemplate {
    texts: Vec<String>,
}

impl TaskTemplate {
    /// Creates a template from task texts, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError::EmptyTaskText`] when any text is
    /// blank.
    pub fn new<I, S>(entries: I) -> Result<Self, ChecklistDomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let texts = entries
            .into_iter()
            .map(|text| {
                let raw: String = text.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ChecklistDomainError::EmptyTaskText);
                }
                Ok(trimmed.to_owned())
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { texts })
    }

    /// Returns the task texts in seeding order.
    #[must_use]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Returns the number of template tasks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.texts.len()
    }

    /// Returns `true` when the template has no tasks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Builds one incomplete task per template entry for the checklist.
    #[must_use]
    pub fn seed(&self, checklist_id: ChecklistId) -> Vec<Task> {
        (0_u32..)
            .zip(&self.texts)
            .map(|(position, text)| Task::seeded(checklist_id, position, text.clone()))
            .collect()
    }
}
