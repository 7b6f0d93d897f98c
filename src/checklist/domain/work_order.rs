//! External work orders as received from the maintenance system.

use super::{ChecklistDomainError, WorkOrderId};

/// Read-only work order driving checklist creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrder {
    id: WorkOrderId,
    name: String,
    description: String,
    project_number: Option<String>,
    project_name: Option<String>,
}

impl WorkOrder {
    /// Creates a work order with an empty description and no project.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistDomainError::EmptyWorkOrderId`] when the identifier
    /// is blank and [`ChecklistDomainError::EmptyWorkOrderName`] when the
    /// name is.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ChecklistDomainError> {
        let id = WorkOrderId::new(id)?;
        let name = non_blank(name.into()).ok_or(ChecklistDomainError::EmptyWorkOrderName)?;
        Ok(Self {
            id,
            name,
            description: String::new(),
            project_number: None,
            project_name: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the project number. Blank values are treated as absent.
    #[must_use]
    pub fn with_project_number(mut self, number: impl Into<String>) -> Self {
        self.project_number = non_blank(number.into());
        self
    }

    /// Sets the project name. Blank values are treated as absent.
    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = non_blank(name.into());
        self
    }

    /// Returns the work-order identifier.
    #[must_use]
    pub const fn id(&self) -> &WorkOrderId {
        &self.id
    }

    /// Returns the work-order name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the project label shown next to the checklist: project number
    /// and name separated by a space, whichever of them is present, or an
    /// empty string.
    #[must_use]
    pub fn belongs_to(&self) -> String {
        match (self.project_number.as_deref(), self.project_name.as_deref()) {
            (Some(number), Some(name)) => format!("{number} {name}"),
            (Some(only), None) | (None, Some(only)) => only.to_owned(),
            (None, None) => String::new(),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
