//! In-memory adapters for checklist ports.

mod checklist;
mod template;

pub use checklist::InMemoryChecklistRepository;
pub use template::InMemoryTemplateRepository;

fn poisoned(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}
