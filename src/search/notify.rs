//! Transient user-facing status messages. Never persisted; each UI decides
//! how to show them (TUI message panel, CLI print, web toast).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Found,
    NoResults,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    /// `total` is the API's overall hit count, not the page size.
    pub fn found(total: u64, query: &str) -> Self {
        Self {
            kind: NotificationKind::Found,
            title: "Search completed".to_string(),
            description: format!("Found {total} books for \"{query}\""),
        }
    }

    pub fn no_results(query: &str) -> Self {
        Self {
            kind: NotificationKind::NoResults,
            title: "No results found".to_string(),
            description: format!("No books found for \"{query}\". Try a different search term."),
        }
    }

    pub fn search_failed() -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Search failed".to_string(),
            description: "Unable to search books. Please try again.".to_string(),
        }
    }
}
