use serde::Serialize;

use crate::pagination::Paginated;
use crate::repository::SortKey;

/// Lifecycle of one list view.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Fetch failed; carries the message shown next to the retry button.
    Failed(String),
}

/// Everything a list view renders.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ListSnapshot<T> {
    pub rows: Paginated<T>,
    pub status: ListStatus,
    /// Search box contents, possibly not yet applied.
    pub search: String,
    pub filter: String,
    pub sort: SortKey,
}

impl<T> ListSnapshot<T> {
    pub fn is_loading(&self) -> bool {
        self.status == ListStatus::Loading
    }

    /// A successful fetch that matched nothing.
    pub fn is_empty_result(&self) -> bool {
        self.status == ListStatus::Ready && self.rows.items.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ListStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}
