//! In-memory application snapshot.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::SnapshotError;
use crate::traits::SnapshotProvider;
use crate::types::{AppMode, Page};

#[derive(Debug, Default)]
struct AppState {
    pages: Vec<Page>,
    current_page_id: String,
    mode: AppMode,
}

/// Application state held in memory behind a `RwLock`.
///
/// Every read clones out of the lock, so a handler sees the state as of
/// that read. Setters may run concurrently with a chain; the next read
/// observes the change.
pub struct InMemorySnapshot {
    state: RwLock<AppState>,
}

impl InMemorySnapshot {
    /// Create an empty snapshot: no pages, view mode.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(AppState::default()),
        }
    }

    /// Create a snapshot with the given pages, the first one current.
    pub fn with_pages(pages: Vec<Page>) -> Self {
        let current_page_id = pages
            .first()
            .map(|page| page.page_id.clone())
            .unwrap_or_default();
        Self {
            state: RwLock::new(AppState {
                pages,
                current_page_id,
                mode: AppMode::View,
            }),
        }
    }

    pub async fn set_pages(&self, pages: Vec<Page>) {
        self.state.write().await.pages = pages;
    }

    pub async fn set_current_page(&self, page_id: impl Into<String>) {
        self.state.write().await.current_page_id = page_id.into();
    }

    pub async fn set_mode(&self, mode: AppMode) {
        self.state.write().await.mode = mode;
    }
}

impl Default for InMemorySnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotProvider for InMemorySnapshot {
    async fn page_list(&self) -> Result<Vec<Page>, SnapshotError> {
        Ok(self.state.read().await.pages.clone())
    }

    async fn current_page_id(&self) -> Result<String, SnapshotError> {
        Ok(self.state.read().await.current_page_id.clone())
    }

    async fn app_mode(&self) -> Result<AppMode, SnapshotError> {
        Ok(self.state.read().await.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_by_default() {
        let snapshot = InMemorySnapshot::new();
        assert!(snapshot.page_list().await.unwrap().is_empty());
        assert_eq!(snapshot.current_page_id().await.unwrap(), "");
        assert_eq!(snapshot.app_mode().await.unwrap(), AppMode::View);
    }

    #[tokio::test]
    async fn first_page_is_current() {
        let snapshot = InMemorySnapshot::with_pages(vec![
            Page::new("p1", "Home"),
            Page::new("p2", "Profile"),
        ]);
        assert_eq!(snapshot.current_page_id().await.unwrap(), "p1");
        assert_eq!(snapshot.page_list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn setters_are_visible_to_later_reads() {
        let snapshot = InMemorySnapshot::new();
        snapshot.set_pages(vec![Page::new("p9", "Settings")]).await;
        snapshot.set_current_page("p9").await;
        snapshot.set_mode(AppMode::Edit).await;

        assert_eq!(snapshot.page_list().await.unwrap()[0].page_name, "Settings");
        assert_eq!(snapshot.current_page_id().await.unwrap(), "p9");
        assert_eq!(snapshot.app_mode().await.unwrap(), AppMode::Edit);
    }
}
