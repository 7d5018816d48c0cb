//! In-memory router that records history instead of driving a browser.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::RouterError;
use crate::traits::RouterService;

#[derive(Debug, Default)]
struct HistoryState {
    entries: Vec<String>,
    windows: Vec<String>,
    refreshes: usize,
}

/// Router backed by an in-memory history stack.
///
/// Same-window navigations and location assignments push onto the stack;
/// new-window navigations are recorded separately and leave the current
/// location untouched.
pub struct InMemoryHistory {
    state: RwLock<HistoryState>,
}

impl InMemoryHistory {
    /// Create a history with no entries.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(HistoryState::default()),
        }
    }

    /// Create a history positioned at `initial`.
    pub fn starting_at(initial: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(HistoryState {
                entries: vec![initial.into()],
                ..HistoryState::default()
            }),
        }
    }

    /// The current location, if anything has been visited.
    pub async fn location(&self) -> Option<String> {
        self.state.read().await.entries.last().cloned()
    }

    pub async fn entries(&self) -> Vec<String> {
        self.state.read().await.entries.clone()
    }

    /// Locations opened in new browsing contexts, in order.
    pub async fn opened_windows(&self) -> Vec<String> {
        self.state.read().await.windows.clone()
    }

    pub async fn refresh_count(&self) -> usize {
        self.state.read().await.refreshes
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouterService for InMemoryHistory {
    async fn navigate_same_window(&self, path: &str) -> Result<(), RouterError> {
        self.state.write().await.entries.push(path.to_string());
        Ok(())
    }

    async fn navigate_new_window(&self, path: &str) -> Result<(), RouterError> {
        self.state.write().await.windows.push(path.to_string());
        Ok(())
    }

    async fn refresh_current_page_state(&self) -> Result<(), RouterError> {
        self.state.write().await.refreshes += 1;
        Ok(())
    }
}
