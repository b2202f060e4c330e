//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::watch;

use crate::board::Board;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Latest computed board.
    pub boards: watch::Receiver<Arc<Board>>,

    /// Whether the HTML page shows the last-updated footer.
    pub show_footer: bool,
}

impl AppState {
    pub fn new(boards: watch::Receiver<Arc<Board>>, show_footer: bool) -> Self {
        Self {
            boards,
            show_footer,
        }
    }

    pub fn board(&self) -> Arc<Board> {
        self.boards.borrow().clone()
    }
}
