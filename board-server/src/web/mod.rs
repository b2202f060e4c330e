//! Web layer for the departure board.
//!
//! Serves the latest computed board as HTML and JSON.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
