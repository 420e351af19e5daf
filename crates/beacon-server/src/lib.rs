//! Beacon forwarding server.
//!
//! Relays `/api/chat` to one configured webhook, answers `/health`, and
//! serves the bundled front-end for everything else. [`commands`] drives the
//! relay client and the spreadsheet sink from the command line.

pub mod commands;
pub mod error;
pub mod forward;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
