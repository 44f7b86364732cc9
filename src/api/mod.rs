//! HTTP API for podsync

pub mod ai_notes;
pub mod health;
pub mod shows;
pub mod sync;

pub use ai_notes::ai_note_routes;
pub use health::health_routes;
pub use shows::show_routes;
pub use sync::sync_routes;
