pub mod health_handlers;
pub mod recording_handlers;
