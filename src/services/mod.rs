pub mod metadata_store;
pub mod object_store;
pub mod recording_service;
