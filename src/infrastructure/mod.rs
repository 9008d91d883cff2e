// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod file_state;
pub mod gemini_client;
pub mod http_response;
pub mod memory_state;
