// Application layer - use cases over the dashboard store and insight generator
pub mod dashboard_service;
pub mod dashboard_store;
pub mod durable_state;
pub mod editor_session;
pub mod insight_generator;
pub mod insight_service;
pub mod session_service;
