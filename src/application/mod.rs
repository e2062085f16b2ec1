// Application layer - use cases and ports
pub mod indicator_source;
pub mod visualization_service;
