// Application layer - Use cases over the loaded series
pub mod query_service;
pub mod series_source;
pub mod series_store;
pub mod viewport_resolver;
