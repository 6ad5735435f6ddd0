pub mod entity_queries;
pub mod event_queries;
pub mod link_queries;
pub mod trace_queries;
pub mod tracking_queries;
