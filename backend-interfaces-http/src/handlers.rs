pub mod entity_handlers;
pub mod event_handlers;
pub mod link_handlers;
pub mod ops_handlers;
pub mod trace_handlers;
pub mod tracking_handlers;
