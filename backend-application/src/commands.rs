pub mod entity_commands;
pub mod event_commands;
pub mod link_commands;
pub mod tracking_commands;
