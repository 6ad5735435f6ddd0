// Domain entities and the request/response shapes built from them

pub mod entity;
pub mod event;
pub mod link;
pub mod paging;
pub mod runtime_config;
pub mod trace;
pub mod tracking;

pub use entity::*;
pub use event::*;
pub use link::*;
pub use paging::*;
pub use runtime_config::*;
pub use trace::*;
pub use tracking::*;
