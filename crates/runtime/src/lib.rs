pub mod event_bus;
pub mod mailbox;

pub use event_bus::*;
pub use mailbox::*;
