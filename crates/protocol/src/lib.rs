pub mod convert;
pub mod dispatch;
pub mod error;
pub mod wire;

pub use dispatch::*;
pub use error::*;
pub use wire::*;
