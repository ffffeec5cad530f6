pub mod controller;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod pattern;
pub mod polyline;
pub mod sink;
pub mod stamp;
pub mod state;
pub mod surface;

pub use controller::*;
pub use descriptor::*;
pub use error::*;
pub use event::*;
pub use pattern::*;
pub use polyline::*;
pub use sink::*;
pub use stamp::*;
pub use state::*;
pub use surface::*;
