pub mod color;
pub mod geo;
pub mod handles;
pub mod ids;

// Foundation crate: small, well-tested value types only.
pub use color::*;
pub use geo::*;
pub use handles::*;
pub use ids::*;
