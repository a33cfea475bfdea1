pub mod geo;
pub mod stats;
pub mod time;

pub use geo::*;
pub use stats::*;
pub use time::*;
