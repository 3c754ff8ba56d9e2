pub mod lead;
pub mod stats;

pub use lead::*;
pub use stats::*;
