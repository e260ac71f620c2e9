pub mod config;
mod error;
mod experiment;
mod metric;
mod stats;

pub use error::*;
pub use experiment::*;
pub use metric::*;
pub use stats::*;
