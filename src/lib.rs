pub mod core;

// Re-export key items for easy importing in this crate
pub use crate::core::engine;
pub use crate::core::types;

// Re-export key items for easy importing in other crates
pub use crate::core::engine::aggregator::{AggregateOptions, aggregate_experiment};
pub use crate::core::engine::walker::discover_experiments;
pub use crate::core::main_shared::run_main;
pub use crate::core::output::{read_results, write_outputs};
pub use crate::core::report::render_report;
