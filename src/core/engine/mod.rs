pub mod aggregator;
pub mod extractor;
pub mod locator;
pub mod statistics;
pub mod walker;
