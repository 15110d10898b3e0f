//! Services built on the completion provider port.

mod aggregator;

pub use aggregator::{AggregatedOutput, AggregationError, StreamAggregator};
