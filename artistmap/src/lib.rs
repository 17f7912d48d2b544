pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    BuildConfig, export_formats, format_summary, resolve_output_dir, run_build,
};

// Re-export aggregation functionality from artistmap-core
pub use artistmap_core::{
    AggregateOptions, AggregateProgressCallback, AggregateSummary, execute_aggregation,
};
