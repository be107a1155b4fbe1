pub mod analytics;
pub mod lifecycle;
pub mod retention;

pub use analytics::AnalyticsAggregator;
pub use lifecycle::AlertLifecycle;
pub use retention::RetentionSweeper;
