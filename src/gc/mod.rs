//! GC event monitoring: parsing runtime log lines, accumulating shared
//! statistics, and the background listener that feeds them.

pub mod listener;
pub mod parser;
pub mod store;
pub mod types;

pub use listener::{GcListener, ListenerStatus};
pub use store::GcStatsStore;
pub use types::{GcAggregate, GcEvent, GcFilter, LogLevel, LogRecord};
