pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod gc;
pub mod logging;
pub mod metrics;
pub mod overlay;
pub mod runtime;
pub mod scene;
pub mod stress;
pub mod theme;
pub mod tui;
