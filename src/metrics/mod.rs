//! Frame-level measurements taken on the render loop.

pub mod frame_clock;
pub mod gate;
pub mod pause;
pub mod ring_buffer;
pub mod stats;

pub use frame_clock::FrameClock;
pub use gate::{GatePhase, GateTransition, MonitoringState, StabilizationGate};
pub use pause::{PauseDetector, PauseStats};
