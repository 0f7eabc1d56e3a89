pub mod frames;
pub mod gc;
pub mod overlay;
pub mod scene;
