//! Per-frame pixel filters

pub mod sepia;

pub use sepia::{apply_sepia_filter, SepiaFilter, SepiaParams};
