pub mod config;
pub mod error;
pub mod render;
pub mod tui;
pub mod wave;
