//! Configuration module for the demo
//!
//! Timings of the simulated processing steps, raster output settings and
//! the demo accounts offered on the login screen. Loaded from TOML; every
//! field has a default and out-of-range values are clamped.

pub mod demo;

pub use demo::{AccountConfig, ConfigError, DemoConfig, RenderConfig, TimingConfig};
