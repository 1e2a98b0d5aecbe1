//! Manufacturing intelligence platform demo
//!
//! A navigable demo session: a welcome screen, a role-gated platform with
//! its pages and an AI dashboard builder, and a six-phase customer journey.
//! The session is driven by `AppController`, either from code or through
//! the text commands in `input`.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod ui;

pub use app::{AppController, AppError, ViewEffect};
pub use config::DemoConfig;
