//! Application orchestration layer
//!
//! This module coordinates between input, domain and UI layers. It owns the
//! session state, the login collaborator and the task scope of the mounted
//! screen.

pub mod controller;
pub mod login;
pub mod session;
pub mod state;
pub mod tasks;

pub use controller::{AppController, AppError, ViewEffect};
pub use login::{Credentials, DemoDirectory, LoginError, LoginProvider};
pub use session::{Reply, describe_effect, execute};
pub use state::{SessionState, StateEvent, StateMachine};
pub use tasks::TaskScheduler;
