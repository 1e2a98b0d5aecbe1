pub mod chat;
pub mod journey;
pub mod pages;
pub mod renderer;
pub mod router;
pub mod terminal;
pub mod view;

pub use renderer::{RendererError, ScreenLayout, ScreenRenderer};
pub use router::{JourneyRouter, PlatformRouter};
pub use terminal::render_text;
pub use view::{MountState, Screen, ScreenKey};
