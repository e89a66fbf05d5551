mod clock;
mod engine;
mod phase;
mod settings;
mod state;
pub mod visual;

pub use clock::FrameClock;
pub use engine::SessionEngine;
pub use phase::Phase;
pub use settings::Settings;
pub use state::SessionState;
pub use visual::VisualState;
