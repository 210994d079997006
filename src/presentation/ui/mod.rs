//! Main screen: state, dispatcher, effects and compositor.

mod app;
mod effects;
mod focus;
mod overlay;
mod screen;
mod state;
mod update;
pub mod utils;

pub use app::App;
pub use effects::{Effect, EffectRunner, TYPING_ACTION_DELAY};
pub use focus::{Focus, FocusRouter, Mode};
pub use overlay::{Overlay, OverlayKind, OverlayOutcome};
pub use screen::render;
pub use state::{ChatEntry, PendingAction, RenderState, Settings, Sidebar, UiState};
