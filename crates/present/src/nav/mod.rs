//! Slide navigation: fragment parsing, slide labels, scaling and the
//! controller that ties them to a rendering surface.

pub mod controller;
pub mod debounce;
pub mod fragment;
pub mod keys;
pub mod scale;
pub mod state;

pub use controller::{Controller, Event, Surface};
pub use keys::{Key, KeyInput};
pub use scale::Viewport;
pub use state::SlideState;
