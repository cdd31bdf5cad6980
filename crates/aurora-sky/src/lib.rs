//! Day/night cycle for the voxel world: a cyclic clock, a keyframed sky
//! palette, an orbiting sun and moon, a star layer, and the scene nodes that
//! show them.
//!
//! [`AdvancedSky`] is the only type a game loop needs: call
//! [`AdvancedSky::update`] once per frame and [`AdvancedSky::dispose`] on
//! teardown. The pieces are public for subsystems that read sky state.

pub mod celestial;
mod color;
mod controller;
mod error;
mod renderer;
mod sky;
mod starfield;
mod time;

pub use celestial::{CelestialBody, CelestialBodyState, Moon, Sun};
pub use color::{ColorProvider, ColorStop, DEFAULT_PALETTE, SkyColors, interpolate};
pub use controller::CelestialBodyController;
pub use error::SkyError;
pub use renderer::{SkyRenderer, SkyRendererConfig, billboard_rotation};
pub use sky::AdvancedSky;
pub use starfield::{StarPoint, Starfield, generate_stars};
pub use time::{DayPhase, TimeProvider};
