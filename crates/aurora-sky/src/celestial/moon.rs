//! The moon: a visual-only night body.

use std::f32::consts::PI;

use aurora_scene::TextureLoader;
use glam::Vec3;

use super::{
    CelestialBody, CelestialBodyState, IntensityEnvelope, MOON_ID, Orbit, TextureSlot,
    VISIBILITY_EPSILON, height_factor,
};

/// Moonrise, normalized.
pub const MOONRISE: f32 = 0.75;
/// Moonset, normalized (on the following day).
pub const MOONSET: f32 = 0.25;
/// Length of the night window as a fraction of the cycle.
const NIGHT_LENGTH: f32 = 0.5;

const TINT: Vec3 = Vec3::new(0.85, 0.9, 1.0);

/// Night body visible from [`MOONRISE`] through midnight to [`MOONSET`].
/// Casts no light.
#[derive(Debug)]
pub struct Moon {
    orbit: Orbit,
    envelope: IntensityEnvelope,
    texture: TextureSlot,
    state: CelestialBodyState,
}

impl Moon {
    /// Moon orbiting at `radius` with a billboard of edge `size`, requesting
    /// its sprite from `loader`.
    pub fn new(radius: f32, size: f32, texture_url: &str, loader: &dyn TextureLoader) -> Self {
        Self {
            orbit: Orbit {
                radius,
                vertical_scale: 0.8,
                lateral_scale: -0.2,
            },
            envelope: IntensityEnvelope {
                floor: 0.15,
                peak: 0.6,
            },
            texture: TextureSlot::request(loader, texture_url),
            state: CelestialBodyState::hidden(size, TINT),
        }
    }

    /// Replace the horizon-to-zenith brightness envelope.
    pub fn with_envelope(mut self, envelope: IntensityEnvelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Whether the sprite texture is still loading.
    pub fn texture_pending(&self) -> bool {
        self.texture.is_pending()
    }

    /// Fraction of the night elapsed at `t`, `0` at moonrise and `1` at
    /// moonset. Only meaningful inside the night window.
    fn night_progress(t: f32) -> f32 {
        if t >= MOONRISE {
            (t - MOONRISE) / NIGHT_LENGTH
        } else {
            (1.0 - MOONRISE + t) / NIGHT_LENGTH
        }
    }
}

impl CelestialBody for Moon {
    fn id(&self) -> &str {
        MOON_ID
    }

    fn update(&mut self, time: f32, viewpoint: Vec3) {
        if let Some(texture) = self.texture.poll(MOON_ID) {
            self.state.texture = Some(texture);
        }

        let in_window = time >= MOONRISE || time <= MOONSET;
        let angle = (Self::night_progress(time) - 0.5) * PI;

        self.state.position = viewpoint + self.orbit.offset(angle);
        self.state.intensity = if in_window {
            self.envelope.at(height_factor(angle))
        } else {
            0.0
        };
        self.state.is_visible = in_window && self.state.intensity >= VISIBILITY_EPSILON;
    }

    fn render_state(&self) -> &CelestialBodyState {
        &self.state
    }

    fn dispose(&mut self) {
        self.texture.release();
        self.state.texture = None;
        self.state.intensity = 0.0;
        self.state.is_visible = false;
    }
}
