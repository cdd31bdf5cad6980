//! The sun: a daytime billboard that also drives the main directional light.

use std::f32::consts::TAU;

use aurora_scene::{DirectionalLight, ShadowFrustum, TextureLoader};
use glam::Vec3;

use super::{
    CelestialBody, CelestialBodyState, IntensityEnvelope, Orbit, SUN_ID, TextureSlot,
    VISIBILITY_EPSILON, height_factor,
};

/// Sunrise, normalized.
pub const SUNRISE: f32 = 0.25;
/// Sunset, normalized.
pub const SUNSET: f32 = 0.75;
/// Noon, normalized.
const NOON: f32 = 0.5;

/// Light intensity as a fraction of the sun's visual intensity.
const LIGHT_SCALE: f32 = 0.85;

const MORNING_TINT: Vec3 = Vec3::new(1.0, 0.62, 0.35);
const NOON_TINT: Vec3 = Vec3::new(1.0, 0.97, 0.88);
const EVENING_TINT: Vec3 = Vec3::new(1.0, 0.48, 0.28);

/// Daytime body visible between [`SUNRISE`] and [`SUNSET`].
///
/// Its directional light follows the disk, aims at the viewpoint's ground
/// projection and keeps a shadow frustum sized from the orbit for its whole
/// lifetime.
#[derive(Debug)]
pub struct Sun {
    orbit: Orbit,
    envelope: IntensityEnvelope,
    texture: TextureSlot,
    light: DirectionalLight,
    state: CelestialBodyState,
}

impl Sun {
    /// Sun orbiting at `radius` with a billboard of edge `size`, requesting
    /// its sprite from `loader`.
    pub fn new(radius: f32, size: f32, texture_url: &str, loader: &dyn TextureLoader) -> Self {
        let light = DirectionalLight {
            color: NOON_TINT,
            intensity: 0.0,
            target: Vec3::ZERO,
            cast_shadow: true,
            shadow: ShadowFrustum::for_orbit(radius),
        };
        Self {
            orbit: Orbit {
                radius,
                vertical_scale: 0.9,
                lateral_scale: 0.3,
            },
            envelope: IntensityEnvelope {
                floor: 0.25,
                peak: 1.0,
            },
            texture: TextureSlot::request(loader, texture_url),
            light,
            state: CelestialBodyState::hidden(size, NOON_TINT),
        }
    }

    /// Replace the horizon-to-zenith brightness envelope. A zero floor lets
    /// the sun fade out entirely at the horizon.
    pub fn with_envelope(mut self, envelope: IntensityEnvelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Peak visual intensity, reached at noon.
    pub fn peak_intensity(&self) -> f32 {
        self.envelope.peak
    }

    /// Whether the sprite texture is still loading.
    pub fn texture_pending(&self) -> bool {
        self.texture.is_pending()
    }

    /// Tint at normalized time `t`: morning to noon over the first half of
    /// the day, noon to evening over the second.
    pub fn color_at(t: f32) -> Vec3 {
        let half = NOON - SUNRISE;
        if t < NOON {
            let u = ((t - SUNRISE) / half).clamp(0.0, 1.0);
            MORNING_TINT.lerp(NOON_TINT, u)
        } else {
            let u = ((t - NOON) / half).clamp(0.0, 1.0);
            NOON_TINT.lerp(EVENING_TINT, u)
        }
    }
}

impl CelestialBody for Sun {
    fn id(&self) -> &str {
        SUN_ID
    }

    fn update(&mut self, time: f32, viewpoint: Vec3) {
        if let Some(texture) = self.texture.poll(SUN_ID) {
            self.state.texture = Some(texture);
        }

        let angle = (time - NOON) * TAU;
        let in_window = (SUNRISE..=SUNSET).contains(&time);

        self.state.position = viewpoint + self.orbit.offset(angle);
        self.state.intensity = if in_window {
            self.envelope.at(height_factor(angle))
        } else {
            0.0
        };
        self.state.color = Self::color_at(time);
        self.state.is_visible = in_window && self.state.intensity >= VISIBILITY_EPSILON;

        self.light.target = Vec3::new(viewpoint.x, 0.0, viewpoint.z);
        self.light.color = self.state.color;
        self.light.intensity = if self.state.is_visible {
            self.state.intensity * LIGHT_SCALE
        } else {
            0.0
        };
    }

    fn render_state(&self) -> &CelestialBodyState {
        &self.state
    }

    fn light(&self) -> Option<&DirectionalLight> {
        Some(&self.light)
    }

    fn dispose(&mut self) {
        self.texture.release();
        self.state.texture = None;
        self.state.intensity = 0.0;
        self.state.is_visible = false;
        self.light.intensity = 0.0;
    }
}
