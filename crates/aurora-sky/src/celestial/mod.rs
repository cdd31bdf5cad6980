//! Orbiting light sources: the shared contract plus the sun and moon.

mod moon;
mod sun;

pub use moon::Moon;
pub use sun::Sun;

use aurora_scene::{DirectionalLight, RequestStatus, TextureHandle, TextureLoader, TextureRequest};
use glam::Vec3;

/// Below this intensity a body counts as hidden even inside its time window.
pub const VISIBILITY_EPSILON: f32 = 0.01;

/// Identifier of the sun body.
pub const SUN_ID: &str = "sun";
/// Identifier of the moon body.
pub const MOON_ID: &str = "moon";

/// Snapshot of what a renderer needs to draw one body.
#[derive(Clone, Debug)]
pub struct CelestialBodyState {
    /// World-space position, already offset from the viewpoint.
    pub position: Vec3,
    /// Sprite texture, `None` until (and unless) the load completes.
    pub texture: Option<TextureHandle>,
    /// Billboard edge length in world units.
    pub size: f32,
    /// Linear RGB tint.
    pub color: Vec3,
    /// Brightness in `[0, 1]`.
    pub intensity: f32,
    /// Whether the body should be drawn this frame.
    pub is_visible: bool,
}

impl CelestialBodyState {
    fn hidden(size: f32, color: Vec3) -> Self {
        Self {
            position: Vec3::ZERO,
            texture: None,
            size,
            color,
            intensity: 0.0,
            is_visible: false,
        }
    }
}

/// A body the [`CelestialBodyController`](crate::CelestialBodyController)
/// steps every frame. Implementations own their state exclusively.
pub trait CelestialBody {
    /// Stable identifier, unique within a controller.
    fn id(&self) -> &str;

    /// Recompute position, visibility, intensity and color for normalized
    /// time `time`, following `viewpoint`.
    fn update(&mut self, time: f32, viewpoint: Vec3);

    /// State computed by the last [`update`](Self::update).
    fn render_state(&self) -> &CelestialBodyState;

    /// Light cast by this body, if it casts one.
    fn light(&self) -> Option<&DirectionalLight> {
        None
    }

    /// Release the texture and any pending load, and switch the body off.
    fn dispose(&mut self);
}

/// Elliptical arc around the viewpoint.
///
/// `angle = 0` is the top of the arc; `±π/2` sit on the horizon, east and west.
#[derive(Clone, Debug, PartialEq)]
pub struct Orbit {
    /// Horizontal radius in world units.
    pub radius: f32,
    /// Peak height as a fraction of the radius.
    pub vertical_scale: f32,
    /// Sideways tilt of the arc as a fraction of the radius.
    pub lateral_scale: f32,
}

impl Orbit {
    /// Offset from the viewpoint at `angle`.
    pub fn offset(&self, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(
            sin * self.radius,
            cos * self.radius * self.vertical_scale,
            cos * self.radius * self.lateral_scale,
        )
    }
}

/// How high above the horizon a body at `angle` sits, in `[0, 1]`.
pub fn height_factor(angle: f32) -> f32 {
    angle.cos().max(0.0)
}

/// Brightness between a horizon floor and a zenith peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensityEnvelope {
    pub floor: f32,
    pub peak: f32,
}

impl IntensityEnvelope {
    /// Intensity at height factor `height`.
    pub fn at(&self, height: f32) -> f32 {
        self.floor + (self.peak - self.floor) * height.clamp(0.0, 1.0)
    }
}

/// The in-flight load of a body's sprite texture.
#[derive(Debug, Default)]
pub(crate) struct TextureSlot {
    pending: Option<TextureRequest>,
}

impl TextureSlot {
    /// Start loading `url`. An empty URL means the body has no sprite.
    pub(crate) fn request(loader: &dyn TextureLoader, url: &str) -> Self {
        if !url.is_empty() {
            log::debug!("requesting texture {url}");
        }
        Self {
            pending: (!url.is_empty()).then(|| loader.load(url)),
        }
    }

    /// Pick up a finished load. Returns the texture the first time it
    /// arrives, `None` otherwise. Failures are logged and not retried.
    pub(crate) fn poll(&mut self, owner: &str) -> Option<TextureHandle> {
        let request = self.pending.as_ref()?;
        let status = request.poll();
        let url = request.url().to_string();
        match status {
            RequestStatus::Pending => None,
            RequestStatus::Ready(Ok(texture)) => {
                log::debug!("{owner} texture {url} ready ({}x{})", texture.width, texture.height);
                self.pending = None;
                Some(texture)
            }
            RequestStatus::Ready(Err(err)) => {
                log::warn!("{owner} texture {url} unavailable, drawing untextured: {err}");
                self.pending = None;
                None
            }
            RequestStatus::Abandoned => {
                log::warn!("{owner} texture {url} was abandoned by its loader");
                self.pending = None;
                None
            }
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the in-flight request; a late completion is then discarded.
    pub(crate) fn release(&mut self) {
        self.pending = None;
    }
}
