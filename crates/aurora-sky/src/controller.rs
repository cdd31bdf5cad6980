//! Owns the celestial bodies and steps them together.

use glam::Vec3;

use crate::celestial::CelestialBody;
use crate::time::TimeProvider;

/// Homogeneous collection of [`CelestialBody`] trait objects.
///
/// Bodies are kept in insertion order and addressed by [`CelestialBody::id`].
#[derive(Default)]
pub struct CelestialBodyController {
    bodies: Vec<Box<dyn CelestialBody>>,
}

impl CelestialBodyController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body. A body with the same id is disposed and replaced in place.
    pub fn add(&mut self, body: Box<dyn CelestialBody>) {
        match self.bodies.iter().position(|b| b.id() == body.id()) {
            Some(index) => {
                log::warn!("replacing celestial body '{}'", body.id());
                self.bodies[index].dispose();
                self.bodies[index] = body;
            }
            None => self.bodies.push(body),
        }
    }

    /// Step every body to the provider's current time. The time is read once
    /// so all bodies agree on it.
    pub fn update(&mut self, time: &TimeProvider, viewpoint: Vec3) {
        let t = time.time_normalized();
        for body in &mut self.bodies {
            body.update(t, viewpoint);
        }
    }

    /// Bodies whose last update left them visible.
    pub fn renderable_bodies(&self) -> impl Iterator<Item = &dyn CelestialBody> {
        self.bodies
            .iter()
            .map(|b| b.as_ref())
            .filter(|b| b.render_state().is_visible)
    }

    /// All bodies, visible or not.
    pub fn bodies(&self) -> impl Iterator<Item = &dyn CelestialBody> {
        self.bodies.iter().map(|b| b.as_ref())
    }

    pub fn get(&self, id: &str) -> Option<&dyn CelestialBody> {
        self.bodies().find(|b| b.id() == id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Dispose every body and empty the collection.
    pub fn dispose(&mut self) {
        for body in &mut self.bodies {
            body.dispose();
        }
        self.bodies.clear();
    }
}
